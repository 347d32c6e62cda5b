//! Peer registration between the deployed contracts
//!
//! Links are processed in order, each `setPeer` awaited before the next. A
//! link whose on-chain peer already matches is skipped, so re-running after a
//! partial failure only sends what is missing. The first failed link stops
//! all further transactions; links already set are never undone.

use std::fmt;

use alloy_primitives::Address;
use tracing::{info, warn, Instrument};

use crate::error::{OftError, Result};
use crate::protocol::{ConfirmedTx, EndpointId, PeerAddress};
use crate::spans;
use crate::traits::PeerRegistry;

/// One directed peer entry to register
pub struct PeerLink<'a> {
    pub label: &'static str,
    pub registry: &'a dyn PeerRegistry,
    pub eid: EndpointId,
    pub peer: PeerAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    AlreadySet,
    Set(ConfirmedTx),
    Failed(String),
    /// Skipped because an earlier link failed
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub label: &'static str,
    pub contract: Address,
    pub eid: EndpointId,
    pub expected: PeerAddress,
    pub status: LinkStatus,
    /// Peer read back after all links were processed; `None` if unreadable
    pub observed: Option<PeerAddress>,
}

impl LinkOutcome {
    pub fn is_consistent(&self) -> bool {
        self.observed == Some(self.expected)
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.status {
            LinkStatus::AlreadySet => "already set".to_string(),
            LinkStatus::Set(tx) => format!("set in {}", tx.tx_hash),
            LinkStatus::Failed(reason) => format!("FAILED: {reason}"),
            LinkStatus::NotAttempted => "not attempted".to_string(),
        };
        let check = if self.is_consistent() { "ok" } else { "MISMATCH" };
        write!(
            f,
            "{} ({} eid {}): {status} [{check}]",
            self.label, self.contract, self.eid
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireReport {
    pub links: Vec<LinkOutcome>,
}

impl WireReport {
    pub fn all_consistent(&self) -> bool {
        self.links.iter().all(LinkOutcome::is_consistent)
    }

    pub fn failed_count(&self) -> usize {
        self.links.iter().filter(|link| !link.is_consistent()).count()
    }

    /// Turns any inconsistent link into [`OftError::WiringIncomplete`]
    pub fn into_result(self) -> Result<Self> {
        match self.failed_count() {
            0 => Ok(self),
            failed => Err(OftError::WiringIncomplete {
                failed,
                total: self.links.len(),
            }),
        }
    }
}

/// Vana adapter to Base OFT, Base OFT to Vana adapter, and optionally Vana
/// adapter to the Solana OFT store
pub fn rdat_links<'a>(
    vana_adapter: &'a dyn PeerRegistry,
    base_oft: &'a dyn PeerRegistry,
    solana_oft: Option<PeerAddress>,
) -> Vec<PeerLink<'a>> {
    let mut links = vec![
        PeerLink {
            label: "vana -> base",
            registry: vana_adapter,
            eid: EndpointId::Base,
            peer: PeerAddress::from_evm(base_oft.address()),
        },
        PeerLink {
            label: "base -> vana",
            registry: base_oft,
            eid: EndpointId::Vana,
            peer: PeerAddress::from_evm(vana_adapter.address()),
        },
    ];
    if let Some(peer) = solana_oft {
        links.push(PeerLink {
            label: "vana -> solana",
            registry: vana_adapter,
            eid: EndpointId::Solana,
            peer,
        });
    }
    links
}

/// Wires the RDAT contracts and reads every link back.
pub async fn wire_rdat(
    signer: Address,
    vana_adapter: &dyn PeerRegistry,
    base_oft: &dyn PeerRegistry,
    solana_oft: Option<PeerAddress>,
) -> WireReport {
    let span = spans::wire(
        &vana_adapter.address(),
        &base_oft.address(),
        solana_oft.is_some(),
    );
    let links = rdat_links(vana_adapter, base_oft, solana_oft);
    wire_peers(signer, &links).instrument(span).await
}

/// Registers each link in order until one fails, then reads all of them back.
pub async fn wire_peers(signer: Address, links: &[PeerLink<'_>]) -> WireReport {
    let mut statuses = Vec::with_capacity(links.len());
    let mut halted = false;
    for link in links {
        if halted {
            info!(link = link.label, event = "set_peer_not_attempted");
            statuses.push(LinkStatus::NotAttempted);
            continue;
        }
        let status = match apply_link(signer, link).await {
            Ok(status) => status,
            Err(e) => {
                warn!(
                    link = link.label,
                    contract = %link.registry.address(),
                    eid = link.eid.as_u32(),
                    error = %e,
                    event = "set_peer_failed"
                );
                halted = true;
                LinkStatus::Failed(e.to_string())
            }
        };
        statuses.push(status);
    }

    let mut outcomes = Vec::with_capacity(links.len());
    for (link, status) in links.iter().zip(statuses) {
        let observed = match link.registry.peer(link.eid).await {
            Ok(peer) => Some(peer),
            Err(e) => {
                warn!(link = link.label, error = %e, event = "peer_read_back_failed");
                None
            }
        };
        let outcome = LinkOutcome {
            label: link.label,
            contract: link.registry.address(),
            eid: link.eid,
            expected: link.peer,
            status,
            observed,
        };
        info!(
            link = outcome.label,
            consistent = outcome.is_consistent(),
            event = "peer_link_checked"
        );
        outcomes.push(outcome);
    }

    let report = WireReport { links: outcomes };
    if !report.all_consistent() {
        spans::record_error_with_context(
            "WiringIncomplete",
            &format!("{} peer links not set", report.failed_count()),
            None,
        );
    }
    report
}

async fn apply_link(signer: Address, link: &PeerLink<'_>) -> Result<LinkStatus> {
    let current = link.registry.peer(link.eid).await?;
    if current == link.peer {
        info!(link = link.label, peer = %current, event = "peer_already_set");
        return Ok(LinkStatus::AlreadySet);
    }

    let owner = link.registry.owner().await?;
    if owner != signer {
        return Err(OftError::NotOwner {
            contract: link.registry.address(),
            caller: signer,
        });
    }

    let tx = link.registry.set_peer(link.eid, link.peer).await?;
    info!(
        link = link.label,
        peer = %link.peer,
        tx_hash = %tx.tx_hash,
        event = "peer_set"
    );
    Ok(LinkStatus::Set(tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeOApp;

    const DEPLOYER: Address = Address::with_last_byte(0xd0);

    #[tokio::test]
    async fn test_wires_both_directions() {
        let vana = FakeOApp::new(Address::with_last_byte(1), DEPLOYER);
        let base = FakeOApp::new(Address::with_last_byte(2), DEPLOYER);

        let report = wire_rdat(DEPLOYER, &vana, &base, None).await;

        assert!(report.all_consistent());
        assert_eq!(report.links.len(), 2);
        assert_eq!(
            vana.stored_peer(EndpointId::Base),
            PeerAddress::from_evm(base.address())
        );
        assert_eq!(
            base.stored_peer(EndpointId::Vana),
            PeerAddress::from_evm(vana.address())
        );
    }

    #[tokio::test]
    async fn test_rerun_skips_matching_peers() {
        let vana = FakeOApp::new(Address::with_last_byte(1), DEPLOYER);
        let base = FakeOApp::new(Address::with_last_byte(2), DEPLOYER);

        wire_rdat(DEPLOYER, &vana, &base, None).await;
        let report = wire_rdat(DEPLOYER, &vana, &base, None).await;

        assert!(report
            .links
            .iter()
            .all(|link| link.status == LinkStatus::AlreadySet));
        assert_eq!(vana.set_peer_calls().len(), 1);
        assert_eq!(base.set_peer_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_wiring_is_reported_not_rolled_back() {
        let vana = FakeOApp::new(Address::with_last_byte(1), DEPLOYER);
        let multisig = Address::with_last_byte(0xaa);
        let base = FakeOApp::new(Address::with_last_byte(2), multisig);
        let solana = PeerAddress::from_solana("FkVGPvVoE3oYoz6EDuJ3ZP2D9aSgM5HHuxk3jf9ckU35")
            .unwrap();

        let report = wire_rdat(DEPLOYER, &vana, &base, Some(solana)).await;

        assert!(report.links[0].is_consistent());
        assert!(matches!(report.links[1].status, LinkStatus::Failed(_)));
        assert_eq!(report.links[2].status, LinkStatus::NotAttempted);
        assert_eq!(
            vana.stored_peer(EndpointId::Base),
            PeerAddress::from_evm(base.address())
        );
        assert!(vana.stored_peer(EndpointId::Solana).is_zero());
        assert!(matches!(
            report.into_result(),
            Err(OftError::WiringIncomplete { failed: 2, total: 3 })
        ));
    }

    #[tokio::test]
    async fn test_first_failure_stops_reverse_direction() {
        let multisig = Address::with_last_byte(0xaa);
        let vana = FakeOApp::new(Address::with_last_byte(1), multisig);
        let base = FakeOApp::new(Address::with_last_byte(2), DEPLOYER);

        let report = wire_rdat(DEPLOYER, &vana, &base, None).await;

        assert!(matches!(
            report.links[0].status,
            LinkStatus::Failed(ref reason) if reason.contains("not the owner")
        ));
        assert_eq!(report.links[1].status, LinkStatus::NotAttempted);
        assert!(base.set_peer_calls().is_empty());
        assert!(base.stored_peer(EndpointId::Vana).is_zero());
        // both links are still read back
        assert_eq!(report.links[1].observed, Some(PeerAddress::ZERO));
        assert!(matches!(
            report.into_result(),
            Err(OftError::WiringIncomplete { failed: 2, total: 2 })
        ));
    }

    #[tokio::test]
    async fn test_rerun_after_failure_completes_remaining_links() {
        let vana = FakeOApp::new(Address::with_last_byte(1), DEPLOYER);
        let base = FakeOApp::new(Address::with_last_byte(2), DEPLOYER);
        vana.set_peer(EndpointId::Base, PeerAddress::from_evm(base.address()))
            .await
            .unwrap();

        let report = wire_rdat(DEPLOYER, &vana, &base, None).await;

        assert_eq!(report.links[0].status, LinkStatus::AlreadySet);
        assert!(matches!(report.links[1].status, LinkStatus::Set(_)));
        assert!(report.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_solana_link_only_when_configured() {
        let vana = FakeOApp::new(Address::with_last_byte(1), DEPLOYER);
        let base = FakeOApp::new(Address::with_last_byte(2), DEPLOYER);
        let solana = PeerAddress::from_solana("FkVGPvVoE3oYoz6EDuJ3ZP2D9aSgM5HHuxk3jf9ckU35")
            .unwrap();

        assert_eq!(rdat_links(&vana, &base, None).len(), 2);

        let report = wire_rdat(DEPLOYER, &vana, &base, Some(solana)).await;
        assert_eq!(report.links.len(), 3);
        assert_eq!(report.links[2].eid, EndpointId::Solana);
        assert_eq!(vana.stored_peer(EndpointId::Solana), solana);
    }
}
