//! Read-only probe of candidate LayerZero endpoint addresses
//!
//! Every sub-check is recorded as a value; a failing call never stops the
//! probe or the remaining candidates. The verdict is for the operator to
//! read, no candidate is picked automatically.

use std::fmt;

use alloy_primitives::Address;
use tracing::{info, Instrument};

use crate::error::Result;
use crate::protocol::EndpointId;
use crate::spans;
use crate::traits::EndpointInspector;

/// Result of one read-only call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeCheck<T> {
    Ok(T),
    Failed(String),
}

impl<T> ProbeCheck<T> {
    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ProbeCheck<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(value) => write!(f, "{value}"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Calls made against a candidate that has code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointChecks {
    pub code_len: usize,
    pub eid: ProbeCheck<u32>,
    pub supports_base: ProbeCheck<bool>,
    pub supports_solana: ProbeCheck<bool>,
    pub base_send_library: ProbeCheck<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// `eth_getCode` failed
    Unreachable,
    NoContract,
    /// `eid()` returned the expected endpoint id
    Matches,
    WrongEid(u32),
    /// Code present but `eid()` could not be read
    Inconclusive,
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "unreachable"),
            Self::NoContract => write!(f, "no contract"),
            Self::Matches => write!(f, "endpoint id matches"),
            Self::WrongEid(eid) => write!(f, "wrong endpoint id {eid}"),
            Self::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub candidate: Address,
    pub expected_eid: EndpointId,
    pub code: ProbeCheck<usize>,
    /// `None` when there is no code to call
    pub checks: Option<EndpointChecks>,
}

impl ProbeReport {
    pub fn verdict(&self) -> ProbeVerdict {
        match (&self.code, &self.checks) {
            (ProbeCheck::Failed(_), _) => ProbeVerdict::Unreachable,
            (ProbeCheck::Ok(_), None) => ProbeVerdict::NoContract,
            (ProbeCheck::Ok(_), Some(checks)) => match checks.eid {
                ProbeCheck::Ok(eid) if eid == self.expected_eid.as_u32() => ProbeVerdict::Matches,
                ProbeCheck::Ok(eid) => ProbeVerdict::WrongEid(eid),
                ProbeCheck::Failed(_) => ProbeVerdict::Inconclusive,
            },
        }
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.candidate, self.verdict())?;
        writeln!(f, "  code size: {}", self.code)?;
        if let Some(checks) = &self.checks {
            writeln!(f, "  eid(): {} (expected {})", checks.eid, self.expected_eid.as_u32())?;
            writeln!(f, "  isSupportedEid(Base): {}", checks.supports_base)?;
            writeln!(f, "  isSupportedEid(Solana): {}", checks.supports_solana)?;
            writeln!(f, "  defaultSendLibrary(Base): {}", checks.base_send_library)?;
        }
        Ok(())
    }
}

pub async fn probe_endpoint(
    inspector: &dyn EndpointInspector,
    network: &str,
    candidate: Address,
    expected_eid: EndpointId,
) -> ProbeReport {
    let span = spans::probe_endpoint(network, &candidate);

    async move {
        let code = inspector.code_at(candidate).await;
        let (code, checks) = match code {
            Err(e) => (ProbeCheck::Failed(e.to_string()), None),
            Ok(code) if code.is_empty() => (ProbeCheck::Ok(0), None),
            Ok(code) => {
                let checks = EndpointChecks {
                    code_len: code.len(),
                    eid: ProbeCheck::from_result(inspector.endpoint_eid(candidate).await),
                    supports_base: ProbeCheck::from_result(
                        inspector.is_supported_eid(candidate, EndpointId::Base).await,
                    ),
                    supports_solana: ProbeCheck::from_result(
                        inspector.is_supported_eid(candidate, EndpointId::Solana).await,
                    ),
                    base_send_library: ProbeCheck::from_result(
                        inspector
                            .default_send_library(candidate, EndpointId::Base)
                            .await,
                    ),
                };
                (ProbeCheck::Ok(code.len()), Some(checks))
            }
        };

        let report = ProbeReport {
            candidate,
            expected_eid,
            code,
            checks,
        };
        info!(verdict = %report.verdict(), event = "endpoint_probed");
        report
    }
    .instrument(span)
    .await
}

pub async fn probe_endpoints(
    inspector: &dyn EndpointInspector,
    network: &str,
    candidates: &[Address],
    expected_eid: EndpointId,
) -> Vec<ProbeReport> {
    let mut reports = Vec::with_capacity(candidates.len());
    for &candidate in candidates {
        reports.push(probe_endpoint(inspector, network, candidate, expected_eid).await);
    }
    reports
}
