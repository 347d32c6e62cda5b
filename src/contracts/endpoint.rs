//! LayerZero `EndpointV2` read-only bindings used by the endpoint probe

use alloy_network::Ethereum;
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_sol_types::sol;
use tracing::debug;

use crate::protocol::EndpointId;
use EndpointV2::EndpointV2Instance;

/// Read-only view of a candidate endpoint contract
pub struct EndpointContract<P: Provider<Ethereum>> {
    instance: EndpointV2Instance<P>,
}

impl<P: Provider<Ethereum>> EndpointContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "endpoint_contract_initialized"
        );
        Self {
            instance: EndpointV2Instance::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    /// Endpoint id the contract reports for its own chain
    pub async fn eid(&self) -> Result<u32, alloy_contract::Error> {
        self.instance.eid().call().await
    }

    pub async fn is_supported_eid(&self, eid: EndpointId) -> Result<bool, alloy_contract::Error> {
        self.instance.isSupportedEid(eid.as_u32()).call().await
    }

    pub async fn default_send_library(
        &self,
        eid: EndpointId,
    ) -> Result<Address, alloy_contract::Error> {
        self.instance.defaultSendLibrary(eid.as_u32()).call().await
    }

    pub async fn default_receive_library(
        &self,
        eid: EndpointId,
    ) -> Result<Address, alloy_contract::Error> {
        self.instance.defaultReceiveLibrary(eid.as_u32()).call().await
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract EndpointV2 {
        function eid() external view returns (uint32);
        function isSupportedEid(uint32 eid) external view returns (bool);
        function defaultSendLibrary(uint32 eid) external view returns (address);
        function defaultReceiveLibrary(uint32 eid) external view returns (address);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;

    #[test]
    fn test_call_signatures() {
        insta::assert_snapshot!(EndpointV2::eidCall::SIGNATURE, @"eid()");
        insta::assert_snapshot!(EndpointV2::isSupportedEidCall::SIGNATURE, @"isSupportedEid(uint32)");
        insta::assert_snapshot!(EndpointV2::defaultSendLibraryCall::SIGNATURE, @"defaultSendLibrary(uint32)");
    }
}
