//! Constructor arguments of the two bridge contracts

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolValue;

/// Token name and symbol of the Base OFT
pub const OFT_NAME: &str = "RDAT";
pub const OFT_SYMBOL: &str = "RDAT";

/// `RdatOFTAdapter(address token, address lzEndpoint, address delegate)`
pub fn adapter_constructor_args(token: Address, endpoint: Address, owner: Address) -> Bytes {
    (token, endpoint, owner).abi_encode_params().into()
}

/// `RdatOFT(string name, string symbol, address lzEndpoint, address delegate)`
pub fn oft_constructor_args(endpoint: Address, owner: Address) -> Bytes {
    (
        OFT_NAME.to_string(),
        OFT_SYMBOL.to_string(),
        endpoint,
        owner,
    )
        .abi_encode_params()
        .into()
}
