//! Production implementations of the trait abstractions.
//!
//! These talk to real networks: the alloy-backed chain client, the
//! Etherscan-compatible explorer client and the Tokio clock. Tests use the
//! fakes in [`crate::testing`] instead.

mod alloy;
mod explorer;
mod tokio_clock;

pub use self::alloy::{AlloyChainClient, AlloyOApp, AlloyToken};
pub use self::explorer::EtherscanVerifier;
pub use self::tokio_clock::TokioClock;
