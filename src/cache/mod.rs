//! Address key caches.
//!
//! A postcode search is the most expensive step of a lookup, and its result
//! (house-number label -> server address key) changes rarely. Caches hold one
//! record per postcode and always replace a record wholesale; there is no
//! merging with a previous address set. Cached keys are hints: a miss simply
//! sends the caller back to the network.

mod file;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use file::FileAddressCache;
pub use memory::MemoryAddressCache;

/// House-number label -> address key for one postcode.
pub type AddressMap = BTreeMap<String, String>;

#[async_trait]
pub trait AddressKeyCache: Send + Sync {
    /// Cached key for `house_number` in `postcode`, if any.
    async fn lookup(&self, postcode: &str, house_number: &str) -> Option<String>;

    /// Replace the whole record for `postcode`.
    async fn store(&self, postcode: &str, addresses: &AddressMap) -> anyhow::Result<()>;
}

/// Cache that remembers nothing, for stateless callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl AddressKeyCache for NoCache {
    async fn lookup(&self, _postcode: &str, _house_number: &str) -> Option<String> {
        None
    }

    async fn store(&self, _postcode: &str, _addresses: &AddressMap) -> anyhow::Result<()> {
        Ok(())
    }
}
