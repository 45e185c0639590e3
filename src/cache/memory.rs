use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{AddressKeyCache, AddressMap};

/// Process-local cache, used by the long-running HTTP service.
#[derive(Debug, Clone, Default)]
pub struct MemoryAddressCache {
    /// postcode -> address set
    entries: Arc<DashMap<String, Arc<AddressMap>>>,
}

impl MemoryAddressCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressKeyCache for MemoryAddressCache {
    async fn lookup(&self, postcode: &str, house_number: &str) -> Option<String> {
        let record = self.entries.get(postcode)?.clone();
        record.get(house_number).cloned()
    }

    async fn store(&self, postcode: &str, addresses: &AddressMap) -> anyhow::Result<()> {
        self.entries
            .insert(postcode.to_owned(), Arc::new(addresses.clone()));
        Ok(())
    }
}
