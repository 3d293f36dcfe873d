use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::debug;

use super::DomainRecord;

type Slot = Arc<OnceCell<Arc<DomainRecord>>>;

/// Per-batch map from domain to its [`DomainRecord`].
///
/// Each domain gets one slot. The first caller runs the population future;
/// concurrent callers for the same domain await that same future, later
/// callers read the stored record. A batch therefore issues at most one
/// resolution and one catch-all probe per domain.
#[derive(Debug, Default)]
pub struct DomainCache {
    slots: DashMap<String, Slot>,
}

impl DomainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_populate<F, Fut>(&self, domain: &str, populate: F) -> Arc<DomainRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainRecord>,
    {
        // le verrou du shard est relâché avant tout await
        let slot: Slot = self.slots.entry(domain.to_string()).or_default().clone();
        slot.get_or_init(|| async {
            debug!(domain, "populating domain record");
            Arc::new(populate().await)
        })
        .await
        .clone()
    }

    /// The record for `domain`, if its population already completed.
    pub fn get(&self, domain: &str) -> Option<Arc<DomainRecord>> {
        self.slots
            .get(domain)
            .and_then(|slot| slot.get().cloned())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
