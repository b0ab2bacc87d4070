#![allow(dead_code)]

use std::sync::Arc;
use tagpath::infrastructure::MemoryStore;
use tagpath::Tagger;

/// Install a test-writer subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Tagger over a fresh in-memory store, with the store shared for inspection
pub fn memory_tagger() -> (Tagger<Arc<MemoryStore>>, Arc<MemoryStore>) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    (Tagger::new(store.clone()), store)
}

/// Sort keys so assertions do not depend on store ordering
pub fn sorted(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys
}
