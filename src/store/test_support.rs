use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    error::Result,
    store::{KeyValueStore, MemoryStore},
};

/// Memory store whose writes can be switched to fail.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.set(key, value)
    }
}
