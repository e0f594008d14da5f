//! Key-value persistence for the session record.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Synchronous string store. A `set` must never leave a partially written
/// value visible to a later `get`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support;
