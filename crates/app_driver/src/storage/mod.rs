//! Flash-backed key-value persistence.
//!
//! The shape follows the NVS-style API of embedded SDKs: open a namespace,
//! read or write single-byte entries, commit, close. Closing is dropping the
//! handle; anything written but not committed is discarded.

mod durable;
mod file;
mod memory;

use std::path::PathBuf;

pub use durable::DEFAULT_NAMESPACE;
pub use durable::DurableStateStore;
pub use durable::StateKey;
pub use file::FileFlash;
pub use memory::MemoryFlash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("namespace '{0}' has never been written")]
    NamespaceNotFound(String),

    #[error("namespace '{0}' was opened read-only")]
    ReadOnly(String),

    #[error("flash I/O failed on {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("corrupt namespace document {0}: {1}")]
    Serde(PathBuf, #[source] serde_json::Error),

    #[error("flash backend unavailable: {0}")]
    Backend(String),
}

/// A flash medium that hands out namespace handles.
pub trait Flash: Send {
    type Handle: FlashHandle;

    fn open(&self, namespace: &str, mode: OpenMode) -> Result<Self::Handle, StoreError>;
}

/// An open namespace. Dropping the handle closes it.
pub trait FlashHandle {
    fn get_u8(&self, key: &str) -> Result<Option<u8>, StoreError>;

    fn set_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError>;

    /// Make every `set_u8` since open durable, all at once.
    fn commit(&mut self) -> Result<(), StoreError>;
}
