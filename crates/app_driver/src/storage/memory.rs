use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use super::Flash;
use super::FlashHandle;
use super::OpenMode;
use super::StoreError;

type Namespaces = Arc<Mutex<HashMap<String, HashMap<String, u8>>>>;

/// Volatile flash. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlash {
    namespaces: Namespaces,
}

impl MemoryFlash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed value of `key`, bypassing the open/close cycle.
    pub fn peek(&self, namespace: &str, key: &str) -> Option<u8> {
        let namespaces = self.namespaces.lock().ok()?;
        namespaces.get(namespace)?.get(key).copied()
    }
}

impl Flash for MemoryFlash {
    type Handle = MemoryHandle;

    fn open(&self, namespace: &str, mode: OpenMode) -> Result<Self::Handle, StoreError> {
        let namespaces = self
            .namespaces
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let committed = match namespaces.get(namespace) {
            Some(entries) => entries.clone(),
            None if mode == OpenMode::ReadOnly => {
                return Err(StoreError::NamespaceNotFound(namespace.to_string()));
            }
            None => HashMap::new(),
        };

        Ok(MemoryHandle {
            namespaces: self.namespaces.clone(),
            namespace: namespace.to_string(),
            mode,
            committed,
            written: HashMap::new(),
        })
    }
}

#[derive(Debug)]
pub struct MemoryHandle {
    namespaces: Namespaces,
    namespace: String,
    mode: OpenMode,
    committed: HashMap<String, u8>,
    written: HashMap<String, u8>,
}

impl FlashHandle for MemoryHandle {
    fn get_u8(&self, key: &str) -> Result<Option<u8>, StoreError> {
        Ok(self
            .written
            .get(key)
            .or_else(|| self.committed.get(key))
            .copied())
    }

    fn set_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        if self.mode == OpenMode::ReadOnly {
            return Err(StoreError::ReadOnly(self.namespace.clone()));
        }
        self.written.insert(key.to_string(), value);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if self.mode == OpenMode::ReadOnly {
            return Err(StoreError::ReadOnly(self.namespace.clone()));
        }
        let mut namespaces = self
            .namespaces
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let entries = namespaces.entry(self.namespace.clone()).or_default();
        for (key, value) in self.written.drain() {
            entries.insert(key.clone(), value);
            self.committed.insert(key, value);
        }
        Ok(())
    }
}
