use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use super::Flash;
use super::FlashHandle;
use super::OpenMode;
use super::StoreError;

/// Flash emulated on a host filesystem: one JSON document per namespace.
#[derive(Debug, Clone)]
pub struct FileFlash {
    root: PathBuf,
}

impl FileFlash {
    /// The directory is created on the first commit, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, namespace: &str) -> PathBuf {
        self.root.join(format!("{}.json", namespace))
    }
}

fn read_document(path: &Path) -> Result<BTreeMap<String, u8>, StoreError> {
    let data = fs::read(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    serde_json::from_slice(&data).map_err(|e| StoreError::Serde(path.to_path_buf(), e))
}

impl Flash for FileFlash {
    type Handle = FileHandle;

    fn open(&self, namespace: &str, mode: OpenMode) -> Result<Self::Handle, StoreError> {
        let path = self.document_path(namespace);
        let entries = if path.exists() {
            match (read_document(&path), mode) {
                (Ok(entries), _) => entries,
                // A corrupt namespace is erased on the next commit, like NVS does.
                (Err(StoreError::Serde(_, e)), OpenMode::ReadWrite) => {
                    warn!(
                        "Discarding corrupt namespace '{}' at {}: {}",
                        namespace,
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
                (Err(e), _) => return Err(e),
            }
        } else if mode == OpenMode::ReadOnly {
            return Err(StoreError::NamespaceNotFound(namespace.to_string()));
        } else {
            BTreeMap::new()
        };

        Ok(FileHandle {
            root: self.root.clone(),
            path,
            namespace: namespace.to_string(),
            mode,
            entries,
        })
    }
}

#[derive(Debug)]
pub struct FileHandle {
    root: PathBuf,
    path: PathBuf,
    namespace: String,
    mode: OpenMode,
    entries: BTreeMap<String, u8>,
}

impl FileHandle {
    fn check_writable(&self) -> Result<(), StoreError> {
        match self.mode {
            OpenMode::ReadWrite => Ok(()),
            OpenMode::ReadOnly => Err(StoreError::ReadOnly(self.namespace.clone())),
        }
    }
}

impl FlashHandle for FileHandle {
    fn get_u8(&self, key: &str) -> Result<Option<u8>, StoreError> {
        Ok(self.entries.get(key).copied())
    }

    fn set_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.check_writable()?;
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |e: std::io::Error| StoreError::Io(path, e)
        };

        fs::create_dir_all(&self.root).map_err(io_err(&self.root))?;

        // Readers see either the old document or the new one, never a partial write.
        let tmp_path = self.path.with_extension("json.tmp");
        let payload = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| StoreError::Serde(self.path.clone(), e))?;
        let mut file = fs::File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        file.write_all(&payload).map_err(io_err(&tmp_path))?;
        file.sync_all().map_err(io_err(&tmp_path))?;
        fs::rename(&tmp_path, &self.path).map_err(io_err(&self.path))?;

        debug!("Committed namespace '{}' to {}", self.namespace, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_commit_creates_root_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nvs");
        let flash = FileFlash::new(&root);
        assert!(!root.exists());

        let mut handle = flash.open("light_config", OpenMode::ReadWrite).unwrap();
        assert!(!root.exists());
        handle.set_u8("power", 1).unwrap();
        handle.commit().unwrap();

        assert!(root.join("light_config.json").exists());
        assert!(!root.join("light_config.json.tmp").exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let flash = FileFlash::new(temp_dir.path());

        let mut handle = flash.open("light_config", OpenMode::ReadWrite).unwrap();
        handle.set_u8("power", 1).unwrap();
        handle.set_u8("brightness", 200).unwrap();
        handle.commit().unwrap();
        drop(handle);

        let reopened = FileFlash::new(temp_dir.path());
        let handle = reopened.open("light_config", OpenMode::ReadOnly).unwrap();
        assert_eq!(handle.get_u8("power").unwrap(), Some(1));
        assert_eq!(handle.get_u8("brightness").unwrap(), Some(200));
        assert_eq!(handle.get_u8("missing").unwrap(), None);
    }

    #[test]
    fn test_missing_namespace_read_only() {
        let temp_dir = TempDir::new().unwrap();
        let flash = FileFlash::new(temp_dir.path());
        assert!(matches!(
            flash.open("light_config", OpenMode::ReadOnly),
            Err(StoreError::NamespaceNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_document() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("light_config.json"), b"not json").unwrap();
        let flash = FileFlash::new(temp_dir.path());
        assert!(matches!(
            flash.open("light_config", OpenMode::ReadOnly),
            Err(StoreError::Serde(..))
        ));
    }

    #[test]
    fn test_corrupt_document_is_replaced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("light_config.json");
        fs::write(&path, b"garbage").unwrap();
        let flash = FileFlash::new(temp_dir.path());

        let mut handle = flash.open("light_config", OpenMode::ReadWrite).unwrap();
        assert_eq!(handle.get_u8("power").unwrap(), None);
        handle.set_u8("power", 1).unwrap();
        handle.commit().unwrap();
        drop(handle);

        let handle = flash.open("light_config", OpenMode::ReadOnly).unwrap();
        assert_eq!(handle.get_u8("power").unwrap(), Some(1));
    }
}
