//! Key-value slots: the persistence layer under the collection store.
//!
//! A slot holds one serialized value under a fixed key. Backends only move
//! strings around; decoding is the store's job.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use crate::error::{DexError, Result};

#[async_trait]
pub trait SlotBackend: Send + Sync {
    /// Returns `None` when nothing has been written under `key`.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent slot is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// One JSON file per slot inside a data directory.
#[derive(Debug, Clone)]
pub struct FileSlots {
    root: PathBuf,
}

impl FileSlots {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl SlotBackend for FileSlots {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        // Staged beside the target, then renamed over it. An interrupted
        // write leaves the previous file in place.
        let staged = path.with_extension("json.tmp");
        tokio::fs::write(&staged, value).await?;
        tokio::fs::rename(&staged, &path).await.map_err(|err| {
            DexError::storage(format!("could not replace {}: {err}", path.display()))
        })?;
        debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
pub(crate) use memory::MemorySlots;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::SlotBackend;
    use crate::error::{DexError, Result};

    /// In-process slots for tests. Contents vanish with the process.
    #[derive(Debug, Default)]
    pub struct MemorySlots {
        values: Mutex<HashMap<String, String>>,
        read_only: bool,
        fail_reads: AtomicBool,
    }

    impl MemorySlots {
        pub fn new() -> Self {
            Self::default()
        }

        /// Slots that reject every mutation, for exercising storage failures.
        pub fn read_only() -> Self {
            Self {
                read_only: true,
                ..Self::default()
            }
        }

        pub fn with_value(self, key: &str, value: &str) -> Self {
            if let Ok(mut values) = self.values.lock() {
                values.insert(key.to_string(), value.to_string());
            }
            self
        }

        /// While set, every read fails as an unreachable backend would.
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        fn guard(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
            self.values
                .lock()
                .map_err(|_| DexError::storage("memory slots lock poisoned"))
        }

        fn ensure_writable(&self, key: &str) -> Result<()> {
            if self.read_only {
                return Err(DexError::storage(format!("slot `{key}` is read-only")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SlotBackend for MemorySlots {
        async fn read(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(DexError::storage(format!("slot `{key}` is unreachable")));
            }
            Ok(self.guard()?.get(key).cloned())
        }

        async fn write(&self, key: &str, value: &str) -> Result<()> {
            self.ensure_writable(key)?;
            self.guard()?.insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.ensure_writable(key)?;
            self.guard()?.remove(key);
            Ok(())
        }
    }

    #[async_trait]
    impl<T: SlotBackend + ?Sized> SlotBackend for Arc<T> {
        async fn read(&self, key: &str) -> Result<Option<String>> {
            (**self).read(key).await
        }

        async fn write(&self, key: &str, value: &str) -> Result<()> {
            (**self).write(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            (**self).remove(key).await
        }
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("critterdex-test-{}", uuid::Uuid::new_v4()))
}
