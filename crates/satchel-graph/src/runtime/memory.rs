//! In-memory runtime for embedders and tests.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use path_clean::PathClean;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// `Runtime` serving files from a map.
///
/// Directories are implied by the files stored under them. Reads are counted
/// so callers can check that a cached bundle did not touch the filesystem.
/// Clones share the same files and counters.
#[derive(Debug, Clone)]
pub struct MemoryRuntime {
    cwd: PathBuf,
    files: Arc<RwLock<FxHashMap<PathBuf, Vec<u8>>>>,
    unreadable: Arc<RwLock<FxHashSet<PathBuf>>>,
    reads: Arc<AtomicUsize>,
    reads_by_path: Arc<Mutex<FxHashMap<PathBuf, usize>>>,
}

impl MemoryRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into().clean(),
            files: Arc::new(RwLock::new(FxHashMap::default())),
            unreadable: Arc::new(RwLock::new(FxHashSet::default())),
            reads: Arc::new(AtomicUsize::new(0)),
            reads_by_path: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Add or replace a file. Relative paths are taken from the cwd.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = self.absolute(path.as_ref());
        self.unreadable.write().remove(&path);
        self.files.write().insert(path, content.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Register a file that exists but fails every read.
    pub fn insert_unreadable(&self, path: impl AsRef<Path>) {
        let path = self.absolute(path.as_ref());
        self.files.write().insert(path.clone(), Vec::new());
        self.unreadable.write().insert(path);
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        let path = self.absolute(path.as_ref());
        self.unreadable.write().remove(&path);
        self.files.write().remove(&path).is_some()
    }

    /// Total successful and failed reads so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Reads of a single path so far.
    pub fn reads_of(&self, path: impl AsRef<Path>) -> usize {
        let path = self.absolute(path.as_ref());
        self.reads_by_path.lock().get(&path).copied().unwrap_or(0)
    }

    pub fn reset_read_counts(&self) {
        self.reads.store(0, Ordering::SeqCst);
        self.reads_by_path.lock().clear();
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf().clean()
        } else {
            self.cwd.join(path).clean()
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = self.absolute(path);
        self.reads.fetch_add(1, Ordering::SeqCst);
        *self.reads_by_path.lock().entry(path.clone()).or_default() += 1;

        if self.unreadable.read().contains(&path) {
            return Err(RuntimeError::Io(format!(
                "Failed to read {}: permission denied",
                path.display()
            )));
        }

        self.files
            .read()
            .get(&path)
            .cloned()
            .ok_or(RuntimeError::FileNotFound(path))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = self.absolute(path);
        if let Some(content) = self.files.read().get(&path) {
            return Ok(FileMetadata {
                size: content.len() as u64,
                is_dir: false,
                is_file: true,
                modified: None,
            });
        }

        if self.is_dir(&path) {
            return Ok(FileMetadata {
                size: 0,
                is_dir: true,
                is_file: false,
                modified: None,
            });
        }

        Err(RuntimeError::FileNotFound(path))
    }

    fn exists(&self, path: &Path) -> bool {
        let path = self.absolute(path);
        self.files.read().contains_key(&path) || self.is_dir(&path)
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_files_and_implied_directories() {
        let runtime = MemoryRuntime::new("/app").with_file("src/lib/index.js", "x");

        assert!(runtime.exists(Path::new("/app/src/lib/index.js")));
        assert!(runtime.exists(Path::new("/app/src/lib")));
        assert!(!runtime.exists(Path::new("/app/src/other")));

        let dir = runtime.metadata(Path::new("/app/src")).await.unwrap();
        assert!(dir.is_dir);
        assert!(runtime.is_file(Path::new("/app/src/lib/index.js")).await);
        assert!(!runtime.is_file(Path::new("/app/src/lib")).await);
    }

    #[tokio::test]
    async fn test_reads_are_counted_per_path() {
        let runtime = MemoryRuntime::new("/app").with_file("a.js", "a");

        runtime.read_file(Path::new("/app/a.js")).await.unwrap();
        runtime.read_file(Path::new("a.js")).await.unwrap();
        let _ = runtime.read_file(Path::new("/app/b.js")).await;

        assert_eq!(runtime.read_count(), 3);
        assert_eq!(runtime.reads_of("a.js"), 2);
        assert_eq!(runtime.reads_of("/app/b.js"), 1);

        runtime.reset_read_counts();
        assert_eq!(runtime.read_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_file_exists_but_fails() {
        let runtime = MemoryRuntime::new("/app");
        runtime.insert_unreadable("secret.js");

        assert!(runtime.exists(Path::new("/app/secret.js")));
        let err = runtime.read_file(Path::new("/app/secret.js")).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Io(_)));
    }
}
