//! Insertion-ordered set of resolved module paths.

use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// Absolute paths reachable from an entry file, unique by path.
///
/// Iteration follows first-insertion order, which is the chunk order of the
/// assembled bundle. The first path inserted by a walk is the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencySet {
    paths: FxIndexSet<PathBuf>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path`, returning `false` if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The first inserted path.
    pub fn entry(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a PathBuf;
    type IntoIter = indexmap::set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl IntoIterator for DependencySet {
    type Item = PathBuf;
    type IntoIter = indexmap::set::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl FromIterator<PathBuf> for DependencySet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent_and_ordered() {
        let mut set = DependencySet::new();
        assert!(set.insert(PathBuf::from("/app/a.js")));
        assert!(set.insert(PathBuf::from("/app/b.js")));
        assert!(!set.insert(PathBuf::from("/app/a.js")));

        assert_eq!(set.len(), 2);
        assert_eq!(set.entry(), Some(Path::new("/app/a.js")));
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![Path::new("/app/a.js"), Path::new("/app/b.js")]);
    }

    #[test]
    fn test_serde_keeps_order() {
        let set: DependencySet = ["/z.js", "/a.js", "/m.js"].into_iter().map(PathBuf::from).collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["/z.js","/a.js","/m.js"]"#);

        let back: DependencySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
