//! Extension and index-file probing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Whether `candidate` already ends in one of `extensions`.
pub fn has_listed_extension(candidate: &Path, extensions: &[String]) -> bool {
    let name = candidate.to_string_lossy();
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// `candidate` with `ext` appended verbatim (`./a.config` + `.js` = `./a.config.js`).
pub fn append_extension(candidate: &Path, ext: &str) -> PathBuf {
    let mut raw: OsString = candidate.as_os_str().to_owned();
    raw.push(ext);
    PathBuf::from(raw)
}

/// First `candidate + ext` that is a file, in extension order.
pub async fn try_extensions(
    candidate: &Path,
    extensions: &[String],
    runtime: &dyn Runtime,
) -> Option<PathBuf> {
    for ext in extensions {
        let with_ext = append_extension(candidate, ext);
        if runtime.is_file(&with_ext).await {
            return Some(with_ext);
        }
    }
    None
}

/// First `candidate/index + ext` that is a file, in extension order.
pub async fn try_index_files(
    candidate: &Path,
    extensions: &[String],
    runtime: &dyn Runtime,
) -> Option<PathBuf> {
    for ext in extensions {
        let index = candidate.join(format!("index{ext}"));
        if runtime.is_file(&index).await {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_extension_keeps_existing_dots() {
        assert_eq!(
            append_extension(Path::new("/app/a.config"), ".js"),
            PathBuf::from("/app/a.config.js")
        );
        assert_eq!(
            append_extension(Path::new("/app/b"), ".ts"),
            PathBuf::from("/app/b.ts")
        );
    }

    #[test]
    fn test_has_listed_extension() {
        let exts = vec![".js".to_string(), ".ts".to_string()];
        assert!(has_listed_extension(Path::new("/app/a.js"), &exts));
        assert!(!has_listed_extension(Path::new("/app/a.css"), &exts));
        assert!(!has_listed_extension(Path::new("/app/a"), &exts));
    }
}
