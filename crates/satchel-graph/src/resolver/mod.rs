//! Module resolution for relative and absolute references.
//!
//! Only path-style references are resolved. Bare references (`react`,
//! `node:fs`) are left to the host runtime and always yield `None`.

mod extensions;

pub use extensions::{append_extension, has_listed_extension, try_extensions, try_index_files};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use satchel_config::BundleOptions;

use crate::runtime::Runtime;

/// Turns a module reference into the file it points at.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    runtime: Arc<dyn Runtime>,
}

impl ModuleResolver {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    /// Resolve `reference` as seen from `from_file`.
    ///
    /// Probe order:
    /// 1. the candidate itself, if it already ends in a listed extension
    /// 2. candidate + each extension
    /// 3. candidate/index + each extension
    ///
    /// A missing file is a normal outcome and returns `None`.
    pub async fn resolve(
        &self,
        reference: &str,
        from_file: &Path,
        options: &BundleOptions,
    ) -> Option<PathBuf> {
        if !(reference.starts_with('.') || reference.starts_with('/')) {
            return None;
        }

        let candidate = candidate_path(reference, from_file);
        let runtime = self.runtime.as_ref();

        if has_listed_extension(&candidate, &options.extensions) {
            return runtime.is_file(&candidate).await.then_some(candidate);
        }

        if let Some(found) = try_extensions(&candidate, &options.extensions, runtime).await {
            return Some(found);
        }

        let found = try_index_files(&candidate, &options.extensions, runtime).await;
        if found.is_none() {
            tracing::trace!(reference, from = %from_file.display(), "no file matched reference");
        }
        found
    }
}

/// `normalize(dirname(from_file) + reference)`.
///
/// Absolute references replace the directory entirely.
pub fn candidate_path(reference: &str, from_file: &Path) -> PathBuf {
    let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    dir.join(reference).clean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MemoryRuntime;

    fn resolver(runtime: MemoryRuntime) -> ModuleResolver {
        ModuleResolver::new(Arc::new(runtime))
    }

    #[test]
    fn test_candidate_path_normalizes() {
        let from = Path::new("/app/src/pages/home.js");
        assert_eq!(
            candidate_path("../lib/./util", from),
            PathBuf::from("/app/src/lib/util")
        );
        assert_eq!(candidate_path("/abs/x", from), PathBuf::from("/abs/x"));
    }

    #[tokio::test]
    async fn test_bare_reference_is_not_resolved() {
        let runtime = MemoryRuntime::new("/app").with_file("react.js", "");
        let options = BundleOptions::default();
        let from = Path::new("/app/index.js");

        assert_eq!(resolver(runtime).resolve("react", from, &options).await, None);
    }

    #[tokio::test]
    async fn test_explicit_extension_must_exist() {
        let runtime = MemoryRuntime::new("/app").with_file("b.js", "");
        let options = BundleOptions::default();
        let from = Path::new("/app/a.js");
        let resolver = resolver(runtime);

        assert_eq!(
            resolver.resolve("./b.js", from, &options).await,
            Some(PathBuf::from("/app/b.js"))
        );
        assert_eq!(resolver.resolve("./c.js", from, &options).await, None);
    }

    #[tokio::test]
    async fn test_extension_probe_follows_configured_order() {
        let runtime = MemoryRuntime::new("/app")
            .with_file("util.ts", "")
            .with_file("util.js", "");
        let from = Path::new("/app/a.js");
        let resolver = resolver(runtime);

        let js_first = BundleOptions::default().with_extensions([".js", ".ts"]);
        assert_eq!(
            resolver.resolve("./util", from, &js_first).await,
            Some(PathBuf::from("/app/util.js"))
        );

        let ts_first = BundleOptions::default().with_extensions([".ts", ".js"]);
        assert_eq!(
            resolver.resolve("./util", from, &ts_first).await,
            Some(PathBuf::from("/app/util.ts"))
        );
    }

    #[tokio::test]
    async fn test_directory_index_fallback() {
        let runtime = MemoryRuntime::new("/app").with_file("components/index.jsx", "");
        let options = BundleOptions::default();
        let from = Path::new("/app/main.js");

        assert_eq!(
            resolver(runtime).resolve("./components", from, &options).await,
            Some(PathBuf::from("/app/components/index.jsx"))
        );
    }

    #[tokio::test]
    async fn test_file_wins_over_directory_index() {
        let runtime = MemoryRuntime::new("/app")
            .with_file("lib.js", "")
            .with_file("lib/index.js", "");
        let options = BundleOptions::default();
        let from = Path::new("/app/main.js");

        assert_eq!(
            resolver(runtime).resolve("./lib", from, &options).await,
            Some(PathBuf::from("/app/lib.js"))
        );
    }

    #[tokio::test]
    async fn test_unresolved_returns_none() {
        let runtime = MemoryRuntime::new("/app");
        let options = BundleOptions::default();
        let from = Path::new("/app/main.js");

        assert_eq!(resolver(runtime).resolve("./missing", from, &options).await, None);
    }
}
