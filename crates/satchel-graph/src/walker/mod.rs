//! Dependency graph walking.
//!
//! Starting from an entry file, the walker reads each module, extracts its
//! references, resolves them and recurses. Resolution of sibling references
//! fans out concurrently and is joined before the parent visit returns.

mod context;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use satchel_config::BundleOptions;
use serde::{Deserialize, Serialize};

use crate::dependency_set::DependencySet;
use crate::resolver::ModuleResolver;
use crate::runtime::{Runtime, RuntimeError, RuntimeResult};

use context::WalkContext;

/// Errors that abort a walk.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// A discovered file exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// A discovered file is not valid UTF-8.
    #[error("'{path}' is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    /// The working directory needed to anchor a relative entry is unavailable.
    #[error("failed to determine working directory: {0}")]
    Cwd(#[source] RuntimeError),
}

impl WalkError {
    /// Path of the file that could not be read, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WalkError::ReadFile { path, .. } | WalkError::InvalidUtf8 { path } => Some(path),
            WalkError::Cwd(_) => None,
        }
    }
}

/// A path-style reference that matched no file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub specifier: String,
    pub from: PathBuf,
}

/// Everything a walk learned.
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub dependencies: DependencySet,
    /// Path-style references that resolved to nothing. Bare references are
    /// external by definition and never listed here.
    pub unresolved: Vec<UnresolvedReference>,
    /// Non-entry files whose visit failed. They stay in `dependencies`.
    pub failed: Vec<PathBuf>,
}

/// Discovers the transitive closure of files reachable from an entry.
#[derive(Debug, Clone)]
pub struct DependencyGraphWalker {
    resolver: ModuleResolver,
}

impl DependencyGraphWalker {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self {
            resolver: ModuleResolver::new(runtime),
        }
    }

    pub fn with_resolver(resolver: ModuleResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Walk from `entry` and return every reachable file.
    ///
    /// Fails only when the entry itself cannot be read. Unresolved references
    /// and failures below the entry are logged as warnings.
    pub async fn walk(
        &self,
        entry: &Path,
        options: &BundleOptions,
    ) -> Result<DependencySet, WalkError> {
        Ok(self.walk_with_report(entry, options).await?.dependencies)
    }

    /// Like [`walk`](Self::walk), also returning unresolved references.
    #[tracing::instrument(skip(self, options), fields(entry = %entry.display()))]
    pub async fn walk_with_report(
        &self,
        entry: &Path,
        options: &BundleOptions,
    ) -> Result<WalkReport, WalkError> {
        let entry = self.absolute_entry(entry, options)?;
        let context = WalkContext::new(&self.resolver, options);

        context.visit(entry, 0).await?;

        let report = context.into_report();
        tracing::debug!(
            modules = report.dependencies.len(),
            unresolved = report.unresolved.len(),
            "walk complete"
        );
        Ok(report)
    }

    fn absolute_entry(&self, entry: &Path, options: &BundleOptions) -> Result<PathBuf, WalkError> {
        if entry.is_absolute() {
            return Ok(entry.clean());
        }

        let root = project_root(self.resolver.runtime().as_ref(), options).map_err(WalkError::Cwd)?;
        Ok(root.join(entry).clean())
    }
}

/// Absolute, normalized project root: `options.root` anchored at the runtime
/// cwd when relative, or the cwd itself.
///
/// Relative entries are joined to this root and module ids are taken relative
/// to it, so both sides must agree on its exact form.
pub fn project_root(runtime: &dyn Runtime, options: &BundleOptions) -> RuntimeResult<PathBuf> {
    match &options.root {
        Some(root) if root.is_absolute() => Ok(root.clean()),
        Some(root) => Ok(runtime.get_cwd()?.join(root).clean()),
        None => Ok(runtime.get_cwd()?.clean()),
    }
}
