//! Per-walk state threaded through recursive visits.

use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, join_all};
use parking_lot::Mutex;
use satchel_config::BundleOptions;

use super::{UnresolvedReference, WalkError, WalkReport};
use crate::dependency_set::DependencySet;
use crate::references::extract_references;
use crate::resolver::ModuleResolver;

/// State for one walk.
///
/// The set is only touched between suspension points and the lock is never
/// held across an `.await`.
pub(super) struct WalkContext<'a> {
    resolver: &'a ModuleResolver,
    options: &'a BundleOptions,
    dependencies: Mutex<DependencySet>,
    unresolved: Mutex<Vec<UnresolvedReference>>,
    failed: Mutex<Vec<PathBuf>>,
}

impl<'a> WalkContext<'a> {
    pub(super) fn new(resolver: &'a ModuleResolver, options: &'a BundleOptions) -> Self {
        Self {
            resolver,
            options,
            dependencies: Mutex::new(DependencySet::new()),
            unresolved: Mutex::new(Vec::new()),
            failed: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn into_report(self) -> WalkReport {
        WalkReport {
            dependencies: self.dependencies.into_inner(),
            unresolved: self.unresolved.into_inner(),
            failed: self.failed.into_inner(),
        }
    }

    /// Visit `path` at `depth`, then its references at `depth + 1`.
    ///
    /// Membership is checked and recorded in one step before any I/O, so a
    /// cycle or a second route to the same file stops here.
    pub(super) fn visit(&'a self, path: PathBuf, depth: usize) -> BoxFuture<'a, Result<(), WalkError>> {
        Box::pin(async move {
            if self.options.is_ignored(&path.to_string_lossy()) {
                tracing::trace!(path = %path.display(), "ignored");
                return Ok(());
            }

            if depth > self.options.max_depth {
                return Ok(());
            }

            let inserted = self.dependencies.lock().insert(path.clone());
            if !inserted {
                return Ok(());
            }

            let source = self.read_source(&path).await?;
            let references = extract_references(&source);

            let branches = references.into_iter().map(|reference| {
                let from = path.as_path();
                async move {
                    if reference.is_bare() {
                        tracing::trace!(specifier = %reference.specifier, "external reference");
                        return;
                    }

                    let resolved = self
                        .resolver
                        .resolve(&reference.specifier, from, self.options)
                        .await;

                    match resolved {
                        Some(child) => {
                            if let Err(err) = self.visit(child.clone(), depth + 1).await {
                                tracing::warn!(
                                    specifier = %reference.specifier,
                                    from = %from.display(),
                                    error = %err,
                                    "could not load dependency"
                                );
                                self.failed.lock().push(child);
                            }
                        }
                        None => {
                            tracing::warn!(
                                specifier = %reference.specifier,
                                from = %from.display(),
                                "could not resolve dependency"
                            );
                            self.unresolved.lock().push(UnresolvedReference {
                                specifier: reference.specifier,
                                from: from.to_path_buf(),
                            });
                        }
                    }
                }
            });

            join_all(branches).await;
            Ok(())
        })
    }

    async fn read_source(&self, path: &Path) -> Result<String, WalkError> {
        let bytes = self
            .resolver
            .runtime()
            .read_file(path)
            .await
            .map_err(|source| WalkError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        String::from_utf8(bytes).map_err(|_| WalkError::InvalidUtf8 {
            path: path.to_path_buf(),
        })
    }
}
