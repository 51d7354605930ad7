//! Turning a dependency set into a single bundle.

mod prelude;

use std::path::Path;
use std::sync::Arc;

use futures::future::try_join_all;
use satchel_config::BundleOptions;
use satchel_graph::{DependencySet, Runtime, project_root};
use serde::{Deserialize, Serialize};

use crate::cache::content_hash;
use crate::error::{BundleError, Result};
use crate::minify::minify;

/// Output of a successful bundle request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleResult {
    /// Final bundle text.
    pub code: String,

    /// Every module included, entry first.
    pub dependencies: DependencySet,

    /// 32 lowercase hex characters derived from `code`.
    pub hash: String,

    /// Browser bootstrap, present only when hydration was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration_code: Option<String>,
}

/// Concatenates module sources into one bundle.
#[derive(Debug, Clone)]
pub struct BundleAssembler {
    runtime: Arc<dyn Runtime>,
}

impl BundleAssembler {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    /// Assemble `dependencies` into a bundle whose entry is `entry`.
    ///
    /// Modules are emitted in dependency-set order. For targets that wrap
    /// modules the output is the runtime prelude, one registration per
    /// module, then a `require` of the entry. The server target concatenates
    /// sources as-is.
    #[tracing::instrument(skip_all, fields(entry = %entry.display(), modules = dependencies.len()))]
    pub async fn assemble(
        &self,
        entry: &Path,
        dependencies: &DependencySet,
        options: &BundleOptions,
    ) -> Result<BundleResult> {
        let root = project_root(self.runtime.as_ref(), options).map_err(BundleError::Root)?;
        let sources = try_join_all(dependencies.iter().map(|path| self.read_module(path))).await?;
        let wrap = options.target.wraps_modules();

        let mut parts = Vec::with_capacity(sources.len() + 2);
        if wrap {
            parts.push(prelude::runtime_prelude(&options.extensions, &root_id(&root))?);
        }

        for (path, source) in dependencies.iter().zip(&sources) {
            let id = module_id(path, &root);
            let body = if wrap {
                prelude::register_module(&id, source)?
            } else {
                source.clone()
            };

            if options.comments {
                parts.push(format!("// File: {id}\n{body}"));
            } else {
                parts.push(body);
            }
        }

        let entry_id = module_id(entry, &root);
        if wrap {
            parts.push(prelude::entry_require(&entry_id)?);
        }

        let mut code = parts.join("\n");
        if options.minify {
            code = minify(&code);
        }

        let hydration_code = if options.hydrate {
            let script = prelude::hydration_bootstrap(&entry_id)?;
            Some(if options.minify { minify(&script) } else { script })
        } else {
            None
        };

        let hash = content_hash(&code);
        tracing::debug!(bytes = code.len(), %hash, "bundle assembled");

        Ok(BundleResult {
            code,
            dependencies: dependencies.clone(),
            hash,
            hydration_code,
        })
    }

    async fn read_module(&self, path: &Path) -> Result<String> {
        let bytes = self
            .runtime
            .read_file(path)
            .await
            .map_err(|source| BundleError::ReadModule {
                path: path.to_path_buf(),
                source,
            })?;

        String::from_utf8(bytes).map_err(|_| BundleError::InvalidUtf8 {
            path: path.to_path_buf(),
        })
    }
}

/// Stable id for `path`: relative to `root` with `/` separators.
///
/// Paths outside `root` keep their full form.
pub fn module_id(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative
            .iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

/// `root` as the runtime prelude compares it against absolute references.
fn root_id(root: &Path) -> String {
    root.to_string_lossy()
        .replace('\\', "/")
        .trim_end_matches('/')
        .to_string()
}
