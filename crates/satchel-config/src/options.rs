//! Bundle options with explicit defaults and a partial override layer.

use std::path::PathBuf;

use figment::Figment;
use figment::providers::Serialized;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::target::Target;

/// Extensions probed during resolution, in probe order.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".json"];

/// Default maximum traversal depth below the entry file.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Paths containing any of these substrings are never walked.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["node_modules"];

/// Options for a single bundle request.
///
/// Immutable once handed to the bundler. Serializes deterministically, so
/// the JSON form doubles as part of the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleOptions {
    /// Extensions to probe, including the leading dot.
    pub extensions: Vec<String>,

    /// Maximum depth below the entry file. `0` bundles the entry alone.
    pub max_depth: usize,

    /// Substrings that exclude a path from traversal.
    pub ignore_patterns: Vec<String>,

    /// Strip comments and non-semantic whitespace from the output.
    pub minify: bool,

    /// Prefix every module chunk with a `// File: <id>` marker.
    pub comments: bool,

    pub target: Target,

    /// Emit a hydration bootstrap next to the bundle.
    pub hydrate: bool,

    /// Project root used to derive module ids. Defaults to the runtime cwd.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
            minify: false,
            comments: false,
            target: Target::default(),
            hydrate: false,
            root: None,
        }
    }
}

/// Per-request overrides. Unset fields keep the value underneath.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialBundleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydrate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl BundleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `overrides` on top of the defaults.
    pub fn merged(overrides: &PartialBundleOptions) -> Result<Self> {
        Self::default().merge(overrides)
    }

    /// Layer `overrides` on top of `self`, returning a new value.
    pub fn merge(&self, overrides: &PartialBundleOptions) -> Result<Self> {
        let options: BundleOptions = Figment::new()
            .merge(Serialized::defaults(self))
            .merge(Serialized::defaults(overrides))
            .extract()?;
        Ok(options)
    }

    /// Deterministic JSON form, used for cache keys.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_hydrate(mut self, hydrate: bool) -> Self {
        self.hydrate = hydrate;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_patterns(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }
}
