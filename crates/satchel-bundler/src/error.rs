//! Error types for bundle generation.

use std::path::PathBuf;

use satchel_config::ConfigError;
use satchel_graph::{RuntimeError, WalkError};

/// Result type for bundler operations.
pub type Result<T> = std::result::Result<T, BundleError>;

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The walk produced nothing to bundle, e.g. the entry is ignored.
    #[error("no dependencies found for '{entry}'")]
    NoDependencies { entry: PathBuf },

    #[error(transparent)]
    Walk(#[from] WalkError),

    /// A module discovered by the walk could not be read during assembly.
    #[error("failed to read module '{path}': {source}")]
    ReadModule {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("module '{path}' is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    /// The project root used for module ids could not be determined.
    #[error("failed to determine project root: {0}")]
    Root(#[source] RuntimeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize bundle: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Boundary error returned by [`Bundler::generate_bundle`](crate::Bundler::generate_bundle).
    #[error("failed to generate bundle for '{entry}': {source}")]
    Generate {
        entry: PathBuf,
        #[source]
        source: Box<BundleError>,
    },
}

impl BundleError {
    /// The innermost error, looking through [`BundleError::Generate`].
    pub fn root_cause(&self) -> &BundleError {
        match self {
            BundleError::Generate { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
