//! Loading options from a JSON file and the environment.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized};

use crate::error::{ConfigError, Result};
use crate::options::BundleOptions;

/// Prefix for environment overrides (`SATCHEL_MINIFY=true`, `SATCHEL_TARGET=server`).
pub const ENV_PREFIX: &str = "SATCHEL_";

impl BundleOptions {
    /// Load options from multiple sources.
    /// Priority: environment variables > config file > defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(BundleOptions::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "loading bundle options");
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let options: BundleOptions = figment.extract()?;
        options.validate()?;
        Ok(options)
    }
}
