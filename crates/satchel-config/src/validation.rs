//! Schema checks on bundle options. No filesystem access.

use crate::error::{ConfigError, Result};
use crate::options::BundleOptions;

impl BundleOptions {
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(ConfigError::invalid(
                "extensions",
                "at least one extension is required",
            ));
        }

        if let Some(ext) = self.extensions.iter().find(|ext| !is_valid_extension(ext)) {
            return Err(ConfigError::invalid(
                "extensions",
                format!("'{ext}' must start with '.' and contain no path separators"),
            ));
        }

        if self.ignore_patterns.iter().any(|pattern| pattern.is_empty()) {
            // An empty substring matches every path.
            return Err(ConfigError::invalid(
                "ignore_patterns",
                "patterns must not be empty",
            ));
        }

        Ok(())
    }
}

fn is_valid_extension(ext: &str) -> bool {
    ext.len() > 1 && ext.starts_with('.') && !ext.contains(['/', '\\'])
}
