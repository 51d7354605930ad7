//! Delivery target for an assembled bundle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How modules are laid out in the assembled bundle.
///
/// `Server` bundles are plain concatenations meant to run under the host
/// runtime's own module loader. Every other target wraps each module in a
/// registration call and ships a small `require` prelude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Server,
    #[default]
    Browser,
    Universal,
}

impl Target {
    /// Whether modules are wrapped in registration calls.
    pub fn wraps_modules(&self) -> bool {
        !matches!(self, Target::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Server => "server",
            Target::Browser => "browser",
            Target::Universal => "universal",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" | "node" => Ok(Target::Server),
            "browser" | "client" => Ok(Target::Browser),
            "universal" => Ok(Target::Universal),
            other => Err(ConfigError::invalid(
                "target",
                format!("unknown target '{other}', expected server, browser or universal"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_server_is_unwrapped() {
        assert!(!Target::Server.wraps_modules());
        assert!(Target::Browser.wraps_modules());
        assert!(Target::Universal.wraps_modules());
    }

    #[test]
    fn test_target_from_str() {
        assert_eq!("server".parse::<Target>().unwrap(), Target::Server);
        assert_eq!("BROWSER".parse::<Target>().unwrap(), Target::Browser);
        assert_eq!("universal".parse::<Target>().unwrap(), Target::Universal);
        assert_eq!("node".parse::<Target>().unwrap(), Target::Server);
        assert!("edge".parse::<Target>().is_err());
    }

    #[test]
    fn test_target_serde_is_lowercase() {
        let json = serde_json::to_string(&Target::Universal).unwrap();
        assert_eq!(json, "\"universal\"");
        let parsed: Target = serde_json::from_str("\"server\"").unwrap();
        assert_eq!(parsed, Target::Server);
    }
}
