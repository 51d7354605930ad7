//! # satchel-config
//!
//! Options that drive a single bundle request.
//!
//! `BundleOptions` carries explicit defaults. Callers that only want to change
//! a few fields build a [`PartialBundleOptions`] and merge it on top with
//! [`BundleOptions::merged`]. Embedders that read settings from disk or the
//! environment use [`BundleOptions::load`].

pub mod error;
pub mod loading;
pub mod options;
pub mod target;
pub mod validation;

pub use error::{ConfigError, Result};
pub use options::{
    BundleOptions, DEFAULT_EXTENSIONS, DEFAULT_IGNORE_PATTERNS, DEFAULT_MAX_DEPTH,
    PartialBundleOptions,
};
pub use target::Target;
