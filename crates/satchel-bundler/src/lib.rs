//! # satchel-bundler
//!
//! Bundles an entry module and everything it references into one script.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use satchel_bundler::{Bundler, BundleOptions, NativeRuntime, Target};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundler = Bundler::new(Arc::new(NativeRuntime::new()));
//! let options = BundleOptions::default()
//!     .with_target(Target::Browser)
//!     .with_minify(true);
//!
//! let bundle = bundler.generate_bundle("src/index.js", &options).await?;
//! println!("{} ({} modules)", bundle.hash, bundle.dependencies.len());
//! # Ok(()) }
//! ```
//!
//! Results are memoized per entry and options for the life of the
//! [`Bundler`]. Call [`Bundler::clear_cache`] after source files change.

pub mod assemble;
pub mod bundler;
pub mod cache;
pub mod error;
pub mod minify;

#[cfg(feature = "logging")]
pub mod logging;

pub use assemble::{BundleAssembler, BundleResult, module_id};
pub use bundler::{Bundler, ResultCache};
pub use cache::{BundleCache, CacheConfig, CacheStats, compute_cache_key, content_hash};
pub use error::{BundleError, Result};
pub use minify::minify;

pub use satchel_config::{BundleOptions, PartialBundleOptions, Target};
pub use satchel_graph::{
    DependencyGraphWalker, DependencySet, MemoryRuntime, ModuleResolver, NativeRuntime, Runtime,
};
