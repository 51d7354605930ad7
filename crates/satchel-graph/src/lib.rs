//! # satchel-graph
//!
//! Module resolution and dependency discovery for the satchel bundler.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use satchel_config::BundleOptions;
//! use satchel_graph::{DependencyGraphWalker, NativeRuntime};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let walker = DependencyGraphWalker::new(Arc::new(NativeRuntime::new()));
//! let deps = walker
//!     .walk(Path::new("src/index.js"), &BundleOptions::default())
//!     .await?;
//! for path in deps.iter() {
//!     println!("{}", path.display());
//! }
//! # Ok(()) }
//! ```

pub mod dependency_set;
pub mod references;
pub mod resolver;
pub mod runtime;
pub mod walker;

pub use dependency_set::DependencySet;
pub use references::{ModuleReference, ReferenceKind, extract_references};
pub use resolver::ModuleResolver;
pub use runtime::{
    FileMetadata, MemoryRuntime, NativeRuntime, Runtime, RuntimeError, RuntimeResult,
};
pub use walker::{
    DependencyGraphWalker, UnresolvedReference, WalkError, WalkReport, project_root,
};
