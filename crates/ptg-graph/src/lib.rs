//! # ptg-graph
//!
//! Page transition graph (PTG) extraction for HarmonyOS ArkTS/ETS projects.
//!
//! A PTG maps every main page of an application to the navigation edges
//! (triggering component, event, target page) reachable from it. This crate
//! holds the extraction engine; the component that actually reads source code
//! and reports navigation calls is plugged in through the
//! [`NavigationExtractor`] trait (see the `ptg-llm` crate for model-backed
//! implementations).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      TraversalEngine                         │
//! │   (main pages -> depth-first walk over local imports)        │
//! └───────┬──────────────┬──────────────┬──────────────┬─────────┘
//!         │              │              │              │
//!         ▼              ▼              ▼              ▼
//!  ┌────────────┐ ┌─────────────┐ ┌────────────┐ ┌─────────────┐
//!  │ RouteConst │ │ ModuleRes-  │ │ Navigation │ │  PtgMemory  │
//!  │  scanner   │ │ olver       │ │ Extractor  │ │ (edges,     │
//!  │ (once)     │ │ (per file)  │ │ (per file) │ │  de-dup)    │
//!  └────────────┘ └─────────────┘ └─────┬──────┘ └─────────────┘
//!                                       │
//!                                       ▼
//!                              parse_response +
//!                              resolve_target
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use ptg_graph::{
//!     ExtractionRequest, ExtractorError, NativeRuntime, NavigationExtractor,
//!     TraversalEngine, WalkerConfig,
//! };
//!
//! struct NoNavigation;
//!
//! #[async_trait]
//! impl NavigationExtractor for NoNavigation {
//!     async fn extract(&self, _request: &ExtractionRequest) -> Result<String, ExtractorError> {
//!         Ok("[]".to_string())
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WalkerConfig::new(
//!     "MyApp",
//!     "MyApp/entry/src/main/resources/base/profile/main_pages.json",
//!     "MyApp/entry/src/main/ets",
//! );
//! let engine = TraversalEngine::new(config, Arc::new(NativeRuntime::new()), Arc::new(NoNavigation));
//! let outcome = engine.run().await?;
//! println!("{}", outcome.memory.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod dependency_chain;
pub mod extraction;
pub mod imports;
pub mod manifest;
pub mod memory;
pub mod paths;
pub mod route_constants;
pub mod runtime;
pub mod target;
pub mod walker;


pub use dependency_chain::{DependencyChain, DependencyGraph};
pub use extraction::{
    EmptyReason, ExtractionRequest, ExtractorError, ExtractorFailurePolicy, NavigationExtractor,
    ParseLayer, ParseOutcome, parse_response, strip_json_fence,
};
pub use imports::{ModuleResolver, extract_imports, nested_component_files};
pub use manifest::{ManifestError, load_main_pages, parse_main_pages};
pub use memory::{ComponentRef, Edge, EdgeKey, Ptg, PtgMemory, RawEdge};
pub use route_constants::{RouteConstants, ScanLimits, scan_route_constants};
pub use runtime::native::NativeRuntime;
pub use runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};
pub use target::resolve_target;
pub use walker::{
    RunOutcome, RunStats, TraversalEngine, TraversalLimits, WalkerConfig, WalkerError,
    ptg_output_path,
};

/// Error type for graph operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;
