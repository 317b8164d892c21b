//! Structured error types for the pagecut engine.
//!
//! Layout-measurement anomalies (a missing margin, an unmeasured box) are
//! never errors — the split pass substitutes zero and moves on. What can
//! actually fail is the boundary with the outside world: the rasterizer,
//! the host shell, the filesystem, and snapshot parsing.

use thiserror::Error;

/// The unified error type returned by all public pagecut API functions.
#[derive(Debug, Error)]
pub enum PagecutError {
    /// The external rasterization engine rejected the render (e.g. a
    /// tainted canvas from cross-origin content). Propagated once, no retry.
    #[error("rasterization failed: {0}")]
    Raster(String),

    /// A JSON content snapshot did not match the expected shape.
    #[error("invalid content snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The print host cannot perform the requested operation.
    #[error("host operation failed: {0}")]
    Host(String),

    /// `print`/`preview`/`save` was called before a successful `init`.
    #[error("printer session not initialized")]
    NoSession,

    /// Writing the output document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
