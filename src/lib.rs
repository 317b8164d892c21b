//! # Pagecut
//!
//! A pagination engine for rendered content trees.
//!
//! The naive way to export an on-screen panel is to rasterize it and chop
//! the image every page-height pixels. That slices text lines, table rows
//! and images in half at every boundary. Pagecut does the moving *before*
//! the rasterizer runs: it reduces the measured content tree to atomic
//! units ("leaves"), finds every leaf that would straddle a page band,
//! and inserts exactly enough blank space — margins in normal flow, blank
//! rows inside tables — that the rendered output lines up with page
//! boundaries on its own. The tall raster is then sliced at band edges
//! that are guaranteed to fall in inserted blank space.
//!
//! ## Architecture
//!
//! ```text
//! Host snapshot (JSON/API)
//!       ↓
//!   [model]     — measured content tree: kinds, display, geometry
//!       ↓
//!   [layout]    — leaf extraction, break planning, spacer insertion
//!       ↓
//!   [raster]    — host rasterizer renders the mutated clone   (trait)
//!       ↓
//!   [assemble]  — slice the tall raster into page bands
//!       ↓
//!   [builder]   — multi-page output document                  (trait)
//! ```
//!
//! The engine trusts the geometry the host measured; it never computes
//! layout itself. Rasterization and document building are pluggable —
//! a reference PDF builder ships in [`pdf`].

pub mod assemble;
pub mod builder;
pub mod error;
pub mod events;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod options;
pub mod pdf;
pub mod raster;
pub mod session;

pub use assemble::assemble;
pub use builder::{DocumentBuilder, ImageFormat, Orientation, PageSize, Size};
pub use error::PagecutError;
pub use events::PrintEvent;
pub use model::{ContentTree, NodeId, NodeSnapshot};
pub use options::PrintOptions;
pub use pdf::PdfBuilder;
pub use raster::{RasterOptions, Rasterizer};
pub use session::{PrintHost, Printer, PRINT_FRAME_ID};

/// Generate a paginated document for a content tree.
///
/// This is the primary one-shot entry point; hosts that need caching and
/// print/preview plumbing use [`session::Printer`] instead.
pub async fn generate<R, B>(
    tree: &ContentTree,
    options: &PrintOptions,
    rasterizer: &R,
) -> Result<B, PagecutError>
where
    R: Rasterizer,
    B: DocumentBuilder,
{
    assemble(tree, tree.root(), options, rasterizer).await
}

/// Generate a paginated document from a JSON content snapshot, as produced
/// by a host-side DOM walker.
pub async fn generate_from_json<R, B>(
    json: &str,
    options: &PrintOptions,
    rasterizer: &R,
) -> Result<B, PagecutError>
where
    R: Rasterizer,
    B: DocumentBuilder,
{
    let tree = ContentTree::from_json(json)?;
    assemble(&tree, tree.root(), options, rasterizer).await
}
