//! # Rasterization Interface
//!
//! The engine never paints pixels itself. After the split pass it hands the
//! mutated working tree to a [`Rasterizer`], which renders the whole
//! fragment into one tall raster — page slicing happens later, against that
//! single image. In a browser-backed host this is an html2canvas-style
//! engine; tests use a deterministic fake that derives the raster size from
//! tree geometry.

use std::future::Future;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::error::PagecutError;
use crate::model::{Color, ContentTree, NodeId};

/// Options forwarded to the rasterization engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Oversampling factor: the raster is `scale` times larger than the
    /// content's pixel size.
    pub scale: f64,
    /// Request cross-origin image content with CORS.
    pub use_cors: bool,
    /// Allow content the engine cannot read back (may taint the canvas).
    pub allow_taint: bool,
    /// Fill color behind transparent content.
    pub background: Color,
    /// Required canvas width in raster pixels (content width × scale).
    pub canvas_width: u32,
}

/// An engine that renders a content tree into a single tall raster.
///
/// The produced raster must be at least `canvas_width` pixels wide; its
/// height is the rendered content height times `scale`. Rejection (for
/// example on unreadable cross-origin content) surfaces as
/// [`PagecutError::Raster`] and aborts the generation, with no retry.
pub trait Rasterizer {
    fn rasterize(
        &self,
        tree: &ContentTree,
        root: NodeId,
        options: &RasterOptions,
    ) -> impl Future<Output = Result<RgbaImage, PagecutError>> + Send;
}

/// Encode a raster as a `data:image/png;base64,...` URL, the exchange
/// format browser-backed hosts expect when they do their own placement.
pub fn to_data_url(image: &RgbaImage) -> Result<String, PagecutError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .map_err(|e| PagecutError::Raster(e.to_string()))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_has_png_header() {
        let image = RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
        let url = to_data_url(&image).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let payload = url.trim_start_matches("data:image/png;base64,");
        let bytes = STANDARD.decode(payload).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
