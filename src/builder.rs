//! # Output-Document Builder Interface
//!
//! The engine does not commit to one document format; it feeds page images
//! to anything implementing [`DocumentBuilder`]. A builder is constructed
//! from an orientation and a named page size (units are always points),
//! reports its page size back, accepts image placements and page breaks,
//! and produces the finished document as bytes.
//!
//! Placements may extend beyond the page box — the builder (or its viewer)
//! clips content to the visible page region. The assembly loop relies on
//! this: every output page places the *same* tall raster, just at a more
//! negative vertical offset.
//!
//! The crate ships one implementation, [`crate::pdf::PdfBuilder`].

use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::PagecutError;

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Apply the orientation to a portrait page size.
    pub fn apply(self, size: Size) -> Size {
        match self {
            Orientation::Portrait => size,
            Orientation::Landscape => Size {
                width: size.height,
                height: size.width,
            },
        }
    }
}

/// A width/height pair in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Standard page sizes (portrait, points).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Portrait dimensions in points.
    pub fn dimensions(&self) -> Size {
        let (width, height) = match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        };
        Size { width, height }
    }
}

/// Raster format hint passed along with a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

/// A multi-page output document under construction.
///
/// Coordinates are top-left based, in points; the builder converts to its
/// native space. `add_image` draws onto the current page (the last one
/// added); `add_page` appends a fresh page and makes it current.
pub trait DocumentBuilder {
    fn new(orientation: Orientation, page_size: PageSize) -> Self
    where
        Self: Sized;

    /// The oriented page size, in points.
    fn page_size(&self) -> Size;

    /// Place `image` on the current page at (`x`, `y`) scaled to
    /// `width` × `height` points. Content outside the page box is clipped.
    fn add_image(
        &mut self,
        image: &RgbaImage,
        format: ImageFormat,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    );

    /// Append a new page and make it current.
    fn add_page(&mut self);

    /// Serialize the finished document.
    fn output(&self) -> Vec<u8>;

    /// Persist the finished document under `path`.
    fn save(&self, path: &Path) -> Result<(), PagecutError> {
        std::fs::write(path, self.output())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_swaps_dimensions() {
        let portrait = PageSize::A4.dimensions();
        let landscape = Orientation::Landscape.apply(portrait);
        assert_eq!(landscape.width, portrait.height);
        assert_eq!(landscape.height, portrait.width);
    }

    #[test]
    fn named_sizes_deserialize_lowercase() {
        let size: PageSize = serde_json::from_str("\"a4\"").unwrap();
        assert_eq!(size, PageSize::A4);
        let size: PageSize = serde_json::from_str("\"letter\"").unwrap();
        assert_eq!(size, PageSize::Letter);
    }

    #[test]
    fn custom_size_round_trips() {
        let size = PageSize::Custom {
            width: 400.0,
            height: 400.0,
        };
        let json = serde_json::to_string(&size).unwrap();
        let back: PageSize = serde_json::from_str(&json).unwrap();
        assert_eq!(size, back);
        assert_eq!(back.dimensions().width, 400.0);
    }
}
