//! # Page Assembly
//!
//! The orchestration pipeline: clone the content tree, run the split pass
//! against the page grid, rasterize the mutated clone into one tall image,
//! then slice that image into page bands and feed them to the output
//! builder.
//!
//! Slicing works in a single canonical pixel space — raster pixels. The
//! raster is `scale` times the content size, and one output page consumes
//! `(page_height + 2·margin_pixels) × scale` of it: the printable band plus
//! the two margin bands every inserted spacer carries. The loop never mixes
//! raster pixels with layout pixels. Placement offsets, by contrast, live
//! purely in output points: each page shows the same full-height image
//! shifted up by one page height more than the page before it, and the
//! builder clips to the page box.

use log::debug;

use crate::builder::{DocumentBuilder, ImageFormat};
use crate::error::PagecutError;
use crate::layout::{split, PageMetrics};
use crate::model::{Color, ContentTree, NodeId};
use crate::options::PrintOptions;
use crate::raster::{RasterOptions, Rasterizer};

/// Generate a paginated output document for the fragment rooted at `root`.
///
/// The caller's tree is never modified: all spacer insertion happens on a
/// working clone that is dropped when this returns, on success and failure
/// alike. The only suspension point is the rasterizer call; everything
/// before it (measure, plan, mutate) runs synchronously to completion.
pub async fn assemble<R, B>(
    tree: &ContentTree,
    root: NodeId,
    options: &PrintOptions,
    rasterizer: &R,
) -> Result<B, PagecutError>
where
    R: Rasterizer,
    B: DocumentBuilder,
{
    let mut work = tree.clone();
    let builder = B::new(options.orientation, options.page_size);
    let page = builder.page_size();
    let margin = options.page_margin;

    // The printable width in points and the derived band height in content
    // pixels: the content is scaled so its width fills the printable width,
    // so one band covers proportionally as much content as one page.
    let page_width = page.width - margin * 2.0;
    let content_width = work.get(root).geometry.width;
    let page_height = content_width / page_width * (page.height - margin * 2.0);
    let metrics = PageMetrics::new(page_height, page.height, margin);
    debug!(
        "assembling: content width {:.1}px, band height {:.1}px, page {:.1}x{:.1}pt",
        content_width, page_height, page.width, page.height
    );

    let plans = split(&mut work, root, &metrics, Color::WHITE);
    debug!("split pass inserted {} spacer(s)", plans.len());

    let raster_options = RasterOptions {
        scale: options.scale,
        use_cors: true,
        allow_taint: true,
        background: Color::WHITE,
        canvas_width: (content_width * options.scale).round() as u32,
    };
    let raster = rasterizer.rasterize(&work, root, &raster_options).await?;

    Ok(place_pages(builder, &raster, options, &metrics))
}

/// Slice the tall raster into page bands by placing it repeatedly at more
/// negative offsets. Returns the finished builder.
fn place_pages<B: DocumentBuilder>(
    mut builder: B,
    raster: &image::RgbaImage,
    options: &PrintOptions,
    metrics: &PageMetrics,
) -> B {
    let page = builder.page_size();
    let margin = options.page_margin;
    let page_width = page.width - margin * 2.0;

    // Scale the full image to the printable width; its on-page height
    // follows from the raster's aspect ratio.
    let image_height = page_width / raster.width() as f64 * raster.height() as f64;

    // One full output page consumes the printable band plus both page
    // margins, in raster pixels: every inserted spacer carries
    // `2 · margin_pixels` on top of the band remainder, so slicing by the
    // bare band height would leave the margin growth unconsumed and emit
    // trailing blank pages.
    let band = (metrics.page_height + metrics.margin_pixels * 2.0) * options.scale;
    let mut rest = raster.height() as f64;
    let mut position = margin;
    let mut pages = 1;

    if rest < band {
        builder.add_image(raster, ImageFormat::Png, margin, position, page_width, image_height);
    } else {
        while rest > 0.0 {
            builder.add_image(raster, ImageFormat::Png, margin, position, page_width, image_height);
            rest -= band;
            position -= page.height;
            if rest > 0.0 {
                builder.add_page();
                pages += 1;
            }
        }
    }

    debug!(
        "placed raster {}x{} across {} page(s)",
        raster.width(),
        raster.height(),
        pages
    );
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Orientation, PageSize, Size};
    use image::RgbaImage;
    use std::path::Path;

    /// Records placements instead of producing bytes.
    struct RecordingBuilder {
        page_size: Size,
        pages: Vec<Vec<(f64, f64, f64, f64)>>,
    }

    impl DocumentBuilder for RecordingBuilder {
        fn new(orientation: Orientation, page_size: PageSize) -> Self {
            RecordingBuilder {
                page_size: orientation.apply(page_size.dimensions()),
                pages: vec![Vec::new()],
            }
        }

        fn page_size(&self) -> Size {
            self.page_size
        }

        fn add_image(
            &mut self,
            _image: &RgbaImage,
            _format: ImageFormat,
            x: f64,
            y: f64,
            width: f64,
            height: f64,
        ) {
            self.pages.last_mut().unwrap().push((x, y, width, height));
        }

        fn add_page(&mut self) {
            self.pages.push(Vec::new());
        }

        fn output(&self) -> Vec<u8> {
            Vec::new()
        }

        fn save(&self, _path: &Path) -> Result<(), PagecutError> {
            Ok(())
        }
    }

    fn square_metrics(page_height: f64) -> (PrintOptions, PageMetrics) {
        // A 400x400pt page with no margin and a 400px-wide element gives a
        // band height equal to the page height in points.
        let options = PrintOptions {
            page_size: PageSize::Custom {
                width: 400.0,
                height: 400.0,
            },
            page_margin: 0.0,
            scale: 2.0,
            ..PrintOptions::default()
        };
        (options, PageMetrics::new(page_height, 400.0, 0.0))
    }

    #[test]
    fn tall_raster_slices_into_four_pages() {
        // Scenario D: 2500px of content on an 800px band, oversampled 2x:
        // the raster is 5000px tall against a 1600px band -> 4 pages.
        let (options, metrics) = square_metrics(800.0);
        let raster = RgbaImage::new(800, 5000);
        let builder: RecordingBuilder =
            RecordingBuilder::new(options.orientation, options.page_size);
        let builder = place_pages(builder, &raster, &options, &metrics);

        assert_eq!(builder.pages.len(), 4);
        for (index, page) in builder.pages.iter().enumerate() {
            assert_eq!(page.len(), 1);
            let (x, y, ..) = page[0];
            assert_eq!(x, 0.0);
            // Each page shifts the image up by one page height.
            assert_eq!(y, 0.0 - 400.0 * index as f64);
        }
    }

    #[test]
    fn exact_multiple_produces_no_trailing_blank_page() {
        // 2400px content -> 4800px raster -> exactly 3 bands of 1600px.
        let (options, metrics) = square_metrics(800.0);
        let raster = RgbaImage::new(800, 4800);
        let builder: RecordingBuilder =
            RecordingBuilder::new(options.orientation, options.page_size);
        let builder = place_pages(builder, &raster, &options, &metrics);
        assert_eq!(builder.pages.len(), 3);
    }

    #[test]
    fn short_raster_fits_one_page() {
        let (options, metrics) = square_metrics(800.0);
        let raster = RgbaImage::new(800, 900);
        let builder: RecordingBuilder =
            RecordingBuilder::new(options.orientation, options.page_size);
        let builder = place_pages(builder, &raster, &options, &metrics);
        assert_eq!(builder.pages.len(), 1);
        assert_eq!(builder.pages[0].len(), 1);
    }

    #[test]
    fn margin_growth_is_consumed_by_the_band() {
        // A 400x400pt page with a 30pt margin: the printable band is 400
        // content px and margin_pixels is 400/340·30. Three breaks grow a
        // 1080px tree to 1692px of raster; four pages must consume it with
        // no blank fifth page.
        let options = PrintOptions {
            page_size: PageSize::Custom {
                width: 400.0,
                height: 400.0,
            },
            page_margin: 30.0,
            scale: 1.0,
            ..PrintOptions::default()
        };
        let metrics = PageMetrics::new(400.0, 400.0, 30.0);
        let raster = RgbaImage::new(400, 1692);
        let builder: RecordingBuilder =
            RecordingBuilder::new(options.orientation, options.page_size);
        let builder = place_pages(builder, &raster, &options, &metrics);
        assert_eq!(builder.pages.len(), 4);
    }

    #[test]
    fn margin_offsets_the_first_placement() {
        let options = PrintOptions {
            page_size: PageSize::Custom {
                width: 400.0,
                height: 400.0,
            },
            page_margin: 30.0,
            scale: 1.0,
            ..PrintOptions::default()
        };
        let metrics = PageMetrics::new(800.0, 400.0, 30.0);
        let raster = RgbaImage::new(400, 100);
        let builder: RecordingBuilder =
            RecordingBuilder::new(options.orientation, options.page_size);
        let builder = place_pages(builder, &raster, &options, &metrics);
        let (x, y, width, _) = builder.pages[0][0];
        assert_eq!(x, 30.0);
        assert_eq!(y, 30.0);
        assert_eq!(width, 400.0 - 60.0);
    }
}
