//! # Raster-Page PDF Builder
//!
//! A from-scratch PDF 1.7 writer implementing [`DocumentBuilder`] for the
//! one document shape this engine produces: pages that each display a
//! placed raster image. Writing the raw bytes ourselves keeps the crate
//! self-contained — the subset of PDF needed for image-only pages is small.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (catalog, page tree, images, streams)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! The assembly loop places the same tall raster once per page; the builder
//! deduplicates identical rasters into a single image XObject, so an N-page
//! document embeds the pixel data once. Pixels are stored as FlateDecode
//! RGB (the raster is rendered over an opaque background, so the alpha
//! channel carries no information).

use std::io::Write as IoWrite;

use image::RgbaImage;
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::builder::{DocumentBuilder, ImageFormat, Orientation, PageSize, Size};

/// A raster registered with the document, stored as raw RGB.
struct RegisteredImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

/// One image placement on a page, in top-left point coordinates.
struct Placement {
    image: usize,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// The shipped [`DocumentBuilder`]: a minimal PDF writer for raster pages.
pub struct PdfBuilder {
    page_size: Size,
    images: Vec<RegisteredImage>,
    pages: Vec<Vec<Placement>>,
}

impl PdfBuilder {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn register(&mut self, image: &RgbaImage) -> usize {
        let rgb: Vec<u8> = image
            .pixels()
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect();
        let (width, height) = (image.width(), image.height());
        if let Some(index) = self
            .images
            .iter()
            .position(|i| i.width == width && i.height == height && i.rgb == rgb)
        {
            return index;
        }
        self.images.push(RegisteredImage { width, height, rgb });
        self.images.len() - 1
    }

    fn content_stream(&self, placements: &[Placement]) -> String {
        let mut stream = String::new();
        for placement in placements {
            // PDF y runs bottom-up; placements come in top-left space.
            let y = self.page_size.height - placement.y - placement.height;
            stream.push_str(&format!(
                "q\n{:.4} 0 0 {:.4} {:.4} {:.4} cm\n/Im{} Do\nQ\n",
                placement.width, placement.height, placement.x, y, placement.image
            ));
        }
        stream
    }

    fn serialize(&self, objects: &[Vec<u8>]) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, data) in objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for i in 1..objects.len() {
            let _ = write!(output, "{:010} 00000 n \n", offsets[i]);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len(),
            xref_offset
        );
        output
    }
}

impl DocumentBuilder for PdfBuilder {
    fn new(orientation: Orientation, page_size: PageSize) -> Self {
        PdfBuilder {
            page_size: orientation.apply(page_size.dimensions()),
            images: Vec::new(),
            pages: vec![Vec::new()],
        }
    }

    fn page_size(&self) -> Size {
        self.page_size
    }

    fn add_image(
        &mut self,
        image: &RgbaImage,
        _format: ImageFormat,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) {
        let index = self.register(image);
        self.pages
            .last_mut()
            .expect("builder always has a current page")
            .push(Placement {
                image: index,
                x,
                y,
                width,
                height,
            });
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn output(&self) -> Vec<u8> {
        // Object layout:
        // 0 = free-list placeholder, 1 = Catalog, 2 = Pages,
        // then one XObject per unique image, then per page a content
        // stream + page dict.
        let mut objects: Vec<Vec<u8>> = vec![Vec::new(), Vec::new(), Vec::new()];

        let mut image_ids = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let compressed = compress_to_vec_zlib(&image.rgb, 6);
            let mut data: Vec<u8> = Vec::new();
            let _ = write!(
                data,
                "<< /Type /XObject /Subtype /Image \
                 /Width {} /Height {} \
                 /ColorSpace /DeviceRGB \
                 /BitsPerComponent 8 \
                 /Filter /FlateDecode \
                 /Length {} >>\nstream\n",
                image.width,
                image.height,
                compressed.len()
            );
            data.extend_from_slice(&compressed);
            data.extend_from_slice(b"\nendstream");
            image_ids.push(objects.len());
            objects.push(data);
        }

        let xobject_resources: String = image_ids
            .iter()
            .enumerate()
            .map(|(index, id)| format!("/Im{} {} 0 R", index, id))
            .collect::<Vec<_>>()
            .join(" ");

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for placements in &self.pages {
            let content = self.content_stream(placements);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);
            let content_id = objects.len();
            let mut data: Vec<u8> = Vec::new();
            let _ = write!(
                data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            data.extend_from_slice(&compressed);
            data.extend_from_slice(b"\nendstream");
            objects.push(data);

            let resources = if xobject_resources.is_empty() {
                String::new()
            } else {
                format!(" /Resources << /XObject << {} >> >>", xobject_resources)
            };
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R{} >>",
                self.page_size.width, self.page_size.height, content_id, resources
            );
            page_ids.push(objects.len());
            objects.push(page_dict.into_bytes());
        }

        objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids: String = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_ids.len()
        )
        .into_bytes();

        self.serialize(&objects)
    }
}
