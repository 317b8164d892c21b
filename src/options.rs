//! Print configuration, with the defaults the original plugin shipped.

use serde::{Deserialize, Serialize};

use crate::builder::{Orientation, PageSize};

/// Per-invocation print configuration. Every field has a default, so hosts
/// can pass `{}` (or `PrintOptions::default()`) and get A4 portrait with a
/// 30pt margin at 2× raster oversampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintOptions {
    pub orientation: Orientation,
    pub page_size: PageSize,
    /// Page margin in document units (points).
    pub page_margin: f64,
    /// Raster oversampling factor.
    pub scale: f64,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            orientation: Orientation::Portrait,
            page_size: PageSize::A4,
            page_margin: 30.0,
            scale: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let options: PrintOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PrintOptions::default());
        assert_eq!(options.page_margin, 30.0);
        assert_eq!(options.scale, 2.0);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let options: PrintOptions =
            serde_json::from_str(r#"{ "orientation": "landscape", "pageMargin": 0 }"#).unwrap();
        assert_eq!(options.orientation, Orientation::Landscape);
        assert_eq!(options.page_margin, 0.0);
        assert_eq!(options.page_size, PageSize::A4);
    }
}
