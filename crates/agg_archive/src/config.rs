//! Archive reader configuration.
//!
//! [`AggConfig`] is plain serde data so front ends can load it from TOML or
//! JSON. Every field has a default matching the stock AGG layout, and missing
//! fields fall back to those defaults.

use serde::{Deserialize, Serialize};

/// Width in bytes of each entry in the trailing name block.
pub const DEFAULT_NAME_WIDTH: usize = 15;

/// Extension stripped from the archive path to locate its override folder.
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "AGG";

/// Options controlling how an archive is indexed and which overrides are collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AggConfig {
    /// Archive extension (without the dot), compared case-insensitively.
    pub archive_extension: String,
    /// Fixed width of each name entry in the trailing name block.
    pub name_width: usize,
    /// Scan the sibling override folder when opening an archive.
    pub collect_overrides: bool,
    /// Raster extensions (without the dot) used when synthesizing sprite sheets.
    pub image_extensions: Vec<String>,
}

impl Default for AggConfig {
    fn default() -> Self {
        Self {
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            name_width: DEFAULT_NAME_WIDTH,
            collect_overrides: true,
            image_extensions: vec!["png".to_string(), "bmp".to_string()],
        }
    }
}

impl AggConfig {
    /// Disable or enable override collection.
    pub fn with_overrides(mut self, enabled: bool) -> Self {
        self.collect_overrides = enabled;
        self
    }

    /// Whether `extension` is one of the configured raster extensions.
    pub fn is_image_extension(&self, extension: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
