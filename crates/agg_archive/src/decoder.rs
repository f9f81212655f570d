//! Image decoding for override sprite sheets.
//!
//! The synthesizer only needs each image's dimensions and its pixels as
//! row-major RGBA bytes. [`ImageDecoder`] is the seam; [`RasterDecoder`] is the
//! default implementation backed by the `image` crate.

use crate::error::{Error, Result};
use camino::Utf8Path;

/// A decoded image: dimensions plus `width * height * 4` bytes of RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u16,
    pub height: u16,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Number of pixel bytes this image contributes to a slot.
    pub fn pixel_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * 4
    }
}

/// Decodes an image file into RGBA pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Utf8Path) -> Result<DecodedImage>;
}

/// [`ImageDecoder`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, path: &Utf8Path) -> Result<DecodedImage> {
        let image = image::open(path.as_std_path()).map_err(|e| Error::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(Error::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
            });
        };

        Ok(DecodedImage {
            width: w,
            height: h,
            rgba: rgba.into_raw(),
        })
    }
}
