//! Sprite-sheet (ICN) containers synthesized from folders of images.
//!
//! A synthesized container is laid out as:
//!
//! ```text
//! [slot_count: u16][payload_size: u32]
//! slot_count times:
//!   [offset_x: u16][offset_y: u16][width: u16][height: u16][animation_frames: u8][offset_data: u32]
//!   [width * height * 4 bytes of RGBA]
//! ```
//!
//! `offset_data` is measured from the start of the payload region (right after
//! the 6-byte container header) and points at the slot's pixels, which follow its
//! 13-byte header directly. Consumers index pixels purely by `offset_data`, so
//! offsets are computed by [`layout_slot`] as an explicit running total and
//! serialization never consults the buffer length.

use crate::config::AggConfig;
use crate::decoder::{DecodedImage, ImageDecoder};
use crate::error::{Error, Result};
use binrw::{binrw, BinRead, BinWrite};
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use std::io::{Cursor, Write};
use std::ops::Range;

/// Size in bytes of one serialized [`IcnHeader`].
pub const SLOT_HEADER_SIZE: u32 = 13;

/// Size in bytes of the container header (`slot_count` + `payload_size`).
pub const CONTAINER_HEADER_SIZE: usize = 6;

/// Per-slot metadata header.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IcnHeader {
    pub offset_x: u16,
    pub offset_y: u16,
    pub width: u16,
    pub height: u16,
    pub animation_frames: u8,
    pub offset_data: u32,
}

impl IcnHeader {
    /// Number of RGBA bytes described by this header.
    pub fn pixel_len(&self) -> u32 {
        u32::from(self.width) * u32::from(self.height) * 4
    }
}

/// Placement of one slot in the payload region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    pub header: IcnHeader,
    /// Running payload size once this slot's header and pixels are emitted.
    pub next_offset: u32,
}

/// Place a `width x height` slot at `current_offset` bytes into the payload region.
///
/// `offset_x`, `offset_y` and `animation_frames` are always zero.
pub fn layout_slot(current_offset: u32, width: u16, height: u16) -> Result<SlotLayout> {
    let overflow = || Error::Format("sprite sheet payload exceeds 4 GiB".to_string());

    let offset_data = current_offset
        .checked_add(SLOT_HEADER_SIZE)
        .ok_or_else(overflow)?;
    let header = IcnHeader {
        width,
        height,
        offset_data,
        ..IcnHeader::default()
    };
    let next_offset = offset_data
        .checked_add(header.pixel_len())
        .ok_or_else(overflow)?;

    Ok(SlotLayout {
        header,
        next_offset,
    })
}

/// Lay out slots of the given dimensions back to back.
///
/// Returns the headers in order and the final payload size.
pub fn layout_slots(dimensions: &[(u16, u16)]) -> Result<(Vec<IcnHeader>, u32)> {
    let mut headers = Vec::with_capacity(dimensions.len());
    let mut current_offset = 0u32;
    for &(width, height) in dimensions {
        let slot = layout_slot(current_offset, width, height)?;
        headers.push(slot.header);
        current_offset = slot.next_offset;
    }
    Ok((headers, current_offset))
}

/// Serialize decoded images into a complete sprite-sheet container.
pub fn write_sprite_sheet(images: &[DecodedImage]) -> Result<Vec<u8>> {
    let slot_count = u16::try_from(images.len()).map_err(|_| {
        Error::Format(format!("{} images exceed the slot limit", images.len()))
    })?;

    let dimensions = images
        .iter()
        .map(|image| (image.width, image.height))
        .collect::<Vec<_>>();
    let (headers, payload_size) = layout_slots(&dimensions)?;

    let mut writer = Cursor::new(Vec::with_capacity(
        CONTAINER_HEADER_SIZE + payload_size as usize,
    ));
    writer.write_u16::<LE>(slot_count)?;
    writer.write_u32::<LE>(payload_size)?;

    for (header, image) in headers.iter().zip(images) {
        if image.rgba.len() != image.pixel_len() {
            return Err(Error::Format(format!(
                "{}x{} image carries {} pixel bytes, expected {}",
                image.width,
                image.height,
                image.rgba.len(),
                image.pixel_len()
            )));
        }
        header.write(&mut writer)?;
        writer.write_all(&image.rgba)?;
    }

    Ok(writer.into_inner())
}

/// List the images directly inside `dir` whose extension is configured, sorted by name.
pub fn list_images(dir: &Utf8Path, config: &AggConfig) -> Result<Vec<Utf8PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir.as_std_path())? {
        let entry = entry?;
        let path = match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(p) => p,
            Err(p) => {
                tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                continue;
            }
        };

        if !path.as_std_path().is_file() {
            continue;
        }
        if path
            .extension()
            .is_some_and(|ext| config.is_image_extension(ext))
        {
            images.push(path);
        }
    }

    Ok(images
        .into_iter()
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
        .collect())
}

/// Build a sprite-sheet container from the images in `dir`.
///
/// Returns an empty buffer when the folder holds no images. Any image that fails
/// to decode aborts the whole container; a partial sheet is never produced.
pub fn spawn_icn_from_dir(
    dir: &Utf8Path,
    config: &AggConfig,
    decoder: &dyn ImageDecoder,
) -> Result<Vec<u8>> {
    let paths = list_images(dir, config)?;
    if paths.is_empty() {
        tracing::debug!("No images found in {}", dir);
        return Ok(Vec::new());
    }

    let images = paths
        .iter()
        .map(|path| decoder.decode(path))
        .collect::<Result<Vec<_>>>()?;

    let sheet = write_sprite_sheet(&images)?;
    tracing::debug!(
        "Synthesized sprite sheet from {}: {} slots, {} bytes",
        dir,
        images.len(),
        sheet.len()
    );
    Ok(sheet)
}

/// One slot of a parsed sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSlot {
    pub header: IcnHeader,
    /// Byte range of the slot's pixels within the container buffer.
    pub pixels: Range<usize>,
}

/// A parsed sprite-sheet container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub payload_size: u32,
    slots: Vec<SpriteSlot>,
}

impl SpriteSheet {
    /// Parse a container laid out as [`write_sprite_sheet`] produces it.
    ///
    /// Every slot header must sit directly before its pixels and every
    /// `offset_data` must continue the running layout; the final offset must
    /// equal the declared payload size.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(data);
        let slot_count = reader.read_u16::<LE>()?;
        let payload_size = reader.read_u32::<LE>()?;

        let payload_end = CONTAINER_HEADER_SIZE + payload_size as usize;
        if payload_end > data.len() {
            return Err(Error::Format(format!(
                "payload size {} exceeds container of {} bytes",
                payload_size,
                data.len()
            )));
        }

        let mut slots = Vec::with_capacity(usize::from(slot_count));
        let mut current_offset = 0u32;
        for index in 0..slot_count {
            reader.set_position((CONTAINER_HEADER_SIZE + current_offset as usize) as u64);
            let header = IcnHeader::read(&mut reader)?;

            let expected = layout_slot(current_offset, header.width, header.height)?;
            if header.offset_data != expected.header.offset_data {
                return Err(Error::Format(format!(
                    "slot {} data offset {} breaks layout, expected {}",
                    index, header.offset_data, expected.header.offset_data
                )));
            }

            let start = CONTAINER_HEADER_SIZE + header.offset_data as usize;
            let end = CONTAINER_HEADER_SIZE + expected.next_offset as usize;
            if end > payload_end {
                return Err(Error::Format(format!(
                    "slot {} pixels end at {}, past payload end {}",
                    index, end, payload_end
                )));
            }

            slots.push(SpriteSlot {
                header,
                pixels: start..end,
            });
            current_offset = expected.next_offset;
        }

        if current_offset != payload_size {
            return Err(Error::Format(format!(
                "slots cover {} bytes, header declares {}",
                current_offset, payload_size
            )));
        }

        Ok(Self {
            payload_size,
            slots,
        })
    }

    pub fn slots(&self) -> &[SpriteSlot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn solid(width: u16, height: u16, value: u8) -> DecodedImage {
        DecodedImage {
            width,
            height,
            rgba: vec![value; usize::from(width) * usize::from(height) * 4],
        }
    }

    fn save_png(dir: &Utf8Path, name: &str, width: u32, height: u32, value: u8) {
        let img = RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]));
        img.save(dir.join(name).as_std_path()).unwrap();
    }

    #[test]
    fn test_two_slot_layout() {
        let sheet = write_sprite_sheet(&[solid(2, 1, 0xAA), solid(2, 1, 0xBB)]).unwrap();

        assert_eq!(sheet.len(), 6 + 42);
        assert_eq!(&sheet[0..2], &2u16.to_le_bytes());
        assert_eq!(&sheet[2..6], &42u32.to_le_bytes());

        let parsed = SpriteSheet::parse(&sheet).unwrap();
        let offsets: Vec<u32> = parsed
            .slots()
            .iter()
            .map(|s| s.header.offset_data)
            .collect();
        assert_eq!(offsets, vec![13, 34]);
        assert_eq!(&sheet[parsed.slots()[1].pixels.clone()], &[0xBB; 8]);
    }

    #[test]
    fn test_slot_header_bytes() {
        let sheet = write_sprite_sheet(&[solid(3, 2, 0)]).unwrap();
        let header = &sheet[6..19];
        assert_eq!(
            header,
            &[0, 0, 0, 0, 3, 0, 2, 0, 0, 13, 0, 0, 0],
            "offset_x, offset_y, width, height, frames, offset_data"
        );
    }

    #[test]
    fn test_write_rejects_short_pixels() {
        let mut image = solid(2, 2, 0);
        image.rgba.pop();
        assert!(matches!(
            write_sprite_sheet(&[image]),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_parse_rejects_broken_offset() {
        let mut sheet = write_sprite_sheet(&[solid(1, 1, 0), solid(1, 1, 0)]).unwrap();
        // second slot header starts at 6 + 17; its offset_data is the last 4 bytes
        let pos = 6 + 17 + 9;
        sheet[pos..pos + 4].copy_from_slice(&99u32.to_le_bytes());
        assert!(matches!(SpriteSheet::parse(&sheet), Err(Error::Format(_))));
    }

    #[test]
    fn test_parse_rejects_truncated() {
        let sheet = write_sprite_sheet(&[solid(4, 4, 0)]).unwrap();
        assert!(SpriteSheet::parse(&sheet[..sheet.len() - 1]).is_err());
    }

    #[test]
    fn test_spawn_from_dir_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap().to_path_buf();
        save_png(&dir, "b.png", 1, 1, 2);
        save_png(&dir, "a.png", 2, 1, 1);
        std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();
        std::fs::create_dir(dir.join("nested.png")).unwrap();

        let sheet =
            spawn_icn_from_dir(&dir, &AggConfig::default(), &crate::RasterDecoder).unwrap();
        let parsed = SpriteSheet::parse(&sheet).unwrap();

        assert_eq!(parsed.slot_count(), 2);
        assert_eq!(parsed.slots()[0].header.width, 2);
        assert_eq!(parsed.slots()[1].header.width, 1);
        assert_eq!(parsed.payload_size, (13 + 8) + (13 + 4));
    }

    #[test]
    fn test_spawn_from_empty_dir() {
        let dir = tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();
        let sheet = spawn_icn_from_dir(dir, &AggConfig::default(), &crate::RasterDecoder).unwrap();
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_spawn_aborts_on_decode_failure() {
        let dir = tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap().to_path_buf();
        save_png(&dir, "a.png", 1, 1, 0);
        std::fs::write(dir.join("b.png"), b"corrupt").unwrap();

        let err =
            spawn_icn_from_dir(&dir, &AggConfig::default(), &crate::RasterDecoder).unwrap_err();
        assert!(err.is_decode());
    }

    proptest! {
        #[test]
        fn prop_offsets_are_contiguous(dims in prop::collection::vec((0u16..64, 0u16..64), 0..24)) {
            let (headers, total) = layout_slots(&dims).unwrap();
            prop_assert_eq!(headers.len(), dims.len());

            let mut expected = 0u32;
            for header in &headers {
                prop_assert_eq!(header.offset_data, expected + SLOT_HEADER_SIZE);
                expected = header.offset_data + header.pixel_len();
            }
            prop_assert_eq!(total, expected);

            let sum: u32 = dims
                .iter()
                .map(|&(w, h)| SLOT_HEADER_SIZE + u32::from(w) * u32::from(h) * 4)
                .sum();
            prop_assert_eq!(total, sum);
        }
    }
}
