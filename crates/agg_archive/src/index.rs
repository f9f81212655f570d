//! Parsing of the archive's record table and trailing name block.
//!
//! An AGG archive is laid out as:
//!
//! ```text
//! [count: u16]
//! [count x record: { crc: u32, offset: u32, size: u32 }]
//! ... payload bytes ...
//! [count x name: name_width bytes, NUL padded]   // last name_width * count bytes of the file
//! ```
//!
//! Record *i* belongs to name *i*. The two blocks are read separately and paired
//! by position before anything is inserted into the map, so a short or reordered
//! block can never leave a half-built index behind.

use crate::error::{Error, Result};
use crate::utils::{decode_fixed_name, normalize_asset_name};
use binrw::{binrw, BinRead};
use byteorder::{ReadBytesExt, LE};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Size in bytes of one [`AggRecord`] on disk.
pub const RECORD_SIZE: usize = 12;

/// Size in bytes of the leading record count.
pub const COUNT_SIZE: u64 = 2;

/// One fixed-width entry of the record table.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggRecord {
    /// Unverified checksum-like field. Read and ignored.
    pub crc: u32,
    pub offset: u32,
    pub size: u32,
}

/// Location of an asset inside the archive file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub size: u32,
    pub offset: u32,
}

impl IndexEntry {
    /// Entries with zero size are known names that cannot be read directly.
    pub fn is_readable(&self) -> bool {
        self.size > 0
    }
}

/// Name -> location table for one archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveIndex {
    entries: HashMap<String, IndexEntry>,
    file_size: u64,
}

impl ArchiveIndex {
    /// Parse the record table and name block of an archive.
    ///
    /// Fails without keeping any entries if the declared count cannot fit in the
    /// file, if a record points past the end of the file, or if names repeat.
    pub fn parse<R: Read + Seek>(reader: &mut R, name_width: usize) -> Result<Self> {
        if name_width == 0 {
            return Err(Error::Format("name width must be nonzero".to_string()));
        }

        let file_size = reader.seek(SeekFrom::End(0))?;
        if file_size < COUNT_SIZE {
            return Err(Error::Format(format!(
                "archive is {file_size} bytes, too short for a record count"
            )));
        }

        reader.seek(SeekFrom::Start(0))?;
        let count = reader.read_u16::<LE>()? as usize;

        let width = u64::try_from(name_width)
            .map_err(|_| Error::Format(format!("name width {name_width} is too large")))?;
        let required = (RECORD_SIZE as u64)
            .checked_add(width)
            .and_then(|entry_size| entry_size.checked_mul(count as u64));
        match required {
            Some(required) if required < file_size => {}
            _ => return Err(Error::CountTooLarge { count, file_size }),
        }

        let records = read_records(reader, count)?;
        // bounded by `required`, which fits in the file
        let names_size = width * count as u64;
        reader.seek(SeekFrom::Start(file_size - names_size))?;
        let names = read_names(reader, count, name_width)?;

        let paired: Vec<(String, AggRecord)> = names.into_iter().zip(records).collect();
        for (name, record) in &paired {
            let end = u64::from(record.offset) + u64::from(record.size);
            if record.size > 0 && end > file_size {
                return Err(Error::RecordOutOfBounds {
                    name: name.clone(),
                    offset: record.offset,
                    size: record.size,
                    file_size,
                });
            }
        }

        let mut entries = HashMap::with_capacity(count);
        for (name, record) in paired {
            entries.entry(name).or_insert(IndexEntry {
                size: record.size,
                offset: record.offset,
            });
        }

        if entries.len() != count {
            return Err(Error::DuplicateNames {
                declared: count,
                unique: entries.len(),
            });
        }

        tracing::debug!(
            "Parsed archive index: {} entries, {} bytes",
            entries.len(),
            file_size
        );

        Ok(Self { entries, file_size })
    }

    /// Look up an entry by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(&normalize_asset_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size of the archive file the index was parsed from.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// All names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Read `count` records as one contiguous block starting at the current position.
fn read_records<R: Read>(reader: &mut R, count: usize) -> Result<Vec<AggRecord>> {
    let mut block = vec![0u8; count * RECORD_SIZE];
    reader.read_exact(&mut block)?;

    let mut cursor = Cursor::new(block);
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(AggRecord::read(&mut cursor)?);
    }
    Ok(records)
}

/// Read `count` fixed-width names starting at the current position.
fn read_names<R: Read>(reader: &mut R, count: usize, width: usize) -> Result<Vec<String>> {
    let mut block = vec![0u8; count * width];
    reader.read_exact(&mut block)?;
    Ok(block.chunks_exact(width).map(decode_fixed_name).collect())
}
