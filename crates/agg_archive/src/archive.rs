//! Read-side handle for one AGG archive.
//!
//! [`AggFile::open`] parses the archive index and collects the override folder
//! next to it. [`AggFile::read`] then resolves names with this priority:
//!
//! 1. Name not in the index, or indexed with size 0: empty result.
//! 2. Name has an override: the override payload.
//! 3. Otherwise: the recorded byte range of the archive.
//!
//! Overrides never introduce new names; they only shadow readable index entries.

use crate::config::AggConfig;
use crate::decoder::RasterDecoder;
use crate::error::Result;
use crate::index::{ArchiveIndex, IndexEntry};
use crate::overrides::{collect_overrides, OverrideTable};
use crate::utils::normalize_asset_name;
use camino::Utf8Path;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::sync::Arc;

/// Structured notification emitted by [`AggFile::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveEvent {
    /// An override payload was returned instead of archive bytes.
    OverrideUsed { name: String, size: usize },
    /// Bytes were read directly from the archive.
    ArchiveRead { name: String, offset: u32, size: u32 },
}

pub(crate) type EventCallback = Arc<dyn Fn(ResolveEvent) + Send + Sync>;

/// An opened archive: its index, its overrides and the byte source.
pub struct AggFile<R: Read + Seek = BufReader<File>> {
    source: R,
    index: ArchiveIndex,
    overrides: OverrideTable,
    event_callback: Option<EventCallback>,
}

impl AggFile<BufReader<File>> {
    /// Open an archive from disk with the default configuration.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        Self::open_with_config(path, &AggConfig::default())
    }

    /// Open an archive from disk and collect its override folder.
    pub fn open_with_config(path: impl AsRef<Utf8Path>, config: &AggConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path.as_std_path())?;
        let mut archive = Self::from_reader(BufReader::new(file), config)?;

        archive.overrides = collect_overrides(path, config, &RasterDecoder);

        tracing::info!(
            "Opened archive {}: {} entries, {} overrides",
            path,
            archive.index.len(),
            archive.overrides.len()
        );
        Ok(archive)
    }
}

impl<R: Read + Seek> AggFile<R> {
    /// Parse an archive from any seekable source, without overrides.
    pub fn from_reader(mut source: R, config: &AggConfig) -> Result<Self> {
        let index = ArchiveIndex::parse(&mut source, config.name_width)?;
        Ok(Self {
            source,
            index,
            overrides: OverrideTable::default(),
            event_callback: None,
        })
    }

    /// Replace the override table.
    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Register a callback receiving a [`ResolveEvent`] for every successful read.
    pub fn with_events<F>(mut self, callback: F) -> Self
    where
        F: Fn(ResolveEvent) + Send + Sync + 'static,
    {
        self.event_callback = Some(Arc::new(callback));
        self
    }

    pub(crate) fn set_event_callback(&mut self, callback: Option<EventCallback>) {
        self.event_callback = callback;
    }

    /// Resolve `name` to its bytes.
    ///
    /// An empty buffer means the archive cannot supply the name. This is routine
    /// when several archives are consulted in turn, so it is not an error.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let name = normalize_asset_name(name);
        let Some(entry) = self.index.get(&name).copied() else {
            return Ok(Vec::new());
        };
        if !entry.is_readable() {
            return Ok(Vec::new());
        }

        if let Some(external) = self.overrides.get(&name) {
            let payload = external.payload.clone();
            tracing::debug!("Using override for {}", name);
            self.emit(ResolveEvent::OverrideUsed {
                name,
                size: payload.len(),
            });
            return Ok(payload);
        }

        self.source.seek(SeekFrom::Start(u64::from(entry.offset)))?;
        let mut data = vec![0u8; entry.size as usize];
        self.source.read_exact(&mut data)?;

        self.emit(ResolveEvent::ArchiveRead {
            name,
            offset: entry.offset,
            size: entry.size,
        });
        Ok(data)
    }

    /// Index entry for `name`, including unreadable zero-size entries.
    pub fn entry(&self, name: &str) -> Option<IndexEntry> {
        self.index.get(name).copied()
    }

    /// Whether a read of `name` would return an override.
    pub fn has_override(&self, name: &str) -> bool {
        self.entry(name).is_some_and(|e| e.is_readable()) && self.overrides.contains(name)
    }

    /// All indexed names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.index.names()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    fn emit(&self, event: ResolveEvent) {
        if let Some(callback) = &self.event_callback {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icn::write_sprite_sheet;
    use crate::index::tests::build_archive;
    use crate::overrides::{OverrideEntry, OverrideKind};
    use crate::DecodedImage;
    use camino::Utf8PathBuf;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use std::sync::Mutex;

    fn open_mem(entries: &[(&str, &[u8])]) -> AggFile<Cursor<Vec<u8>>> {
        let data = build_archive(entries, 15);
        AggFile::from_reader(Cursor::new(data), &AggConfig::default()).unwrap()
    }

    fn icn_override(name: &str) -> OverrideTable {
        let payload = write_sprite_sheet(&[DecodedImage {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 4],
        }])
        .unwrap();
        let mut table = OverrideTable::default();
        table.insert(
            name,
            OverrideEntry {
                kind: OverrideKind::Icn,
                source: Utf8PathBuf::from("mem"),
                payload,
            },
        );
        table
    }

    #[test]
    fn test_read_slices_archive() {
        let mut archive = open_mem(&[("A.ICN", &[1, 2, 3, 4]), ("B.PAL", &[9; 6])]);
        assert_eq!(archive.read("A.ICN").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(archive.read("b.pal").unwrap(), vec![9; 6]);
    }

    #[test]
    fn test_read_unknown_name_is_empty() {
        let mut archive = open_mem(&[("A.ICN", &[1, 2, 3, 4])]);
        assert!(archive.read("MISSING.ICN").unwrap().is_empty());
    }

    #[test]
    fn test_read_zero_size_is_empty_even_with_override() {
        let mut archive =
            open_mem(&[("A.ICN", &[]), ("B.ICN", &[1])]).with_overrides(icn_override("A.ICN"));
        assert!(archive.read("A.ICN").unwrap().is_empty());
        assert!(!archive.has_override("A.ICN"));
    }

    #[test]
    fn test_override_takes_priority() {
        let overrides = icn_override("A.ICN");
        let expected = overrides.get("A.ICN").unwrap().payload.clone();
        let mut archive = open_mem(&[("A.ICN", &[1, 2, 3, 4])]).with_overrides(overrides);

        assert!(archive.has_override("a.icn"));
        assert_eq!(archive.read("A.ICN").unwrap(), expected);
    }

    #[test]
    fn test_override_without_index_entry_is_hidden() {
        let mut archive = open_mem(&[("A.ICN", &[1, 2, 3, 4])]).with_overrides(icn_override("NEW.ICN"));
        assert!(archive.read("NEW.ICN").unwrap().is_empty());
        assert!(!archive.has_override("NEW.ICN"));
    }

    #[test]
    fn test_events_emitted() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut archive = open_mem(&[("A.ICN", &[1, 2, 3, 4]), ("B.ICN", &[5])])
            .with_overrides(icn_override("B.ICN"))
            .with_events(move |event| sink.lock().unwrap().push(event));

        archive.read("A.ICN").unwrap();
        archive.read("B.ICN").unwrap();
        archive.read("C.ICN").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ResolveEvent::ArchiveRead {
                    name: "A.ICN".to_string(),
                    offset: 26,
                    size: 4
                },
                ResolveEvent::OverrideUsed {
                    name: "B.ICN".to_string(),
                    size: 6 + 13 + 4
                },
            ]
        );
    }

    #[test]
    fn test_read_io_error_propagates() {
        struct Failing(Cursor<Vec<u8>>, bool);
        impl Read for Failing {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.1 {
                    return Err(std::io::Error::other("disk gone"));
                }
                self.0.read(buf)
            }
        }
        impl Seek for Failing {
            fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
                self.0.seek(pos)
            }
        }

        let data = build_archive(&[("A.ICN", &[1, 2, 3, 4])], 15);
        let mut archive =
            AggFile::from_reader(Failing(Cursor::new(data), false), &AggConfig::default())
                .unwrap();
        archive.source.1 = true;
        assert!(matches!(
            archive.read("A.ICN"),
            Err(crate::Error::Io(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_every_entry_reads_back_recorded_bytes(
            entries in prop::collection::btree_map(
                "[A-Z0-9]{1,8}\\.[A-Z]{3}",
                prop_oneof![
                    1 => Just(Vec::new()),
                    3 => prop::collection::vec(any::<u8>(), 1..64),
                ],
                0..16,
            )
        ) {
            let entries: BTreeMap<String, Vec<u8>> = entries;
            let listed: Vec<(&str, &[u8])> = entries
                .iter()
                .map(|(name, payload)| (name.as_str(), payload.as_slice()))
                .collect();
            let mut archive = open_mem(&listed);
            prop_assert_eq!(archive.len(), entries.len());

            for (name, payload) in &entries {
                let entry = archive.entry(name).unwrap();
                let data = archive.read(name).unwrap();
                prop_assert_eq!(entry.size as usize, payload.len());
                prop_assert_eq!(data.len(), entry.size as usize);
                prop_assert_eq!(&data, payload);
                if !entry.is_readable() {
                    prop_assert!(data.is_empty());
                }
            }
        }
    }
}
