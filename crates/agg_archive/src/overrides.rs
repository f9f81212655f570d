//! Collection of user-supplied override assets.
//!
//! Overrides live in a folder next to the archive, named after the archive
//! without its extension:
//!
//! ```text
//! data/
//!   HEROES2.AGG
//!   HEROES2/                 # override folder
//!     ADVBTNS.ICN/           # synthesized into the ICN asset "ADVBTNS.ICN"
//!       000.png
//!       001.png
//!     SOMETHING.XYZ/         # unknown type tag, ignored
//! ```
//!
//! Only subdirectories whose type tag (the text after the last `.`) names an
//! [`OverrideKind`] are recognized. Collection never fails: a missing folder,
//! an unreadable entry or a failed synthesis just means fewer overrides.

use crate::config::AggConfig;
use crate::decoder::ImageDecoder;
use crate::icn::spawn_icn_from_dir;
use crate::utils::{normalize_asset_name, override_dir_for, type_tag};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;

/// Asset kinds that can be synthesized from an override folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideKind {
    /// Sprite sheet built from a folder of images.
    Icn,
}

impl OverrideKind {
    /// Map an upper-cased type tag to a kind.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "ICN" => Some(OverrideKind::Icn),
            _ => None,
        }
    }
}

/// A synthesized replacement for one archive asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub kind: OverrideKind,
    /// Folder the payload was built from.
    pub source: Utf8PathBuf,
    pub payload: Vec<u8>,
}

/// Normalized asset name -> override payload.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, OverrideEntry>,
}

impl OverrideTable {
    /// Look up an override by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&OverrideEntry> {
        self.entries.get(&normalize_asset_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert an override unless one already exists for the name.
    ///
    /// Returns `false` if the name was already taken.
    pub fn insert(&mut self, name: &str, entry: OverrideEntry) -> bool {
        let key = normalize_asset_name(name);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All override names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Scan the override folder of `archive_path` and synthesize every recognized asset.
pub fn collect_overrides(
    archive_path: &Utf8Path,
    config: &AggConfig,
    decoder: &dyn ImageDecoder,
) -> OverrideTable {
    let mut table = OverrideTable::default();
    if !config.collect_overrides {
        return table;
    }

    let Some(dir) = override_dir_for(archive_path, &config.archive_extension) else {
        return table;
    };
    if !dir.as_std_path().is_dir() {
        return table;
    }

    let candidates = match list_override_dirs(&dir) {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!("Failed to scan override folder '{}': {}", dir, e);
            return table;
        }
    };

    for path in candidates {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let name = normalize_asset_name(file_name);
        if name == "." || name == ".." {
            continue;
        }

        let Some(kind) = OverrideKind::from_type_tag(type_tag(&name)) else {
            tracing::trace!("Ignoring override folder with unknown type: {}", path);
            continue;
        };

        let payload = match kind {
            OverrideKind::Icn => spawn_icn_from_dir(&path, config, decoder),
        };

        match payload {
            Ok(payload) if payload.is_empty() => {
                tracing::debug!("Override folder '{}' produced no data", path);
            }
            Ok(payload) => {
                tracing::debug!("Collected override {} ({} bytes)", name, payload.len());
                let entry = OverrideEntry {
                    kind,
                    source: path.clone(),
                    payload,
                };
                if !table.insert(&name, entry) {
                    tracing::warn!("Duplicate override for {}, keeping the first", name);
                }
            }
            Err(e) => {
                tracing::warn!("Skipping override '{}': {}", path, e);
            }
        }
    }

    table
}

/// Immediate subdirectories of `dir`, sorted by name.
fn list_override_dirs(dir: &Utf8Path) -> std::io::Result<Vec<Utf8PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir.as_std_path())? {
        let entry = entry?;
        let path = match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(p) => p,
            Err(p) => {
                tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                continue;
            }
        };
        if path.as_std_path().is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort_unstable();
    Ok(dirs)
}
