//! Name normalization and override path helpers.
//!
//! Archive names are compared case-insensitively by storing them upper-cased.
//! Override folders sit next to the archive and are named `<ASSET>.<TYPE>`.

use camino::{Utf8Path, Utf8PathBuf};

/// Upper-case an asset name for index and override lookups.
pub fn normalize_asset_name(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Decode a fixed-width name entry.
///
/// The entry is cut at the first NUL byte. Bytes outside ASCII are replaced
/// lossily, and the result is upper-cased.
pub fn decode_fixed_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    normalize_asset_name(&String::from_utf8_lossy(&raw[..end]))
}

/// Derive the override folder for an archive by stripping its extension.
///
/// Returns `None` when the path does not end in `.<extension>`
/// (compared case-insensitively), since the folder would then be the archive itself.
///
/// - `data/HEROES2.AGG` -> `data/HEROES2`
/// - `data/heroes2.agg` -> `data/heroes2`
pub fn override_dir_for(archive_path: &Utf8Path, extension: &str) -> Option<Utf8PathBuf> {
    let path = archive_path.as_str();
    let suffix_len = extension.len() + 1;
    if path.len() <= suffix_len || !path.is_char_boundary(path.len() - suffix_len) {
        return None;
    }

    let (stem, suffix) = path.split_at(path.len() - suffix_len);
    let matches = suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension);
    matches.then(|| Utf8PathBuf::from(stem))
}

/// Return the type tag of an override folder name: the text after the last `.`.
///
/// A name without a dot yields the whole name as its own tag, as a plain
/// split on `.` would.
pub fn type_tag(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, tag)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fixed_name_stops_at_nul() {
        let raw = b"a.icn\0\0\0\0\0\0\0\0\0\0";
        assert_eq!(decode_fixed_name(raw), "A.ICN");
    }

    #[test]
    fn test_decode_fixed_name_full_width() {
        let raw = b"KNGHTTOWER1.ICN";
        assert_eq!(decode_fixed_name(raw), "KNGHTTOWER1.ICN");
    }

    #[test]
    fn test_normalize_keeps_whitespace() {
        assert_eq!(normalize_asset_name("a.icn"), "A.ICN");
        assert_ne!(normalize_asset_name(" A.ICN"), normalize_asset_name("A.ICN"));
    }

    #[test]
    fn test_override_dir_strips_extension() {
        let dir = override_dir_for(Utf8Path::new("data/HEROES2.AGG"), "AGG");
        assert_eq!(dir, Some(Utf8PathBuf::from("data/HEROES2")));
    }

    #[test]
    fn test_override_dir_case_insensitive() {
        let dir = override_dir_for(Utf8Path::new("data/heroes2.agg"), "AGG");
        assert_eq!(dir, Some(Utf8PathBuf::from("data/heroes2")));
    }

    #[test]
    fn test_override_dir_wrong_extension() {
        assert_eq!(override_dir_for(Utf8Path::new("data/heroes2.dat"), "AGG"), None);
        assert_eq!(override_dir_for(Utf8Path::new(".agg"), "AGG"), None);
    }

    #[test]
    fn test_type_tag() {
        assert_eq!(type_tag("ADVBTNS.ICN"), "ICN");
        assert_eq!(type_tag("A.B.TIL"), "TIL");
        assert_eq!(type_tag("NOTAG"), "NOTAG");
    }
}
