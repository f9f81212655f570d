//! Tool configuration stored in config.toml.
//!
//! The file lives next to the executable unless `--config` points elsewhere.
//! A missing file yields defaults; a malformed one is reported.

use crate::errors::CliError;
use agg_archive::AggConfig;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Application-wide configuration.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Archives consulted when no `--archive` is given, highest priority first.
    pub archives: Vec<Utf8PathBuf>,
    /// Archive reader options.
    #[serde(flatten)]
    pub archive: AggConfig,
}

impl AppConfig {
    /// Archives from the command line, falling back to the configured chain.
    pub fn resolve_archives(&self, cli: Vec<Utf8PathBuf>) -> Result<Vec<Utf8PathBuf>, CliError> {
        let archives = if cli.is_empty() {
            self.archives.clone()
        } else {
            cli
        };
        if archives.is_empty() {
            return Err(CliError::NoArchives);
        }
        Ok(archives)
    }
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (config.toml).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join("config.toml"))
}

/// Load configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Utf8Path>) -> Result<AppConfig, CliError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(AppConfig::default()),
        },
    };

    if !path.as_std_path().exists() {
        tracing::debug!("No config at {}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path.as_std_path())?;
    toml::from_str(&content).map_err(|source| CliError::ConfigParseError { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("config.toml")).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), AppConfig::default());
    }

    #[test]
    fn load_flattened_archive_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("config.toml")).unwrap();
        fs::write(
            &path,
            "archives = [\"HEROES2X.AGG\", \"HEROES2.AGG\"]\ncollect_overrides = false\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.archives.len(), 2);
        assert!(!cfg.archive.collect_overrides);
        assert_eq!(cfg.archive.name_width, 15);
    }

    #[test]
    fn load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("config.toml")).unwrap();
        fs::write(&path, "archives = 5").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn cli_archives_take_precedence() {
        let cfg = AppConfig {
            archives: vec![Utf8PathBuf::from("A.AGG")],
            ..AppConfig::default()
        };
        let resolved = cfg.resolve_archives(vec![Utf8PathBuf::from("B.AGG")]).unwrap();
        assert_eq!(resolved, vec![Utf8PathBuf::from("B.AGG")]);
        assert!(AppConfig::default().resolve_archives(Vec::new()).is_err());
    }
}
