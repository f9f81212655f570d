use agg_archive::Error as ArchiveError;
use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("File not found: {path}")]
    #[diagnostic(
        code(file::not_found),
        help("Make sure the file exists and the path is correct")
    )]
    FileNotFound { path: Utf8PathBuf },

    #[error("No archives given")]
    #[diagnostic(
        code(archive::none_given),
        help("Pass --archive <PATH> or list archives under `archives` in config.toml")
    )]
    NoArchives,

    #[error("Archive is malformed: {path}")]
    #[diagnostic(
        code(archive::malformed),
        help("The record table or name block is inconsistent; the file may be truncated or not an AGG archive")
    )]
    MalformedArchive {
        path: Utf8PathBuf,
        #[source]
        source: ArchiveError,
    },

    #[error("Asset not found: {name}")]
    #[diagnostic(
        code(asset::not_found),
        help("Asset names are the fixed-width names stored in the archive, e.g. ADVBTNS.ICN. Run `agg-tool info` to list them")
    )]
    AssetNotFound { name: String },

    #[error("No images found in {dir}")]
    #[diagnostic(
        code(icn::no_images),
        help("Place .png or .bmp files directly inside the folder (subfolders are not scanned)")
    )]
    NoImages { dir: Utf8PathBuf },

    #[error("Configuration file error: {path}")]
    #[diagnostic(
        code(config::parse_error),
        help("Check config.toml for syntax errors")
    )]
    ConfigParseError {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Archive operation failed")]
    #[diagnostic(code(archive::operation_failed))]
    Archive {
        #[from]
        source: ArchiveError,
    },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    /// Classify an error raised while opening `path`.
    pub fn from_open(path: Utf8PathBuf, source: ArchiveError) -> Self {
        match source {
            ArchiveError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::FileNotFound { path }
            }
            ArchiveError::ChainOpen { path, source } => Self::from_open(path, *source),
            ArchiveError::Format(_)
            | ArchiveError::CountTooLarge { .. }
            | ArchiveError::DuplicateNames { .. }
            | ArchiveError::RecordOutOfBounds { .. }
            | ArchiveError::Binary(_) => Self::MalformedArchive { path, source },
            other => Self::Archive { source: other },
        }
    }
}
