//! Error types for archive operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. `std::io::Error` and `binrw::Error` are converted via `From`.
//!
//! A name that is missing from an archive is *not* an error: [`AggFile::read`](crate::AggFile::read)
//! returns an empty buffer so that callers can fall through to the next archive
//! in an [`AggChain`](crate::AggChain).

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening, reading or synthesizing assets.
#[derive(Error, Debug)]
pub enum Error {
    /// Opening, seeking or reading the underlying stream failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixed-layout structure could not be read from the stream.
    #[error("Binary read error: {0}")]
    Binary(#[from] binrw::Error),

    /// The archive or sprite-sheet layout is malformed.
    #[error("Invalid format: {0}")]
    Format(String),

    /// The declared record count cannot fit inside the file.
    #[error("Record count {count} does not fit in a {file_size} byte archive")]
    CountTooLarge { count: usize, file_size: u64 },

    /// Two or more records share a name, so the index cannot be trusted.
    #[error("Archive declares {declared} records but only {unique} unique names")]
    DuplicateNames { declared: usize, unique: usize },

    /// A record points outside the archive file.
    #[error("Record '{name}' (offset {offset}, size {size}) exceeds archive size {file_size}")]
    RecordOutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        file_size: u64,
    },

    /// An override image could not be decoded.
    #[error("Failed to decode image '{path}': {message}")]
    Decode { path: Utf8PathBuf, message: String },

    /// An override image is larger than a sprite-sheet slot can describe.
    #[error("Image '{path}' is {width}x{height}, slot dimensions are limited to 65535")]
    ImageTooLarge {
        path: Utf8PathBuf,
        width: u32,
        height: u32,
    },

    /// Opening one archive of a chain failed.
    #[error("Failed to open archive '{path}': {source}")]
    ChainOpen {
        path: Utf8PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether this error came from decoding override images.
    ///
    /// Decode failures only ever discard a single override; the rest of the
    /// archive stays usable.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::ImageTooLarge { .. })
    }
}
