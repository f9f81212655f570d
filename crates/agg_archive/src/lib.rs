//! Reader for AGG asset archives with on-disk overrides.
//!
//! An AGG archive packs many named assets behind a record table and a trailing
//! block of fixed-width names. This crate provides:
//!
//! - **Index parsing**: positional pairing of records and names, with
//!   all-or-nothing validation ([`ArchiveIndex`])
//! - **Overrides**: folders next to the archive named `<ASSET>.<TYPE>` replace
//!   the packed asset of the same name ([`collect_overrides`])
//! - **Sprite-sheet synthesis**: an `<ASSET>.ICN` folder of images is turned into
//!   a byte-exact ICN container ([`spawn_icn_from_dir`], [`SpriteSheet`])
//! - **Resolution**: [`AggFile::read`] and the multi-archive [`AggChain`]
//!
//! # Example
//!
//! ```no_run
//! use agg_archive::{AggChain, AggConfig, ResolveEvent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AggConfig::default();
//! let mut chain = AggChain::open(&["data/HEROES2X.AGG", "data/HEROES2.AGG"], &config)?
//!     .with_events(|event| {
//!         if let ResolveEvent::OverrideUsed { name, .. } = event {
//!             println!("Using the external version of {name}");
//!         }
//!     });
//!
//! let bytes = chain.read("ADVBTNS.ICN")?;
//! println!("{} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod chain;
pub mod config;
pub mod decoder;
pub mod error;
pub mod icn;
pub mod index;
pub mod overrides;
pub mod utils;

// Re-export main types
pub use archive::{AggFile, ResolveEvent};
pub use chain::AggChain;
pub use config::AggConfig;
pub use decoder::{DecodedImage, ImageDecoder, RasterDecoder};
pub use error::{Error, Result};
pub use icn::{spawn_icn_from_dir, write_sprite_sheet, IcnHeader, SpriteSheet};
pub use index::{ArchiveIndex, IndexEntry};
pub use overrides::{collect_overrides, OverrideKind, OverrideTable};
