//! Priority-ordered lookup across several archives.
//!
//! Expansion archives are consulted before the base archive, so a name that is
//! absent (or unreadable) in one archive falls through to the next.

use crate::archive::{AggFile, ResolveEvent};
use crate::config::AggConfig;
use crate::error::{Error, Result};
use camino::Utf8Path;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::sync::Arc;

/// Archives in lookup order, highest priority first.
pub struct AggChain<R: Read + Seek = BufReader<File>> {
    archives: Vec<AggFile<R>>,
}

impl AggChain<BufReader<File>> {
    /// Open every archive in `paths`, highest priority first.
    ///
    /// Fails on the first archive that cannot be opened.
    pub fn open<P: AsRef<Utf8Path>>(paths: &[P], config: &AggConfig) -> Result<Self> {
        let archives = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                AggFile::open_with_config(path, config).map_err(|source| Error::ChainOpen {
                    path: path.to_path_buf(),
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { archives })
    }
}

impl<R: Read + Seek> AggChain<R> {
    pub fn from_archives(archives: Vec<AggFile<R>>) -> Self {
        Self { archives }
    }

    /// Register one callback on every archive in the chain.
    pub fn with_events<F>(mut self, callback: F) -> Self
    where
        F: Fn(ResolveEvent) + Send + Sync + 'static,
    {
        let callback: Arc<dyn Fn(ResolveEvent) + Send + Sync> = Arc::new(callback);
        for archive in &mut self.archives {
            archive.set_event_callback(Some(Arc::clone(&callback)));
        }
        self
    }

    /// Return the first non-empty result in priority order.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        for archive in &mut self.archives {
            let data = archive.read(name)?;
            if !data.is_empty() {
                return Ok(data);
            }
        }
        Ok(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }
}
