use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::core::error::{Error, Result};
use crate::core::io::readdb::ReadDb;
use crate::core::io::slow5::Slow5Index;

use super::SignalRecord;

#[cfg_attr(test, automock)]
pub trait SignalArchive {
    fn resolve(&self, read: &str) -> Result<PathBuf>;

    /// Reads the record of `read`; the signal file is closed before returning.
    fn fetch(&self, path: &Path, read: &str) -> Result<SignalRecord>;
}

/// SLOW5 files located through a readdb manifest.
/// Each file is indexed on first access, later fetches seek straight to the record.
pub struct Slow5Archive {
    readdb: ReadDb,
    indices: RefCell<HashMap<PathBuf, Slow5Index>>,
}

impl Slow5Archive {
    pub fn open(reads: &Path) -> Result<Self> {
        Ok(Self { readdb: ReadDb::load(reads)?, indices: RefCell::default() })
    }

    pub fn readdb(&self) -> &ReadDb {
        &self.readdb
    }

    /// Number of signal files indexed so far.
    pub fn indexed(&self) -> usize {
        self.indices.borrow().len()
    }
}

fn unreadable(e: Error) -> Error {
    match e {
        Error::Io { path, source } => Error::SignalUnreadable { path, reason: source.to_string() },
        e => e,
    }
}

impl SignalArchive for Slow5Archive {
    fn resolve(&self, read: &str) -> Result<PathBuf> {
        self.readdb.get(read).map(Path::to_path_buf).ok_or_else(|| Error::SignalNotFound(read.to_owned()))
    }

    fn fetch(&self, path: &Path, read: &str) -> Result<SignalRecord> {
        let mut indices = self.indices.borrow_mut();
        let index = match indices.entry(path.to_owned()) {
            Entry::Occupied(x) => x.into_mut(),
            Entry::Vacant(x) => {
                let index = Slow5Index::build(path).map_err(unreadable)?;
                log::debug!("Indexed {} signal records in {}", index.len(), path.display());
                x.insert(index)
            }
        };
        index.fetch(read).map_err(unreadable)
    }
}
