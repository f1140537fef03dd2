use std::path::Path;

use serde::Deserialize;

use crate::core::error::{Error, Result};
use crate::core::io::utils;

pub const KMER_SIZE: usize = 6;
// 4^6
pub const MODEL_ENTRIES: usize = 1 << (2 * KMER_SIZE);

/// Expected current levels for one k-mer context.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct ModelEntry {
    pub level_mean: f32,
    pub level_stdv: f32,
    pub sd_mean: f32,
    pub sd_stdv: f32,
}

#[derive(Deserialize)]
struct ModelRow {
    kmer: String,
    level_mean: f32,
    level_stdv: f32,
    sd_mean: f32,
    sd_stdv: f32,
}

impl From<&ModelRow> for ModelEntry {
    fn from(row: &ModelRow) -> Self {
        Self { level_mean: row.level_mean, level_stdv: row.level_stdv, sd_mean: row.sd_mean, sd_stdv: row.sd_stdv }
    }
}

/// Fixed-size pore model indexed by k-mer rank. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct ModelTable {
    entries: Box<[ModelEntry]>,
}

#[inline]
fn nucrank(nuc: u8) -> Option<usize> {
    match nuc {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

pub fn kmer_rank(kmer: &[u8]) -> Option<usize> {
    if kmer.len() != KMER_SIZE {
        return None;
    }
    kmer.iter().try_fold(0usize, |rank, nuc| nucrank(*nuc).map(|x| (rank << 2) | x))
}

impl ModelTable {
    pub fn new() -> Self {
        Self { entries: vec![ModelEntry::default(); MODEL_ENTRIES].into_boxed_slice() }
    }

    pub fn from_tsv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .flexible(true)
            .from_reader(utils::open(path)?);
        let headers = reader.headers().map_err(|e| Error::malformed(path, 1, e.to_string()))?.clone();

        let mut table = Self::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                let line = e.position().map(|x| x.line() as usize).unwrap_or(0);
                Error::malformed(path, line, e.to_string())
            })?;
            let line = record.position().map(|x| x.line() as usize).unwrap_or(0);

            let row: ModelRow =
                record.deserialize(Some(&headers)).map_err(|e| Error::malformed(path, line, e.to_string()))?;
            let rank = kmer_rank(row.kmer.as_bytes())
                .ok_or_else(|| Error::malformed(path, line, format!("invalid {}-mer {}", KMER_SIZE, row.kmer)))?;
            table.entries[rank] = ModelEntry::from(&row);
        }
        Ok(table)
    }

    #[inline]
    pub fn get(&self, rank: usize) -> &ModelEntry {
        &self.entries[rank]
    }

    pub fn lookup(&self, kmer: &[u8]) -> Option<&ModelEntry> {
        kmer_rank(kmer).map(|rank| self.get(rank))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ModelTable {
    fn default() -> Self {
        Self::new()
    }
}
