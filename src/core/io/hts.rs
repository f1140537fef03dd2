use std::path::{Path, PathBuf};

use rust_htslib::bam::{self, FetchDefinition, Read, Record};

use crate::core::error::{Error, Result};
use crate::core::read::{AlignedRead, Recycle};

/// Sequential source of alignment records.
pub trait ReadSource {
    type Record: AlignedRead + Recycle;

    /// Fill `record` in place with the next alignment. `None` signals the end of the stream.
    fn read(&mut self, record: &mut Self::Record) -> Option<Result<()>>;

    fn contig(&self, tid: i32) -> Result<&str>;
}

/// Whole-file iterator over an indexed BAM/CRAM file.
pub struct HtsReadSource {
    reader: bam::IndexedReader,
    path: PathBuf,
}

impl HtsReadSource {
    pub fn open(path: &Path) -> Result<Self> {
        // Opens the file, loads the index and parses the header
        let mut reader = bam::IndexedReader::from_path(path).map_err(|e| {
            Error::hts(
                format!(
                    "Failed to open file {}\n\
                    Possible reasons: BAM file was not indexed (samtools index); you don't have read permissions",
                    path.display()
                ),
                e,
            )
        })?;

        // Region filtering is not supported yet, iterate over everything
        reader
            .fetch(FetchDefinition::All)
            .map_err(|e| Error::hts(format!("Failed to create an iterator over {}", path.display()), e))?;

        Ok(Self { reader, path: path.to_owned() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReadSource for HtsReadSource {
    type Record = Record;

    fn read(&mut self, record: &mut Record) -> Option<Result<()>> {
        let path = &self.path;
        self.reader.read(record).map(|r| {
            r.map_err(|e| Error::hts(format!("Failed to parse record in {} (HTS file corrupted?)", path.display()), e))
        })
    }

    fn contig(&self, tid: i32) -> Result<&str> {
        let header = self.reader.header();
        if tid < 0 || tid as u32 >= header.target_count() {
            return Err(Error::UnknownContig(tid));
        }
        std::str::from_utf8(header.tid2name(tid as u32)).map_err(|_| Error::UnknownContig(tid))
    }
}
