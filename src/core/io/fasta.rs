use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use bio_types::genome::{AbstractInterval, Interval};
#[cfg(test)]
use mockall::automock;
use rust_htslib::errors::Error as HtsError;
use rust_htslib::htslib;
use rust_htslib::utils::path_as_bytes;

use crate::core::error::{Error, Result};

#[cfg_attr(test, automock)]
pub trait ReferenceStore {
    /// Sequence of the half-open interval, exactly `interval.range()` long.
    fn fetch(&self, interval: &Interval) -> Result<Vec<u8>>;
}

/// Indexed FASTA reader. The `.fai` index is built next to the file when missing.
///
/// Owns the htslib handle directly: every fetched subsequence is copied out and
/// released right away, and unknown contigs are rejected before reaching htslib.
pub struct FaidxReference {
    inner: NonNull<htslib::faidx_t>,
    path: PathBuf,
}

impl FaidxReference {
    pub fn open(path: &Path) -> Result<Self> {
        let context = || format!("Failed to open indexed fasta file {}", path.display());
        let bytes = path_as_bytes(path, true).map_err(|e| Error::hts(context(), e))?;
        let cpath = CString::new(bytes).map_err(|_| Error::hts(context(), HtsError::NonUnicodePath))?;

        let inner = unsafe { htslib::fai_load(cpath.as_ptr()) };
        let inner = NonNull::new(inner)
            .ok_or_else(|| Error::hts(context(), HtsError::FileNotFound { path: path.to_owned() }))?;
        Ok(Self { inner, path: path.to_owned() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the contig, `None` when the index doesn't list it.
    pub fn contig_len(&self, contig: &str) -> Option<u64> {
        let name = CString::new(contig).ok()?;
        let fai = self.inner.as_ptr();
        if unsafe { htslib::faidx_has_seq(fai, name.as_ptr()) } == 0 {
            return None;
        }
        let len = unsafe { htslib::faidx_seq_len64(fai, name.as_ptr()) };
        u64::try_from(len).ok()
    }
}

impl ReferenceStore for FaidxReference {
    fn fetch(&self, interval: &Interval) -> Result<Vec<u8>> {
        let (start, end) = (interval.range().start, interval.range().end);
        let failed = || Error::ReferenceFetch { contig: interval.contig().to_owned(), start, end };
        match self.contig_len(interval.contig()) {
            Some(len) if start < end && end <= len => {}
            _ => return Err(failed()),
        }
        let name = CString::new(interval.contig()).map_err(|_| failed())?;

        // faidx uses inclusive end coordinates
        let mut fetched: htslib::hts_pos_t = 0;
        let ptr = unsafe {
            htslib::faidx_fetch_seq64(
                self.inner.as_ptr(),
                name.as_ptr(),
                start as htslib::hts_pos_t,
                end as htslib::hts_pos_t - 1,
                &mut fetched,
            )
        };
        if ptr.is_null() {
            return Err(failed());
        }
        let sequence = match usize::try_from(fetched) {
            Ok(n) => unsafe { std::slice::from_raw_parts(ptr as *const u8, n) }.to_vec(),
            Err(_) => Vec::new(),
        };
        unsafe { libc::free(ptr as *mut libc::c_void) };

        if sequence.len() as u64 != end - start {
            return Err(failed());
        }
        Ok(sequence)
    }
}

impl Drop for FaidxReference {
    fn drop(&mut self) {
        unsafe { htslib::fai_destroy(self.inner.as_ptr()) }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn reference(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("reference.fa");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, ">chr1\nACGTACGTAA\nCCGGTTAACC\n>chr2\nTTTTGGGG\n").unwrap();
        path
    }

    #[test]
    fn fetch() {
        let dir = TempDir::new().unwrap();
        let faidx = FaidxReference::open(&reference(&dir)).unwrap();

        for (contig, range, expected) in [
            ("chr1", 0..4, "ACGT"),
            ("chr1", 8..12, "AACC"),
            ("chr1", 19..20, "C"),
            ("chr2", 0..8, "TTTTGGGG"),
        ] {
            let interval = Interval::new(contig.to_owned(), range);
            assert_eq!(faidx.fetch(&interval).unwrap(), expected.as_bytes());
        }
    }

    #[test]
    fn out_of_range() {
        let dir = TempDir::new().unwrap();
        let faidx = FaidxReference::open(&reference(&dir)).unwrap();

        for (contig, range) in [("chr2", 4..12), ("chr3", 0..2), ("chr1", 5..5)] {
            let interval = Interval::new(contig.to_owned(), range);
            assert!(matches!(faidx.fetch(&interval), Err(Error::ReferenceFetch { .. })));
        }
    }

    #[test]
    fn unknown_contig() {
        let dir = TempDir::new().unwrap();
        let faidx = FaidxReference::open(&reference(&dir)).unwrap();
        assert_eq!(faidx.contig_len("chr1"), Some(20));
        assert_eq!(faidx.contig_len("chrX"), None);

        // Repeated lookups must neither crash nor poison the handle
        for _ in 0..3 {
            let err = faidx.fetch(&Interval::new("chrX".to_owned(), 0..2)).unwrap_err();
            assert!(matches!(err, Error::ReferenceFetch { ref contig, start: 0, end: 2 } if contig == "chrX"));
        }
        assert_eq!(faidx.fetch(&Interval::new("chr2".to_owned(), 2..6)).unwrap(), b"TTGG");
    }

    #[test]
    fn missing() {
        assert!(FaidxReference::open(Path::new("/definitely/missing.fa")).is_err());
    }
}
