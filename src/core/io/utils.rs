use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;

use crate::core::error::{Error, Result};

/// Opens a plain or gzip-compressed (".gz") text file.
pub fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    match path.extension().and_then(OsStr::to_str) {
        Some("gz") => Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader)))),
        Some(_) | None => Ok(Box::new(reader)),
    }
}

/// Same as [`open`], positioned `offset` bytes into the (decompressed) content.
/// Plain files seek, gzip streams are decoded up to the offset.
pub fn open_at(path: &Path, offset: u64) -> Result<Box<dyn BufRead>> {
    match path.extension().and_then(OsStr::to_str) {
        Some("gz") => {
            let mut reader = open(path)?;
            let skipped = io::copy(&mut reader.by_ref().take(offset), &mut io::sink()).map_err(|e| Error::io(path, e))?;
            if skipped != offset {
                return Err(Error::io(path, io::Error::new(io::ErrorKind::UnexpectedEof, "offset is past the end")));
            }
            Ok(reader)
        }
        Some(_) | None => {
            let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
            file.seek(SeekFrom::Start(offset)).map_err(|e| Error::io(path, e))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}
