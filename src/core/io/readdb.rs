use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::io::utils;

pub const MANIFEST_SUFFIX: &str = ".index.readdb";

/// Read identifier -> signal file manifest.
#[derive(Debug)]
pub struct ReadDb {
    manifest: PathBuf,
    paths: HashMap<String, PathBuf>,
}

impl ReadDb {
    /// Path to the manifest that accompanies the given reads file.
    pub fn manifest(reads: &Path) -> PathBuf {
        let isdb = reads.file_name().and_then(OsStr::to_str).map(|x| x.ends_with(".readdb")).unwrap_or(false);
        if isdb {
            reads.to_owned()
        } else {
            let mut manifest = reads.as_os_str().to_owned();
            manifest.push(MANIFEST_SUFFIX);
            manifest.into()
        }
    }

    pub fn load(reads: &Path) -> Result<Self> {
        let manifest = Self::manifest(reads);
        let reader = utils::open(&manifest)?;
        let root = manifest.parent().map(Path::to_path_buf).unwrap_or_default();
        let paths = Self::parse(reader, &manifest, &root)?;
        Ok(Self { manifest, paths })
    }

    fn parse(mut reader: impl BufRead, manifest: &Path, root: &Path) -> Result<HashMap<String, PathBuf>> {
        let mut paths = HashMap::new();

        let mut buf = String::new();
        let mut line = 0;
        loop {
            buf.clear();
            line += 1;
            if reader.read_line(&mut buf).map_err(|e| Error::io(manifest, e))? == 0 {
                break;
            }
            let record = buf.trim_end();
            if record.is_empty() {
                continue;
            }

            let mut split = record.splitn(2, '\t');
            let read = split.next().unwrap_or_default();
            if read.is_empty() {
                return Err(Error::malformed(manifest, line, "empty read identifier"));
            }
            // Reads without a signal file are listed with an empty path
            let path = match split.next().map(str::trim) {
                Some(x) if !x.is_empty() => x,
                _ => continue,
            };
            let path = Path::new(path);
            let path = if path.is_relative() { root.join(path) } else { path.to_owned() };
            paths.insert(read.to_owned(), path);
        }
        Ok(paths)
    }

    pub fn get(&self, read: &str) -> Option<&Path> {
        self.paths.get(read).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.manifest
    }
}
