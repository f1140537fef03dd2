use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Hts {
        context: String,
        #[source]
        source: rust_htslib::errors::Error,
    },

    #[error("failed to fetch reference sequence for {contig}:{start}-{end}")]
    ReferenceFetch { contig: String, start: u64, end: u64 },

    #[error("read {0} is not listed in the signal archive index")]
    SignalNotFound(String),

    #[error("signal file {} is unreadable: {reason}", path.display())]
    SignalUnreadable { path: PathBuf, reason: String },

    #[error("{}:{line}: {reason}", path.display())]
    Malformed { path: PathBuf, line: usize, reason: String },

    #[error("contig id {0} is missing from the alignment header")]
    UnknownContig(i32),

    #[error("failed to write output: {0}")]
    Output(#[from] csv::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub fn hts(context: impl Into<String>, source: rust_htslib::errors::Error) -> Self {
        Error::Hts { context: context.into(), source }
    }

    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Error::Malformed { path: path.into(), line, reason: reason.into() }
    }
}
