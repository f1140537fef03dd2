use std::fmt::{Display, Formatter};
use std::str::FromStr;

use derive_getters::Getters;
use derive_more::Constructor;

use super::{AlignedRead, ReadsFilter};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SecondaryMode {
    Keep,
    Skip,
}

impl Default for SecondaryMode {
    fn default() -> Self {
        SecondaryMode::Keep
    }
}

impl FromStr for SecondaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(SecondaryMode::Keep),
            "skip" => Ok(SecondaryMode::Skip),
            _ => Err(format!("Secondary alignments mode must be \"keep\" or \"skip\", got \"{}\"", s)),
        }
    }
}

impl Display for SecondaryMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            SecondaryMode::Keep => "keep",
            SecondaryMode::Skip => "skip",
        };
        f.write_str(symbol)
    }
}

#[derive(Constructor, Getters, Copy, Clone, Debug)]
pub struct BySecondary {
    mode: SecondaryMode,
}

impl<R: AlignedRead> ReadsFilter<R> for BySecondary {
    #[inline]
    fn is_read_ok(&self, record: &R) -> bool {
        match self.mode {
            SecondaryMode::Keep => true,
            SecondaryMode::Skip => !record.is_secondary(),
        }
    }
}
