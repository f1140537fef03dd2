#[cfg(test)]
use mockall::automock;

pub use by_quality::ByQuality;
pub use by_secondary::{BySecondary, SecondaryMode};
pub use chain::Chain;

use crate::core::read::AlignedRead;

mod by_quality;
mod by_secondary;
mod chain;

#[cfg_attr(test, automock)]
pub trait ReadsFilter<R: AlignedRead> {
    fn is_read_ok(&self, record: &R) -> bool;
}
