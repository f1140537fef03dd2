use derive_getters::Getters;
use derive_more::Constructor;

use crate::core::filtering::{ByQuality, BySecondary, Chain, SecondaryMode};
use crate::core::read::AlignedRead;

pub const DEFAULT_MIN_MAPQ: u8 = 30;
pub const DEFAULT_BATCH_CAPACITY: usize = 512;

#[derive(Constructor, Getters, Copy, Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    print_raw: bool,
    min_mapq: u8,
    secondary: SecondaryMode,
    batch_capacity: usize,
}

impl PipelineConfig {
    /// Mapping quality is checked before the secondary flag.
    pub fn readfilter<R: AlignedRead>(&self) -> Chain<R, ByQuality, BySecondary> {
        Chain::new(ByQuality::new(self.min_mapq), BySecondary::new(self.secondary))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            print_raw: false,
            min_mapq: DEFAULT_MIN_MAPQ,
            secondary: SecondaryMode::Keep,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
        }
    }
}
