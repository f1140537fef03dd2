use derive_getters::Getters;
use derive_more::Constructor;

use super::{AlignedRead, ReadsFilter};

#[derive(Constructor, Getters, Copy, Clone, Debug)]
pub struct ByQuality {
    mapq: u8,
}

impl<R: AlignedRead> ReadsFilter<R> for ByQuality {
    #[inline]
    fn is_read_ok(&self, record: &R) -> bool {
        !record.is_unmapped() && record.mapq() >= self.mapq
    }
}
