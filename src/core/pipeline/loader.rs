use std::ops::AddAssign;

use bio_types::genome::Interval;

use crate::core::batch::{Batch, Slot};
use crate::core::error::{Error, Result};
use crate::core::filtering::ReadsFilter;
use crate::core::io::fasta::ReferenceStore;
use crate::core::io::hts::ReadSource;
use crate::core::read::AlignedRead;
use crate::core::signal::SignalArchive;

use super::PipelineContext;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct LoadStats {
    pub pulled: usize,
    pub rejected: usize,
    pub accepted: usize,
    pub without_reference: usize,
    pub without_signal: usize,
}

impl AddAssign for LoadStats {
    fn add_assign(&mut self, rhs: Self) {
        self.pulled += rhs.pulled;
        self.rejected += rhs.rejected;
        self.accepted += rhs.accepted;
        self.without_reference += rhs.without_reference;
        self.without_signal += rhs.without_signal;
    }
}

impl<Source, Reference, Archive> PipelineContext<Source, Reference, Archive>
where
    Source: ReadSource,
    Reference: ReferenceStore,
    Archive: SignalArchive,
{
    /// Fills the batch with the next qualifying reads and correlates each of them with its reference
    /// subsequence and raw signal. Returns the number of occupied slots, 0 once the input is exhausted.
    pub fn load(&mut self, batch: &mut Batch<Source::Record>) -> Result<usize> {
        let mut stats = LoadStats::default();
        let filter = self.config.readfilter::<Source::Record>();

        batch.reset();
        // Rejected records stay in the vacant slot and get overwritten by the next pull
        while let Some(slot) = batch.vacant() {
            match self.source.read(&mut slot.read) {
                None => break,
                Some(result) => result?,
            }
            stats.pulled += 1;

            if filter.is_read_ok(&slot.read) {
                batch.occupy();
            } else {
                stats.rejected += 1;
            }
        }
        stats.accepted = batch.len();

        for slot in batch.occupied_mut() {
            self.correlate(slot, &mut stats);
        }

        log::debug!(
            "Batch loaded: {} records pulled, {} rejected, {} accepted ({} without reference, {} without signal)",
            stats.pulled,
            stats.rejected,
            stats.accepted,
            stats.without_reference,
            stats.without_signal
        );
        self.stats += stats;
        Ok(batch.len())
    }

    fn span(&self, read: &Source::Record) -> Result<Interval> {
        let contig = self.source.contig(read.tid())?;
        let (start, end) = (read.pos(), read.endpos());
        if start < 0 || end < start {
            let (start, end) = (start.max(0) as u64, end.max(0) as u64);
            return Err(Error::ReferenceFetch { contig: contig.to_owned(), start, end });
        }
        Ok(Interval::new(contig.to_owned(), start as u64..end as u64))
    }

    fn correlate(&self, slot: &mut Slot<Source::Record>, stats: &mut LoadStats) {
        let name = String::from_utf8_lossy(slot.read.name()).into_owned();
        // Attachments left over from a cycle that was never cleared
        slot.path = None;
        slot.events = None;

        slot.reference = match self.span(&slot.read).and_then(|x| self.reference.fetch(&x)) {
            Ok(sequence) => Some(sequence),
            Err(e) => {
                log::warn!("Reference sequence is unavailable, read {} will be skipped: {}", name, e);
                stats.without_reference += 1;
                None
            }
        };

        let signal = self.archive.resolve(&name).and_then(|path| {
            let signal = self.archive.fetch(&path, &name);
            slot.path = Some(path);
            signal
        });
        slot.signal = match signal {
            Ok(signal) => Some(signal),
            Err(e) => {
                log::warn!("Signal is unreadable, read {} will be skipped: {}", name, e);
                stats.without_signal += 1;
                None
            }
        };
    }
}
