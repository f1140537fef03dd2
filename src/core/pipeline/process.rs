use std::io::{self, Write};

use itertools::Itertools;
use rayon::prelude::*;

use crate::core::batch::{Batch, Slot};
use crate::core::events::Segmenter;
use crate::core::read::AlignedRead;

/// Converts non-empty signals of all correlated slots to picoamperes and detects their events.
/// Slots are independent and processed on the rayon thread pool. Returns the number of processed slots.
pub fn process<R, S: Segmenter + Sync>(batch: &mut Batch<R>, segmenter: &S) -> usize {
    // Records themselves are not required to be Send, only the attachments cross threads
    let work: Vec<_> = batch
        .occupied_mut()
        .iter_mut()
        .filter_map(|slot| {
            let Slot { reference, signal, events, .. } = slot;
            match (reference, signal) {
                (Some(_), Some(signal)) if signal.nsample() > 0 => Some((signal, events)),
                _ => None,
            }
        })
        .collect();
    let processed = work.len();

    work.into_par_iter().for_each(|(signal, events)| {
        signal.normalize();
        *events = Some(segmenter.segment(signal.samples()));
    });
    processed
}

/// Writes raw (not yet normalized) samples of every slot with an attached signal.
pub fn dump_raw<R: AlignedRead>(batch: &Batch<R>, mut saveto: impl Write) -> io::Result<()> {
    for slot in batch.occupied() {
        let signal = match &slot.signal {
            Some(x) => x,
            None => continue,
        };
        let path = slot.path.as_ref().map(|x| x.display().to_string()).unwrap_or_default();
        writeln!(saveto, "@{}\t{}\t{}", String::from_utf8_lossy(slot.read.name()), path, signal.nsample())?;
        writeln!(saveto, "{}", signal.samples().iter().map(|x| *x as i32).join("\t"))?;
    }
    Ok(())
}
