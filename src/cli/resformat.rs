use std::borrow::Cow;
use std::io::Write;

use serde::Serialize;

use crate::core::batch::Batch;
use crate::core::error::Result;
use crate::core::io::hts::ReadSource;
use crate::core::read::AlignedRead;

#[derive(Serialize)]
struct SummaryRow<'a> {
    read: Cow<'a, str>,
    contig: &'a str,
    start: i64,
    end: i64,
    reference_len: usize,
    samples: usize,
    events: usize,
}

#[derive(Serialize)]
struct EventRow<'a> {
    read: &'a str,
    index: usize,
    start: usize,
    length: usize,
    mean: f32,
    stdv: f32,
}

pub fn writer<W: Write>(saveto: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(saveto)
}

/// Writes one summary row per slot with detected events and, optionally, all of its events.
/// Returns the number of written reads.
pub fn batch<S: ReadSource, W: Write, E: Write>(
    batch: &Batch<S::Record>,
    source: &S,
    saveto: &mut csv::Writer<W>,
    mut eventsto: Option<&mut csv::Writer<E>>,
) -> Result<usize> {
    let mut written = 0;
    for slot in batch.occupied() {
        let (reference, signal, events) = match (&slot.reference, &slot.signal, &slot.events) {
            (Some(reference), Some(signal), Some(events)) if !events.is_empty() => (reference, signal, events),
            _ => continue,
        };
        let read = String::from_utf8_lossy(slot.read.name());

        saveto.serialize(SummaryRow {
            read: read.clone(),
            contig: source.contig(slot.read.tid())?,
            start: slot.read.pos(),
            end: slot.read.endpos(),
            reference_len: reference.len(),
            samples: signal.nsample(),
            events: events.len(),
        })?;

        if let Some(eventsto) = eventsto.as_mut() {
            for (index, event) in events.events().iter().enumerate() {
                eventsto.serialize(EventRow {
                    read: &read,
                    index,
                    start: event.start,
                    length: event.length,
                    mean: event.mean,
                    stdv: event.stdv,
                })?;
            }
        }
        written += 1;
    }
    Ok(written)
}
