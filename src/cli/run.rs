use std::io::{self, Write};

use indicatif::ProgressBar;

use crate::core::batch::Batch;
use crate::core::error::{Error, Result};
use crate::core::events::TTestSegmenter;
use crate::core::pipeline::{self, HtsPipelineContext};
use crate::core::read::AlignedRead;

use super::args::Args;
use super::{resformat, style};

pub fn run(args: Args, pbar: ProgressBar) -> Result<()> {
    let Args { bam, reference, reads, model, config, saveto, events, .. } = args;
    let mut ctx = HtsPipelineContext::open(&bam, &reference, &reads, model.as_deref(), config)?;
    log::info!("Pipeline context is ready, batch capacity: {}", config.batch_capacity());

    let mut batch = Batch::new(*config.batch_capacity());
    let segmenter = TTestSegmenter::default();
    let mut saveto = resformat::writer(saveto);
    let mut eventsto = events.map(resformat::writer);

    pbar.set_style(style::cycles());
    pbar.enable_steady_tick(250);

    let (mut cycles, mut written) = (0usize, 0usize);
    loop {
        let loaded = ctx.load(&mut batch)?;
        if loaded == 0 {
            break;
        }
        cycles += 1;

        if *config.print_raw() {
            print_raw(&batch, &mut saveto, io::stdout().lock())?;
        }

        let processed = pipeline::process(&mut batch, &segmenter);
        written += resformat::batch(&batch, ctx.source(), &mut saveto, eventsto.as_mut())?;
        log::debug!("Cycle {}: {} reads loaded, {} processed", cycles, loaded, processed);

        batch.clear_cycle();
        pbar.inc(loaded as u64);
        pbar.set_message(format!("accepted, {} batches processed", cycles));
    }

    saveto.flush().map_err(csv::Error::from)?;
    if let Some(eventsto) = eventsto.as_mut() {
        eventsto.flush().map_err(csv::Error::from)?;
    }

    let stats = ctx.stats();
    pbar.set_style(style::summary());
    pbar.finish_with_message(format!(
        "Finished: {} records pulled, {} rejected, {} accepted ({} without reference, {} without signal). \
         Saved reads: {}",
        stats.pulled,
        stats.rejected,
        stats.accepted,
        stats.without_reference,
        stats.without_signal,
        written
    ));
    // The last batch is released before the context
    drop(batch);
    drop(ctx);
    Ok(())
}

/// `--output` defaults to stdout as well: pending summary rows go out before the dump.
fn print_raw<R: AlignedRead, W: Write>(
    batch: &Batch<R>,
    saveto: &mut csv::Writer<W>,
    mut rawto: impl Write,
) -> Result<()> {
    saveto.flush().map_err(csv::Error::from)?;
    pipeline::dump_raw(batch, &mut rawto).map_err(|e| Error::io("/dev/stdout", e))?;
    rawto.flush().map_err(|e| Error::io("/dev/stdout", e))?;
    Ok(())
}
