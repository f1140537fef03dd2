use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use indicatif::ProgressBar;

use crate::core::config::PipelineConfig;
use crate::core::error::{Error, Result};
use crate::core::filtering::SecondaryMode;

use super::args;

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    Ok(BufWriter::new(file))
}

pub fn bam(pbar: ProgressBar, matches: &ArgMatches) -> PathBuf {
    pbar.set_message("Parsing path to the aligned reads...");
    let result: PathBuf = matches.value_of_t_or_exit(args::core::BAM);
    pbar.finish_with_message(format!("Aligned reads: {}", result.display()));
    result
}

pub fn reference(pbar: ProgressBar, matches: &ArgMatches) -> PathBuf {
    pbar.set_message("Parsing path to the reference assembly...");
    let result: PathBuf = matches.value_of_t_or_exit(args::core::REFERENCE);
    pbar.finish_with_message(format!("Path to the reference assembly: {}", result.display()));
    result
}

pub fn reads(pbar: ProgressBar, matches: &ArgMatches) -> PathBuf {
    pbar.set_message("Parsing path to the signal archive...");
    let result: PathBuf = matches.value_of_t_or_exit(args::core::READS);
    pbar.finish_with_message(format!("Signal archive: {}", result.display()));
    result
}

pub fn model(pbar: ProgressBar, matches: &ArgMatches) -> Option<PathBuf> {
    pbar.set_message("Parsing k-mer model options...");
    let result = matches.value_of(args::core::MODEL).map(PathBuf::from);
    match &result {
        Some(x) => pbar.finish_with_message(format!("K-mer model: {}", x.display())),
        None => pbar.finish_with_message("K-mer model is not provided, zero levels are used"),
    }
    result
}

pub fn threads(pbar: ProgressBar, matches: &ArgMatches) -> usize {
    pbar.set_message("Parsing number of threads allowed to launch...");
    let result: usize = matches.value_of_t_or_exit(args::core::THREADS);
    pbar.finish_with_message(format!(
        "Using thread pool with at most {} threads(+ 1 thread to render progress bar)",
        result
    ));
    result
}

pub fn verbosity(matches: &ArgMatches) -> u8 {
    matches.value_of_t_or_exit(args::core::VERBOSITY)
}

pub fn config(pbar: ProgressBar, matches: &ArgMatches) -> PipelineConfig {
    pbar.set_message("Parsing reads filter options...");
    let (mapq, secondary, batch_capacity): (u8, SecondaryMode, usize) = (
        matches.value_of_t_or_exit(args::reads_filtering::MAPQ),
        matches.value_of_t_or_exit(args::reads_filtering::SECONDARY),
        matches.value_of_t_or_exit(args::core::BATCH_SIZE),
    );
    let print_raw = matches.is_present(args::output::PRINT_RAW);
    let result = PipelineConfig::new(print_raw, mapq, secondary, batch_capacity);

    let mut msg = format!(
        "Reads filter options: mapped, mapq >= {}, secondary alignments: {}. Batch size: {}.",
        result.min_mapq(),
        result.secondary(),
        result.batch_capacity()
    );
    if print_raw {
        msg += " Raw signals are printed to stdout.";
    }
    pbar.finish_with_message(msg);
    result
}

pub fn saveto(pbar: ProgressBar, matches: &ArgMatches) -> Result<BufWriter<File>> {
    pbar.set_message("Parsing output path...");
    let result: PathBuf = matches.value_of_t_or_exit(args::output::SAVETO);
    let file = create(&result)?;
    pbar.finish_with_message(format!("Result will be saved to {}", result.display()));
    Ok(file)
}

pub fn events(pbar: ProgressBar, matches: &ArgMatches) -> Result<Option<BufWriter<File>>> {
    pbar.set_message("Parsing events output path...");
    match matches.value_of(args::output::EVENTS) {
        Some(path) => {
            let file = create(path.as_ref())?;
            pbar.finish_with_message(format!("Events will be saved to {}", path));
            Ok(Some(file))
        }
        None => {
            pbar.finish_with_message("Events won't be saved");
            Ok(None)
        }
    }
}
