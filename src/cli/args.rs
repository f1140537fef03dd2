use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Arg, ArgMatches};
use indicatif::ProgressBar;

use crate::core::config::PipelineConfig;
use crate::core::error::Result;

use super::{parse, validate};

pub mod core {
    use super::*;
    pub const BAM: &str = "bam";
    pub const REFERENCE: &str = "reference";
    pub const READS: &str = "reads";
    pub const MODEL: &str = "model";
    pub const BATCH_SIZE: &str = "batch-size";
    pub const THREADS: &str = "threads";
    pub const VERBOSITY: &str = "verbosity";

    pub const SECTION_NAME: &str = "Core";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(BAM)
                .short('b')
                .long(BAM)
                .takes_value(true)
                .required(true)
                .validator(validate::path)
                .long_help("Path to the coordinate-sorted and indexed BAM file with reads aligned to the reference genome."),
            Arg::new(REFERENCE)
                .short('r')
                .long(REFERENCE)
                .takes_value(true)
                .required(true)
                .validator(validate::path)
                .long_help("Indexed fasta file with a reference genome assembly. Contig/chromosome names must match the names in the BAM header."),
            Arg::new(READS)
                .short('s')
                .long(READS)
                .takes_value(true)
                .required(true)
                .long_help("Signal archive of the sequencing run. Either the .readdb manifest itself or a path X such that X.index.readdb exists. Each manifest line maps a read name to the SLOW5 file holding its raw signal."),
            Arg::new(MODEL)
                .long(MODEL)
                .takes_value(true)
                .validator(validate::path)
                .long_help("Tab-separated k-mer pore model (kmer, level_mean, level_stdv, sd_mean, sd_stdv). All k-mers default to zero levels when omitted."),
            Arg::new(BATCH_SIZE)
                .long(BATCH_SIZE)
                .takes_value(true)
                .validator(validate::numeric(1usize, 1_000_000usize))
                .default_value("512")
                .long_help("Maximum number of reads loaded and processed in a single cycle. Larger batches keep more threads busy at the cost of memory."),
            Arg::new(THREADS)
                .short('t')
                .long(THREADS)
                .takes_value(true)
                .validator(validate::numeric(1, usize::MAX))
                .default_value("1")
                .long_help("Maximum number of threads to spawn at once."),
            Arg::new(VERBOSITY)
                .short('v')
                .long(VERBOSITY)
                .takes_value(true)
                .validator(validate::numeric(1u8, 5u8))
                .default_value("2")
                .long_help("Logging verbosity: 1 - errors only, 2 - warnings, 3 - info, 4 - debug, 5 - trace."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub mod reads_filtering {
    use super::*;
    pub const MAPQ: &str = "mapq";
    pub const SECONDARY: &str = "secondary";

    pub const SECTION_NAME: &str = "Reads filtering";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(MAPQ)
                .long(MAPQ)
                .takes_value(true)
                .validator(validate::numeric(0u8, 255u8))
                .default_value("30")
                .long_help("Process only mapped reads with mapq ≥ threshold."),
            Arg::new(SECONDARY)
                .long(SECONDARY)
                .takes_value(true)
                .validator(validate::secondary)
                .possible_values(["keep", "skip"])
                .default_value("keep")
                .long_help("What to do with secondary alignments (0x100 flag): \"keep\" processes them as any other read, \"skip\" drops them."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub mod output {
    use super::*;
    pub const SAVETO: &str = "output";
    pub const EVENTS: &str = "events";
    pub const PRINT_RAW: &str = "print-raw";

    pub const SECTION_NAME: &str = "Output";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(SAVETO)
                .short('o')
                .long(SAVETO)
                .takes_value(true)
                .validator(validate::writable)
                .default_value("/dev/stdout")
                .long_help("Path to the per-read summary tsv file. By default, the results are printed to stdout."),
            Arg::new(EVENTS)
                .long(EVENTS)
                .takes_value(true)
                .validator(validate::writable)
                .long_help("Path to the tsv file for the detected events of every processed read. Events are not saved when omitted."),
            Arg::new(PRINT_RAW)
                .long(PRINT_RAW)
                .takes_value(false)
                .long_help("Print raw (not calibrated) signal of each loaded read to stdout: a \"@read<TAB>path<TAB>samples\" line followed by the tab-separated samples."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub fn all<'a>() -> Vec<Arg<'a>> {
    core::args().into_iter().chain(reads_filtering::args().into_iter()).chain(output::args().into_iter()).collect()
}

pub struct Args {
    pub threads: usize,
    pub bam: PathBuf,
    pub reference: PathBuf,
    pub reads: PathBuf,
    pub model: Option<PathBuf>,
    pub config: PipelineConfig,
    pub saveto: BufWriter<File>,
    pub events: Option<BufWriter<File>>,
}

impl Args {
    pub fn new(args: &ArgMatches, factory: impl Fn() -> ProgressBar) -> Result<Self> {
        Ok(Self {
            threads: parse::threads(factory(), args),
            bam: parse::bam(factory(), args),
            reference: parse::reference(factory(), args),
            reads: parse::reads(factory(), args),
            model: parse::model(factory(), args),
            config: parse::config(factory(), args),
            saveto: parse::saveto(factory(), args)?,
            events: parse::events(factory(), args)?,
        })
    }
}
