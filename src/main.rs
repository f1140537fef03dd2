use clap::{crate_authors, crate_name, crate_version, AppSettings, Command};
use indicatif::ProgressBar;
use log::LevelFilter;
use rayon::ThreadPoolBuilder;

use sigprep::cli;
use sigprep::cli::args::Args;

fn verbosity(level: u8) -> LevelFilter {
    match level {
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let matches = Command::new(crate_name!())
        .author(crate_authors!("\n"))
        .version(crate_version!())
        .about("Correlates aligned nanopore reads with their reference subsequence and raw signal, then calibrates the signal and detects events.")
        .max_term_width(120)
        .setting(AppSettings::DeriveDisplayOrder)
        .args(cli::args::all())
        .get_matches();

    env_logger::Builder::from_default_env()
        .filter_level(verbosity(cli::parse::verbosity(&matches)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let factory = || ProgressBar::new_spinner().with_style(cli::style::setup());

    let args = match Args::new(&matches, factory) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = ThreadPoolBuilder::new().num_threads(args.threads).build_global() {
        log::error!("Failed to initialize thread pool: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = cli::run(args, factory()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
