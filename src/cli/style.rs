use indicatif::{ProgressFinish, ProgressStyle};

const TICKS: &[&str] = &["◐", "◓", "◑", "◒", "✔"];

/// Argument parsing and opening of the inputs.
pub fn setup() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed}] {wide_msg}")
        .tick_strings(TICKS)
        .on_finish(ProgressFinish::AndLeave)
}

/// Batch cycles; the position counts loaded reads.
pub fn cycles() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} [{elapsed}] {pos} reads ({per_sec}) {wide_msg}")
        .tick_strings(TICKS)
        .on_finish(ProgressFinish::AndLeave)
}

pub fn summary() -> ProgressStyle {
    ProgressStyle::default_spinner().template("[{elapsed}] {wide_msg}").on_finish(ProgressFinish::AndLeave)
}
