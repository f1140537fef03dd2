pub mod fasta;
pub mod hts;
pub mod readdb;
pub mod slow5;
pub mod utils;
