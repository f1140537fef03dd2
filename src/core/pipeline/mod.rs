use std::path::Path;

use derive_getters::Getters;

pub use loader::LoadStats;
pub use process::{dump_raw, process};

use crate::core::config::PipelineConfig;
use crate::core::error::Result;
use crate::core::io::fasta::FaidxReference;
use crate::core::io::hts::{HtsReadSource, ReadSource};
use crate::core::model::ModelTable;
use crate::core::signal::Slow5Archive;

mod loader;
mod process;

/// Open data sources and configuration shared by all cycles of a run.
#[derive(Getters)]
pub struct PipelineContext<Source, Reference, Archive> {
    // Fields are dropped in declaration order, i.e. the reverse of the acquisition order
    config: PipelineConfig,
    model: ModelTable,
    archive: Archive,
    reference: Reference,
    source: Source,
    #[getter(skip)]
    stats: LoadStats,
}

pub type HtsPipelineContext = PipelineContext<HtsReadSource, FaidxReference, Slow5Archive>;

impl HtsPipelineContext {
    pub fn open(
        bam: &Path,
        reference: &Path,
        reads: &Path,
        model: Option<&Path>,
        config: PipelineConfig,
    ) -> Result<Self> {
        let source = HtsReadSource::open(bam)?;
        log::debug!("Opened alignments {}", bam.display());

        let reference = FaidxReference::open(reference)?;
        log::debug!("Opened reference {}", reference.path().display());

        let archive = Slow5Archive::open(reads)?;
        log::debug!(
            "Loaded signal index {} with {} reads",
            archive.readdb().path().display(),
            archive.readdb().len()
        );

        let model = match model {
            Some(path) => {
                let model = ModelTable::from_tsv(path)?;
                log::debug!("Loaded k-mer model {}", path.display());
                model
            }
            None => ModelTable::new(),
        };

        Ok(Self::new(source, reference, archive, model, config))
    }
}

impl<Source: ReadSource, Reference, Archive> PipelineContext<Source, Reference, Archive> {
    pub fn new(
        source: Source,
        reference: Reference,
        archive: Archive,
        model: ModelTable,
        config: PipelineConfig,
    ) -> Self {
        Self { config, model, archive, reference, source, stats: LoadStats::default() }
    }

    /// Totals accumulated over all loaded batches.
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}
