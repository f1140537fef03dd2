use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use sigprep::cli::resformat;
use sigprep::core::batch::Batch;
use sigprep::core::config::PipelineConfig;
use sigprep::core::error::{Error, Result};
use sigprep::core::events::TTestSegmenter;
use sigprep::core::filtering::SecondaryMode;
use sigprep::core::io::fasta::FaidxReference;
use sigprep::core::io::hts::ReadSource;
use sigprep::core::model::ModelTable;
use sigprep::core::pipeline::{dump_raw, process, LoadStats, PipelineContext};
use sigprep::core::read::{AlignedRead, Recycle};
use sigprep::core::signal::{Slow5Archive, Units};

const SLOW5_HEADER: &str = "\
#slow5_version\t0.2.0\n\
#num_read_groups\t1\n\
#char*\tuint32_t\tdouble\tdouble\tdouble\tdouble\tuint64_t\tint16_t*\n\
#read_id\tread_group\tdigitisation\toffset\trange\tsampling_rate\tlen_raw_signal\traw_signal\n";

#[derive(Clone, Debug, Default)]
struct Alignment {
    name: Vec<u8>,
    mapq: u8,
    start: i64,
    end: i64,
}

impl Alignment {
    fn new(name: &str, mapq: u8, start: i64, end: i64) -> Self {
        Self { name: name.as_bytes().to_vec(), mapq, start, end }
    }
}

impl AlignedRead for Alignment {
    fn name(&self) -> &[u8] {
        &self.name
    }
    fn flags(&self) -> u16 {
        0
    }
    fn mapq(&self) -> u8 {
        self.mapq
    }
    fn tid(&self) -> i32 {
        0
    }
    fn pos(&self) -> i64 {
        self.start
    }
    fn endpos(&self) -> i64 {
        self.end
    }
}

impl Recycle for Alignment {
    fn blank() -> Self {
        Self::default()
    }
    fn recycle(&mut self) {
        self.name.clear();
    }
}

struct Alignments {
    reads: std::vec::IntoIter<Alignment>,
}

impl ReadSource for Alignments {
    type Record = Alignment;

    fn read(&mut self, record: &mut Alignment) -> Option<Result<()>> {
        let next = self.reads.next()?;
        *record = next;
        Some(Ok(()))
    }

    fn contig(&self, tid: i32) -> Result<&str> {
        match tid {
            0 => Ok("chr1"),
            _ => Err(Error::UnknownContig(tid)),
        }
    }
}

fn steps() -> Vec<i32> {
    let mut signal = Vec::new();
    for level in [80, 110, 60] {
        for i in 0..30 {
            signal.push(if i % 2 == 0 { level + 1 } else { level - 1 });
        }
    }
    signal
}

struct Fixture {
    _dir: TempDir,
    reference: PathBuf,
    reads: PathBuf,
    slow5: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let reference = dir.path().join("reference.fa");
        write!(File::create(&reference).unwrap(), ">chr1\nACGTACGTAA\nCCGGTTAACC\n").unwrap();

        let slow5 = dir.path().join("signals").join("batch0.slow5");
        std::fs::create_dir(slow5.parent().unwrap()).unwrap();
        let samples = steps().iter().map(|x| x.to_string()).collect::<Vec<_>>().join(",");
        write!(
            File::create(&slow5).unwrap(),
            "{}r1\t0\t1\t0\t1\t4000\t90\t{}\nr3\t0\t1\t0\t1\t4000\t2\t1,2\n",
            SLOW5_HEADER,
            samples
        )
        .unwrap();

        // Relative paths are resolved against the manifest directory
        let reads = dir.path().join("reads.fastq");
        write!(
            File::create(sigprep::core::io::readdb::ReadDb::manifest(&reads)).unwrap(),
            "r1\tsignals/batch0.slow5\nr2\tsignals/batch0.slow5\nr3\tsignals/batch0.slow5\n"
        )
        .unwrap();

        Self { _dir: dir, reference, reads, slow5 }
    }

    fn context(
        &self,
        reads: Vec<Alignment>,
        config: PipelineConfig,
    ) -> PipelineContext<Alignments, FaidxReference, Slow5Archive> {
        PipelineContext::new(
            Alignments { reads: reads.into_iter() },
            FaidxReference::open(&self.reference).unwrap(),
            Slow5Archive::open(&self.reads).unwrap(),
            ModelTable::new(),
            config,
        )
    }
}

fn reads() -> Vec<Alignment> {
    vec![
        Alignment::new("r1", 60, 0, 10),
        Alignment::new("r2", 10, 0, 10),
        // Past the contig end
        Alignment::new("r3", 60, 5, 100),
        Alignment::new("r4", 60, 2, 8),
    ]
}

#[test]
fn run_to_exhaustion() {
    let fixture = Fixture::new();
    let mut ctx = fixture.context(reads(), PipelineConfig::new(false, 30, SecondaryMode::Keep, 2));
    let mut batch = Batch::new(*ctx.config().batch_capacity());
    let segmenter = TTestSegmenter::default();
    let mut saveto = resformat::writer(Vec::new());

    let mut loaded = Vec::new();
    loop {
        let n = ctx.load(&mut batch).unwrap();
        if n == 0 {
            break;
        }
        loaded.push(n);
        process(&mut batch, &segmenter);
        resformat::batch(&batch, ctx.source(), &mut saveto, Option::<&mut csv::Writer<Vec<u8>>>::None).unwrap();
        batch.clear_cycle();
    }
    assert_eq!(loaded, vec![2, 1]);
    assert!(batch.is_empty());
    // r1 and r3 share a single signal file
    assert_eq!(ctx.archive().indexed(), 1);
    // Exhausted input stays exhausted
    assert_eq!(ctx.load(&mut batch).unwrap(), 0);

    let expected = LoadStats { pulled: 4, rejected: 1, accepted: 3, without_reference: 1, without_signal: 1 };
    assert_eq!(ctx.stats(), &expected);

    let summary = String::from_utf8(saveto.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "read\tcontig\tstart\tend\treference_len\tsamples\tevents");
    assert!(lines[1].starts_with("r1\tchr1\t0\t10\t10\t90\t"));
}

#[test]
fn correlation() {
    let fixture = Fixture::new();
    let mut ctx = fixture.context(reads(), PipelineConfig::default());
    let mut batch = Batch::new(8);
    assert_eq!(ctx.load(&mut batch).unwrap(), 3);

    let slots = batch.occupied();
    assert_eq!(slots[0].read.name(), b"r1");
    assert_eq!(slots[0].reference.as_deref(), Some(&b"ACGTACGTAA"[..]));
    assert_eq!(slots[0].path.as_deref(), Some(fixture.slow5.as_path()));
    assert_eq!(slots[0].signal.as_ref().unwrap().nsample(), 90);
    assert!(slots[0].is_correlated());

    // Reference is unavailable, the signal is still attached
    assert_eq!(slots[1].read.name(), b"r3");
    assert!(slots[1].reference.is_none());
    assert!(slots[1].signal.is_some());

    // Not listed in the manifest
    assert_eq!(slots[2].read.name(), b"r4");
    assert_eq!(slots[2].reference.as_deref(), Some(&b"GTACGT"[..]));
    assert!(slots[2].path.is_none() && slots[2].signal.is_none());

    assert_eq!(process(&mut batch, &TTestSegmenter::default()), 1);
    let slots = batch.occupied();
    assert_eq!(slots[0].signal.as_ref().unwrap().units(), Units::Picoampere);
    assert_eq!(slots[1].signal.as_ref().unwrap().units(), Units::Raw);

    let events = slots[0].events.as_ref().unwrap();
    assert!(events.len() >= 3);
    assert_eq!(events.events().iter().map(|x| x.length).sum::<usize>(), 90);
    assert!(slots[1].events.is_none() && slots[2].events.is_none());
}

#[test]
fn raw_dump() {
    let fixture = Fixture::new();
    let mut ctx = fixture.context(reads(), PipelineConfig::new(true, 30, SecondaryMode::Keep, 8));
    let mut batch = Batch::new(8);
    ctx.load(&mut batch).unwrap();

    let mut saveto = Vec::new();
    dump_raw(&batch, &mut saveto).unwrap();
    let dump = String::from_utf8(saveto).unwrap();
    let lines: Vec<&str> = dump.lines().collect();

    // r4 has no signal and is not dumped
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], format!("@r1\t{}\t90", fixture.slow5.display()));
    assert_eq!(lines[1].split('\t').map(|x| x.parse::<i32>().unwrap()).collect::<Vec<_>>(), steps());
    assert_eq!(lines[2], format!("@r3\t{}\t2", fixture.slow5.display()));
    assert_eq!(lines[3], "1\t2");
}

#[test]
fn missing_manifest() {
    let dir = TempDir::new().unwrap();
    let result = Slow5Archive::open(&dir.path().join("reads.fastq"));
    assert!(matches!(result, Err(Error::Io { .. })));
}
