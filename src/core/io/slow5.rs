use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::error::{Error, Result};
use crate::core::io::utils;
use crate::core::signal::{Calibration, SignalRecord};

const READ_ID: &str = "read_id";
const DIGITISATION: &str = "digitisation";
const OFFSET: &str = "offset";
const RANGE: &str = "range";
const SAMPLING_RATE: &str = "sampling_rate";
const LEN_RAW_SIGNAL: &str = "len_raw_signal";
const RAW_SIGNAL: &str = "raw_signal";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Columns {
    read_id: usize,
    digitisation: usize,
    offset: usize,
    range: usize,
    sampling_rate: usize,
    len_raw_signal: usize,
    raw_signal: usize,
}

impl Default for Columns {
    fn default() -> Self {
        // read_id read_group digitisation offset range sampling_rate len_raw_signal raw_signal
        Self { read_id: 0, digitisation: 2, offset: 3, range: 4, sampling_rate: 5, len_raw_signal: 6, raw_signal: 7 }
    }
}

impl Columns {
    fn from_header(header: &str) -> std::result::Result<Self, String> {
        let names: Vec<&str> = header.trim_start_matches('#').split('\t').collect();
        let find = |column: &str| {
            names.iter().position(|x| *x == column).ok_or_else(|| format!("column {} is missing", column))
        };
        Ok(Self {
            read_id: find(READ_ID)?,
            digitisation: find(DIGITISATION)?,
            offset: find(OFFSET)?,
            range: find(RANGE)?,
            sampling_rate: find(SAMPLING_RATE)?,
            len_raw_signal: find(LEN_RAW_SIGNAL)?,
            raw_signal: find(RAW_SIGNAL)?,
        })
    }
}

fn field<T: FromStr>(split: &[&str], ind: usize, name: &str) -> std::result::Result<T, String> {
    let raw = split.get(ind).ok_or_else(|| format!("column {} is missing", name))?;
    raw.parse().map_err(|_| format!("failed to parse {} value \"{}\"", name, raw))
}

fn parse(columns: &Columns, record: &str) -> std::result::Result<SignalRecord, String> {
    let split: Vec<&str> = record.split('\t').collect();
    let calibration = Calibration::new(
        field(&split, columns.range, RANGE)?,
        field(&split, columns.digitisation, DIGITISATION)?,
        field(&split, columns.offset, OFFSET)?,
        field(&split, columns.sampling_rate, SAMPLING_RATE)?,
    );
    let nsample: usize = field(&split, columns.len_raw_signal, LEN_RAW_SIGNAL)?;

    let raw = split.get(columns.raw_signal).ok_or_else(|| format!("column {} is missing", RAW_SIGNAL))?;
    let mut samples = Vec::with_capacity(nsample);
    if nsample > 0 {
        for x in raw.split(',') {
            let x: i16 = x.parse().map_err(|_| format!("failed to parse raw sample \"{}\"", x))?;
            samples.push(x as f32);
        }
    }
    if samples.len() != nsample {
        return Err(format!("expected {} raw samples, found {}", nsample, samples.len()));
    }
    Ok(SignalRecord::new(samples, calibration))
}

#[derive(Copy, Clone, Debug)]
struct Location {
    offset: u64,
    line: usize,
    columns: Columns,
}

/// Record locations of a SLOW5 (ASCII) signal file, collected in a single pass.
///
/// Records are parsed only when fetched, so a malformed record is reported
/// for the read that owns it and nowhere else.
pub struct Slow5Index {
    path: PathBuf,
    records: HashMap<String, Location>,
}

impl Slow5Index {
    pub fn build(path: &Path) -> Result<Self> {
        Self::scan(utils::open(path)?, path.to_owned())
    }

    fn scan(mut reader: impl BufRead, path: PathBuf) -> Result<Self> {
        let mut records = HashMap::new();
        let mut columns = Columns::default();
        let (mut offset, mut line) = (0u64, 0usize);

        let mut buf = String::new();
        loop {
            buf.clear();
            let consumed = reader.read_line(&mut buf).map_err(|e| Error::io(&path, e))?;
            if consumed == 0 {
                break;
            }
            line += 1;
            let location = Location { offset, line, columns };
            offset += consumed as u64;

            let record = buf.trim_end();
            if record.is_empty() || record.starts_with('@') {
                continue;
            }
            if record.starts_with('#') {
                if record[1..].starts_with(READ_ID) {
                    columns = Columns::from_header(record).map_err(|e| Error::malformed(&path, line, e))?;
                }
                continue;
            }

            // The first record of a duplicated read wins
            if let Some(read) = record.split('\t').nth(columns.read_id) {
                records.entry(read.to_owned()).or_insert(location);
            }
        }
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, read: &str) -> bool {
        self.records.contains_key(read)
    }

    /// Seeks to the record of `read` and parses it.
    pub fn fetch(&self, read: &str) -> Result<SignalRecord> {
        let location = self.records.get(read).ok_or_else(|| Error::SignalUnreadable {
            path: self.path.clone(),
            reason: format!("read {} is absent", read),
        })?;

        let mut buf = String::new();
        utils::open_at(&self.path, location.offset)?
            .read_line(&mut buf)
            .map_err(|e| Error::io(&self.path, e))?;
        parse(&location.columns, buf.trim_end()).map_err(|e| Error::malformed(&self.path, location.line, e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "\
    #slow5_version\t0.2.0\n\
    #num_read_groups\t1\n\
    @asic_id\t0004A30B\n\
    #char*\tuint32_t\tdouble\tdouble\tdouble\tdouble\tuint64_t\tint16_t*\n\
    #read_id\tread_group\tdigitisation\toffset\trange\tsampling_rate\tlen_raw_signal\traw_signal\n";

    fn slow5(dir: &TempDir, content: &str) -> Slow5Index {
        let path = dir.path().join("reads.slow5");
        write!(std::fs::File::create(&path).unwrap(), "{}", content).unwrap();
        Slow5Index::build(&path).unwrap()
    }

    #[test]
    fn fetch() {
        let dir = TempDir::new().unwrap();
        let content = format!(
            "{}r1\t0\t8192\t6\t1467.61\t4000\t3\t430,472,463\nr2\t0\t2048\t-3\t748.5\t4000\t2\t10,-20\n",
            HEADER
        );
        let index = slow5(&dir, &content);
        assert_eq!(index.len(), 2);

        let signal = index.fetch("r2").unwrap();
        assert_eq!(signal.samples(), &[10.0, -20.0]);
        assert_eq!(signal.calibration(), &Calibration::new(748.5, 2048.0, -3.0, 4000.0));

        // Backwards
        let signal = index.fetch("r1").unwrap();
        assert_eq!(signal.nsample(), 3);
        assert_eq!(*signal.calibration().digitisation(), 8192.0);
    }

    #[test]
    fn middle_of_shared_file() {
        let dir = TempDir::new().unwrap();
        let mut content = HEADER.to_owned();
        for i in 0..50 {
            content.push_str(&format!("r{}\t0\t1\t0\t1\t4000\t2\t{},{}\n", i, i, -i));
        }
        // Broken records elsewhere in the file don't affect other reads
        content.push_str("r50\t0\t1\n");
        let index = slow5(&dir, &content);
        assert_eq!(index.len(), 51);

        assert_eq!(index.fetch("r25").unwrap().samples(), &[25.0, -25.0]);
        assert_eq!(index.fetch("r49").unwrap().samples(), &[49.0, -49.0]);
        assert_eq!(index.fetch("r0").unwrap().samples(), &[0.0, 0.0]);
        assert!(matches!(index.fetch("r50"), Err(Error::Malformed { line: 56, .. })));
    }

    #[test]
    fn reordered_columns() {
        let dir = TempDir::new().unwrap();
        let content = "\
        #read_id\trange\tdigitisation\toffset\tsampling_rate\tlen_raw_signal\traw_signal\tread_group\n\
        r1\t2\t1\t5\t4000\t2\t10,20\t0\n";
        let signal = slow5(&dir, content).fetch("r1").unwrap();
        assert_eq!(signal.samples(), &[10.0, 20.0]);
        assert_eq!(signal.calibration(), &Calibration::new(2.0, 1.0, 5.0, 4000.0));
    }

    #[test]
    fn absent() {
        let dir = TempDir::new().unwrap();
        let index = slow5(&dir, &format!("{}r1\t0\t8192\t6\t1467.61\t4000\t1\t430\n", HEADER));
        assert!(index.contains("r1") && !index.contains("r2"));
        assert!(matches!(index.fetch("r2"), Err(Error::SignalUnreadable { .. })));
    }

    #[test]
    fn malformed() {
        let dir = TempDir::new().unwrap();
        for record in [
            "r1\t0\t8192\t6\t1467.61\t4000\t3\t430,472\n",
            "r1\t0\t8192\t6\tNaN?\t4000\t1\t430\n",
            "r1\t0\t8192\t6\t1467.61\t4000\t1\tx\n",
            "r1\t0\t8192\n",
        ] {
            let index = slow5(&dir, &format!("{}{}", HEADER, record));
            assert!(matches!(index.fetch("r1"), Err(Error::Malformed { line: 6, .. })));
        }

        let header = "#read_id\tread_group\n";
        let path = dir.path().join("header.slow5");
        write!(std::fs::File::create(&path).unwrap(), "{}", header).unwrap();
        assert!(matches!(Slow5Index::build(&path), Err(Error::Malformed { line: 1, .. })));
    }

    #[test]
    fn empty_signal() {
        let dir = TempDir::new().unwrap();
        let index = slow5(&dir, &format!("{}r1\t0\t8192\t6\t1467.61\t4000\t0\t.\n", HEADER));
        assert!(index.fetch("r1").unwrap().samples().is_empty());
    }
}
