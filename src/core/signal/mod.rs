use derive_getters::Getters;

pub use archive::{SignalArchive, Slow5Archive};
#[cfg(test)]
pub use archive::MockSignalArchive;

mod archive;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Units {
    Raw,
    Picoampere,
}

/// Per-read calibration constants.
#[derive(Getters, Copy, Clone, PartialEq, Debug)]
pub struct Calibration {
    range: f32,
    digitisation: f32,
    offset: f32,
    sampling_rate: f32,
}

impl Calibration {
    pub fn new(range: f32, digitisation: f32, offset: f32, sampling_rate: f32) -> Self {
        Self { range, digitisation, offset, sampling_rate }
    }

    #[inline]
    pub fn unit(&self) -> f32 {
        self.range / self.digitisation
    }
}

/// Raw instrument trace of one read.
#[derive(Clone, PartialEq, Debug)]
pub struct SignalRecord {
    samples: Vec<f32>,
    calibration: Calibration,
    units: Units,
}

impl SignalRecord {
    pub fn new(samples: Vec<f32>, calibration: Calibration) -> Self {
        Self { samples, calibration, units: Units::Raw }
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn nsample(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    #[inline]
    pub fn units(&self) -> Units {
        self.units
    }

    /// Converts raw samples to picoamperes in place: (raw + offset) * (range / digitisation).
    /// Already converted signals are left untouched.
    pub fn normalize(&mut self) {
        if self.units == Units::Picoampere {
            return;
        }
        let (offset, unit) = (self.calibration.offset, self.calibration.unit());
        for sample in self.samples.iter_mut() {
            *sample = (*sample + offset) * unit;
        }
        self.units = Units::Picoampere;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        let mut signal = SignalRecord::new(vec![10.0, 20.0], Calibration::new(2.0, 1.0, 5.0, 4000.0));
        assert_eq!(signal.units(), Units::Raw);

        signal.normalize();
        assert_eq!(signal.samples(), &[30.0, 50.0]);
        assert_eq!(signal.units(), Units::Picoampere);

        // Idempotent
        signal.normalize();
        assert_eq!(signal.samples(), &[30.0, 50.0]);
    }

    #[test]
    fn normalize_per_sample() {
        let calibration = Calibration::new(1437.0, 8192.0, 4.0, 4000.0);
        let raw: Vec<f32> = vec![512.0, -3.0, 0.0, 1023.0, 487.0];
        let mut signal = SignalRecord::new(raw.clone(), calibration);
        signal.normalize();

        let unit = 1437.0f32 / 8192.0f32;
        let expected: Vec<f32> = raw.iter().map(|x| (x + 4.0) * unit).collect();
        assert_eq!(signal.samples(), expected.as_slice());
        assert_eq!(signal.nsample(), 5);
    }

    #[test]
    fn normalize_empty() {
        let mut signal = SignalRecord::new(vec![], Calibration::new(2.0, 1.0, 5.0, 4000.0));
        signal.normalize();
        assert!(signal.samples().is_empty());
        assert_eq!(signal.units(), Units::Picoampere);
    }
}
