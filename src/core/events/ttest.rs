use derive_getters::Getters;
use derive_more::Constructor;

use super::{Event, EventTable, Segmenter};

#[derive(Constructor, Getters, Copy, Clone, PartialEq, Debug)]
pub struct TTestParams {
    short_window: usize,
    short_threshold: f32,
    long_window: usize,
    long_threshold: f32,
    peak_height: f32,
}

impl Default for TTestParams {
    fn default() -> Self {
        // R9.4 defaults
        Self { short_window: 3, short_threshold: 1.4, long_window: 6, long_threshold: 9.0, peak_height: 0.2 }
    }
}

/// Event boundaries are peaks of two-sample t-statistics computed over a short and a long window.
#[derive(Constructor, Copy, Clone, Default, Debug)]
pub struct TTestSegmenter {
    params: TTestParams,
}

// Prefix sums of values and squared values, n + 1 long
fn prefix_sums(signal: &[f32]) -> (Vec<f64>, Vec<f64>) {
    let (mut sum, mut sumsq) = (Vec::with_capacity(signal.len() + 1), Vec::with_capacity(signal.len() + 1));
    let (mut s, mut sq) = (0f64, 0f64);
    sum.push(s);
    sumsq.push(sq);
    for x in signal {
        let x = *x as f64;
        s += x;
        sq += x * x;
        sum.push(s);
        sumsq.push(sq);
    }
    (sum, sumsq)
}

fn tstat(sum: &[f64], sumsq: &[f64], window: usize) -> Vec<f32> {
    let n = sum.len() - 1;
    let mut tstat = vec![0f32; n];
    if n < 2 * window || window < 2 {
        return tstat;
    }

    let w = window as f64;
    for i in window..=(n - window) {
        let (sum1, sumsq1) = (sum[i] - sum[i - window], sumsq[i] - sumsq[i - window]);
        let (sum2, sumsq2) = (sum[i + window] - sum[i], sumsq[i + window] - sumsq[i]);
        let (mean1, mean2) = (sum1 / w, sum2 / w);

        let variance = (sumsq1 / w - mean1 * mean1 + sumsq2 / w - mean2 * mean2).max(f32::MIN_POSITIVE as f64);
        tstat[i] = ((mean2 - mean1).abs() / (variance / w).sqrt()) as f32;
    }
    // Only full windows are meaningful
    for x in tstat.iter_mut().skip(n - window) {
        *x = 0.0;
    }
    tstat
}

struct Detector<'a> {
    signal: &'a [f32],
    window: usize,
    threshold: f32,
    masked_to: usize,
    peak_pos: Option<usize>,
    peak_value: f32,
    valid_peak: bool,
}

impl<'a> Detector<'a> {
    fn new(signal: &'a [f32], window: usize, threshold: f32) -> Self {
        Self { signal, window, threshold, masked_to: 0, peak_pos: None, peak_value: f32::MAX, valid_peak: false }
    }

    fn reset(&mut self, value: f32) {
        self.peak_pos = None;
        self.peak_value = value;
        self.valid_peak = false;
    }

    // Returns a boundary position once a peak is confirmed
    fn step(&mut self, i: usize, peak_height: f32) -> Option<usize> {
        let current = self.signal[i];
        match self.peak_pos {
            None => {
                if current < self.peak_value {
                    self.peak_value = current;
                } else if current - self.peak_value > peak_height {
                    self.peak_value = current;
                    self.peak_pos = Some(i);
                }
                None
            }
            Some(pos) => {
                let pos = if current > self.peak_value {
                    self.peak_value = current;
                    self.peak_pos = Some(i);
                    i
                } else {
                    pos
                };

                if self.peak_value - current > peak_height && self.peak_value > self.threshold {
                    self.valid_peak = true;
                }
                if self.valid_peak && i - pos > self.window / 2 {
                    self.reset(current);
                    return Some(pos);
                }
                None
            }
        }
    }

    fn dominant(&self) -> Option<usize> {
        match self.peak_pos {
            Some(pos) if self.peak_value > self.threshold => Some(pos),
            _ => None,
        }
    }
}

impl TTestSegmenter {
    fn boundaries(&self, sum: &[f64], sumsq: &[f64]) -> Vec<usize> {
        let p = &self.params;
        let (tshort, tlong) = (tstat(sum, sumsq, p.short_window), tstat(sum, sumsq, p.long_window));
        let mut short = Detector::new(&tshort, p.short_window, p.short_threshold);
        let mut long = Detector::new(&tlong, p.long_window, p.long_threshold);

        let mut peaks = Vec::new();
        for i in 0..tshort.len() {
            if short.masked_to < i {
                let peak = short.step(i, p.peak_height);
                // A firing short detector masks the long one
                if let Some(pos) = short.dominant() {
                    long.masked_to = pos + short.window;
                    long.reset(f32::MAX);
                }
                peaks.extend(peak);
            }
            if long.masked_to < i {
                peaks.extend(long.step(i, p.peak_height));
            }
        }
        peaks
    }
}

impl Segmenter for TTestSegmenter {
    fn segment(&self, signal: &[f32]) -> EventTable {
        let n = signal.len();
        if n == 0 {
            return EventTable::default();
        }
        let (sum, sumsq) = prefix_sums(signal);

        let mut starts = vec![0];
        starts.extend(self.boundaries(&sum, &sumsq).into_iter().filter(|x| *x > 0 && *x < n));
        // Both detectors may report boundaries out of order
        starts.sort_unstable();
        starts.dedup();

        let mut events = Vec::with_capacity(starts.len());
        for (ind, start) in starts.iter().enumerate() {
            let end = starts.get(ind + 1).copied().unwrap_or(n);
            let length = end - start;
            let mean = (sum[end] - sum[*start]) / length as f64;
            let variance = (sumsq[end] - sumsq[*start]) / length as f64 - mean * mean;
            events.push(Event { start: *start, length, mean: mean as f32, stdv: variance.max(0.0).sqrt() as f32 });
        }
        events.into()
    }
}
