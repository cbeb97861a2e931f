use crate::clock::DeviceClock;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: i64,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSample {
    pub time: i64,
    pub power: f64,
    pub mean_power: f64,
}

/// Rolling temperature and power history.
///
/// Both sequences share one clock and one retention policy: anything older than
/// twice the retention period behind the newest sample is dropped from the
/// front, in lockstep. `eviction_offset` counts evicted pairs so that the
/// projector can keep its down-sampling phase stable while the front moves.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    power: VecDeque<PowerSample>,
    eviction_offset: u64,
    retention_ms: i64,
}

impl SampleBuffer {
    pub fn new(retention_ms: i64) -> Self {
        Self {
            samples: VecDeque::new(),
            power: VecDeque::new(),
            eviction_offset: 0,
            retention_ms,
        }
    }

    pub fn retention_ms(&self) -> i64 {
        self.retention_ms
    }

    pub fn eviction_offset(&self) -> u64 {
        self.eviction_offset
    }

    pub fn samples(&self) -> &VecDeque<Sample> {
        &self.samples
    }

    pub fn power(&self) -> &VecDeque<PowerSample> {
        &self.power
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn oldest(&self) -> Option<i64> {
        self.samples.front().map(|s| s.time)
    }

    pub fn newest(&self) -> Option<i64> {
        self.samples.back().map(|s| s.time)
    }

    /// `(oldest, newest)` when the buffer holds anything.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        Some((self.oldest()?, self.newest()?))
    }

    /// Appends one live pair. Returns `false` without touching the buffer while
    /// the device clock is unknown.
    pub fn append(&mut self, clock: &DeviceClock, sample: Sample, power: PowerSample) -> bool {
        if !clock.is_known() {
            return false;
        }
        match self.samples.back() {
            Some(last) if last.time > sample.time => {
                let at = self.samples.partition_point(|s| s.time <= sample.time);
                self.samples.insert(at, sample);
                let at = self.power.partition_point(|p| p.time <= power.time);
                self.power.insert(at, power);
            }
            _ => {
                self.samples.push_back(sample);
                self.power.push_back(power);
            }
        }
        self.evict();
        true
    }

    fn evict(&mut self) {
        let Some(newest) = self.newest() else {
            return;
        };
        let threshold = newest - 2 * self.retention_ms;
        while self.samples.front().is_some_and(|s| s.time < threshold) {
            self.samples.pop_front();
            self.power.pop_front();
            self.eviction_offset += 1;
        }
    }

    /// Keeps everything strictly before `cutoff`, then merges the decoded tail.
    pub fn replace_range(&mut self, cutoff: i64, samples: Vec<Sample>, power: Vec<PowerSample>) {
        self.samples.retain(|s| s.time < cutoff);
        self.power.retain(|p| p.time < cutoff);
        self.samples.extend(samples);
        self.power.extend(power);
        self.sort_by_time();
    }

    /// Stable sort of both sequences.
    pub fn sort_by_time(&mut self) {
        self.samples.make_contiguous().sort_by_key(|s| s.time);
        self.power.make_contiguous().sort_by_key(|p| p.time);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.power.clear();
        self.eviction_offset = 0;
    }
}
