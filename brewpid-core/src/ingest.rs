use crate::clock::DeviceClock;
use crate::sample_buffer::{PowerSample, Sample, SampleBuffer};
use crate::wire::SendBinary;

/// Bytes per backfill record: `u16` time delta, `i8` temperature delta, power, mean power.
pub const RECORD_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotArmed,
    ClockUnknown,
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Rejected(RejectReason),
    Partial { records: usize },
    Completed { records: usize },
}

/// State of a (possibly multi-part) backfill transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BackfillTransfer {
    pub expected_count: usize,
    /// Device-relative time the next record's delta applies to.
    pub front_time: i64,
    /// Hundredths of a degree.
    pub front_temperature: f64,
    pub last_part: bool,
    pub in_progress: bool,
    /// Set once the first part has been merged.
    pub continuation: bool,
}

pub struct DecodedRecords {
    pub samples: Vec<Sample>,
    pub power: Vec<PowerSample>,
    pub end_time: i64,
    pub end_temperature: f64,
}

/// Runs the deltas of `frame` starting from `front_time` / `front_temperature`.
/// Trailing bytes that do not form a whole record are ignored.
pub fn decode_records(
    frame: &[u8],
    front_time: i64,
    front_temperature: f64,
    boot_epoch: i64,
) -> DecodedRecords {
    let count = frame.len() / RECORD_SIZE;
    let mut samples = Vec::with_capacity(count);
    let mut power = Vec::with_capacity(count);
    let mut time = front_time;
    let mut temperature = front_temperature;
    for record in frame.chunks_exact(RECORD_SIZE) {
        time += i64::from(u16::from_le_bytes([record[0], record[1]]));
        temperature += f64::from(record[2] as i8);
        let at = time + boot_epoch;
        samples.push(Sample {
            time: at,
            temperature: temperature / 100.0,
        });
        power.push(PowerSample {
            time: at,
            power: f64::from(record[3]),
            mean_power: f64::from(record[4]),
        });
    }
    DecodedRecords {
        samples,
        power,
        end_time: time,
        end_temperature: temperature,
    }
}

impl BackfillTransfer {
    /// Front values are only present on the first part; later parts continue
    /// from where the previous frame ended.
    pub fn arm(&mut self, announcement: &SendBinary) {
        self.expected_count = announcement.length;
        if let Some(front_time) = announcement.front_time {
            self.front_time = front_time;
            self.continuation = false;
        }
        if let Some(front_temperature) = announcement.front_temperature {
            self.front_temperature = front_temperature;
        }
        self.last_part = announcement.last_part;
        self.in_progress = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn decode_frame(
        &mut self,
        frame: &[u8],
        clock: &DeviceClock,
        buffer: &mut SampleBuffer,
    ) -> IngestOutcome {
        if !self.in_progress || self.expected_count == 0 {
            return IngestOutcome::Rejected(RejectReason::NotArmed);
        }
        let Some(boot_epoch) = clock.boot_epoch() else {
            return IngestOutcome::Rejected(RejectReason::ClockUnknown);
        };
        let expected = self.expected_count * RECORD_SIZE;
        if frame.len() != expected {
            return IngestOutcome::Rejected(RejectReason::LengthMismatch {
                expected,
                actual: frame.len(),
            });
        }

        let decoded = decode_records(frame, self.front_time, self.front_temperature, boot_epoch);
        let records = decoded.samples.len();
        // A continuation starts at the record that ended the previous part; keep it.
        let cutoff = self.front_time + boot_epoch + i64::from(self.continuation);
        buffer.replace_range(cutoff, decoded.samples, decoded.power);

        if self.last_part {
            self.reset();
            IngestOutcome::Completed { records }
        } else {
            self.front_time = decoded.end_time;
            self.front_temperature = decoded.end_temperature;
            self.expected_count = 0;
            self.continuation = true;
            IngestOutcome::Partial { records }
        }
    }
}
