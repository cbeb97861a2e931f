use crate::sample_buffer::SampleBuffer;
use dashboard_config::DisplayConfig;

/// Mean power is a trailing average on the device, plotted this far back.
pub const MEAN_POWER_LAG_MS: i64 = 30_000;
/// Raw power units per full scale of the Y axis.
pub const POWER_FULL_SCALE: f64 = 255.0;
pub const DEFAULT_Y_RANGE: (f64, f64) = (0.0, 100.0);
const MINUTE_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

/// Everything the renderer needs for one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub temperature: Vec<SeriesPoint>,
    pub power: Vec<SeriesPoint>,
    pub mean_power: Vec<SeriesPoint>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub target: Option<f64>,
    pub x_ticks: Vec<f64>,
    pub stride: usize,
}

pub struct Projection<'a> {
    pub buffer: &'a SampleBuffer,
    pub low: f64,
    pub high: f64,
    pub config: &'a DisplayConfig,
    pub plot_width_px: u32,
    pub target: Option<f64>,
}

/// Samples skipped between plotted points so that roughly one point lands on
/// each pixel column.
pub fn stride(width_ms: f64, plot_width_px: u32) -> usize {
    if plot_width_px == 0 {
        return 1;
    }
    let stride = (width_ms / 1000.0 / f64::from(plot_width_px)).round();
    if stride.is_finite() && stride >= 1.0 {
        stride as usize
    } else {
        1
    }
}

/// `floor(min) - 1` and `ceil(max) + 1`, each widened to a multiple of ten.
pub fn y_bounds(min: f64, max: f64) -> (f64, f64) {
    let low = ((min.floor() - 1.0) / 10.0).floor() * 10.0;
    let high = ((max.ceil() + 1.0) / 10.0).ceil() * 10.0;
    (low, high)
}

/// `low`, every whole minute strictly inside the window, then `high`.
pub fn minute_ticks(low: f64, high: f64) -> Vec<f64> {
    let mut ticks = vec![low];
    if high <= low {
        return ticks;
    }
    let low_ms = low.floor() as i64;
    let mut tick = low_ms - low_ms.rem_euclid(MINUTE_MS) + MINUTE_MS;
    while (tick as f64) < high {
        if tick as f64 > low {
            ticks.push(tick as f64);
        }
        tick += MINUTE_MS;
    }
    ticks.push(high);
    ticks
}

pub fn project(input: &Projection<'_>) -> ChartFrame {
    let config = input.config;
    let stride = stride(input.high - input.low, input.plot_width_px);
    let phase = input.buffer.eviction_offset();
    let (low, high) = (input.low, input.high);
    let keep = |index: usize, time: i64| {
        let time = time as f64;
        time >= low && time <= high && (index as u64 + phase) % stride as u64 == 0
    };

    let mut temperature = Vec::new();
    if config.show_temperature {
        temperature.extend(
            input
                .buffer
                .samples()
                .iter()
                .enumerate()
                .filter(|(index, sample)| keep(*index, sample.time))
                .map(|(_, sample)| SeriesPoint {
                    x: sample.time as f64,
                    y: sample.temperature,
                }),
        );
    }

    let y_range = temperature
        .iter()
        .map(|point| point.y)
        .fold(None, |range: Option<(f64, f64)>, y| match range {
            None => Some((y, y)),
            Some((min, max)) => Some((min.min(y), max.max(y))),
        })
        .map(|(min, max)| y_bounds(min, max))
        .unwrap_or(DEFAULT_Y_RANGE);

    let mut power = Vec::new();
    let mut mean_power = Vec::new();
    if config.show_power || config.show_mean_power {
        let span = y_range.1 - y_range.0;
        let visible = input
            .buffer
            .power()
            .iter()
            .enumerate()
            .filter(|(index, sample)| keep(*index, sample.time))
            .map(|(_, sample)| sample);
        for sample in visible {
            if config.show_power {
                power.push(SeriesPoint {
                    x: sample.time as f64,
                    y: y_range.0 + sample.power * span / POWER_FULL_SCALE,
                });
            }
            if config.show_mean_power && sample.time as f64 >= low + MEAN_POWER_LAG_MS as f64 {
                mean_power.push(SeriesPoint {
                    x: (sample.time - MEAN_POWER_LAG_MS) as f64,
                    y: y_range.0 + sample.mean_power * span / POWER_FULL_SCALE,
                });
            }
        }
    }

    ChartFrame {
        temperature,
        power,
        mean_power,
        x_range: (low, high),
        y_range,
        target: input.target,
        x_ticks: minute_ticks(low, high),
        stride,
    }
}
