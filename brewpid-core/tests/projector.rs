use brewpid_core::projector::{minute_ticks, stride, y_bounds, Projection, DEFAULT_Y_RANGE};
use brewpid_core::{project, AppState, DeviceClock, PowerSample, Route, Sample, SampleBuffer};
use dashboard_config::DisplayConfig;

fn buffer(retention_ms: i64, points: &[(i64, f64, f64, f64)]) -> SampleBuffer {
    let mut clock = DeviceClock::new();
    clock.observe_uptime(0, 0);
    let mut buffer = SampleBuffer::new(retention_ms);
    for &(time, temperature, power, mean_power) in points {
        buffer.append(
            &clock,
            Sample { time, temperature },
            PowerSample {
                time,
                power,
                mean_power,
            },
        );
    }
    buffer
}

fn all_series() -> DisplayConfig {
    DisplayConfig {
        show_temperature: true,
        show_power: true,
        show_mean_power: true,
        window_minutes: 20.0,
    }
}

#[test]
fn stride_is_at_least_one() {
    assert_eq!(stride(1_200_000.0, 600), 2);
    assert_eq!(stride(60_000.0, 600), 1);
    assert_eq!(stride(10_800_000.0, 600), 18);
    assert_eq!(stride(1_200_000.0, 0), 1);
}

#[test]
fn y_bounds_round_outward_to_tens() {
    assert_eq!(y_bounds(61.2, 64.9), (60.0, 70.0));
    assert_eq!(y_bounds(60.0, 70.0), (50.0, 80.0));
    assert_eq!(y_bounds(-3.5, 2.0), (-10.0, 10.0));
}

#[test]
fn ticks_fall_on_whole_minutes() {
    assert_eq!(
        minute_ticks(30_000.0, 150_000.0),
        vec![30_000.0, 60_000.0, 120_000.0, 150_000.0]
    );
    assert_eq!(minute_ticks(60_000.0, 120_000.0), vec![60_000.0, 120_000.0]);
}

#[test]
fn stride_phase_follows_eviction_offset() {
    let buffer = buffer(
        1_000,
        &[
            (0, 60.0, 0.0, 0.0),
            (1_000, 61.0, 0.0, 0.0),
            (2_000, 62.0, 0.0, 0.0),
            (3_000, 63.0, 0.0, 0.0),
        ],
    );
    assert_eq!(buffer.eviction_offset(), 1);

    let config = all_series();
    let frame = project(&Projection {
        buffer: &buffer,
        low: 0.0,
        high: 4_000.0,
        config: &config,
        plot_width_px: 2,
        target: None,
    });
    assert_eq!(frame.stride, 2);
    let times: Vec<f64> = frame.temperature.iter().map(|p| p.x).collect();
    assert_eq!(times, vec![2_000.0]);
}

#[test]
fn power_is_scaled_into_temperature_range() {
    let buffer = buffer(
        3_600_000,
        &[
            (0, 61.2, 0.0, 51.0),
            (10_000, 64.9, 255.0, 51.0),
            (20_000, 63.0, 51.0, 51.0),
            (30_000, 62.0, 0.0, 102.0),
            (40_000, 62.0, 0.0, 255.0),
        ],
    );
    let config = all_series();
    let frame = project(&Projection {
        buffer: &buffer,
        low: 0.0,
        high: 40_000.0,
        config: &config,
        plot_width_px: 600,
        target: Some(93.0),
    });

    assert_eq!(frame.y_range, (60.0, 70.0));
    assert_eq!(frame.temperature.len(), 5);
    assert_eq!(frame.power[0].y, 60.0);
    assert_eq!(frame.power[1].y, 70.0);
    assert_eq!(frame.power[2].y, 62.0);

    let mean: Vec<(f64, f64)> = frame.mean_power.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(mean, vec![(0.0, 64.0), (10_000.0, 70.0)]);
    assert_eq!(frame.target, Some(93.0));
    assert_eq!(frame.x_range, (0.0, 40_000.0));
}

#[test]
fn hidden_series_are_empty() {
    let buffer = buffer(3_600_000, &[(0, 61.0, 10.0, 10.0), (1_000, 62.0, 10.0, 10.0)]);
    let config = DisplayConfig {
        show_temperature: false,
        show_power: true,
        show_mean_power: false,
        window_minutes: 20.0,
    };
    let frame = project(&Projection {
        buffer: &buffer,
        low: 0.0,
        high: 1_000.0,
        config: &config,
        plot_width_px: 600,
        target: None,
    });
    assert!(frame.temperature.is_empty());
    assert!(frame.mean_power.is_empty());
    assert_eq!(frame.y_range, DEFAULT_Y_RANGE);
    assert_eq!(frame.power.len(), 2);
}

#[test]
fn samples_outside_window_are_skipped() {
    let buffer = buffer(
        3_600_000,
        &[(0, 60.0, 0.0, 0.0), (5_000, 61.0, 0.0, 0.0), (9_000, 62.0, 0.0, 0.0)],
    );
    let config = all_series();
    let frame = project(&Projection {
        buffer: &buffer,
        low: 1_000.0,
        high: 8_000.0,
        config: &config,
        plot_width_px: 600,
        target: None,
    });
    assert_eq!(frame.temperature.len(), 1);
    assert_eq!(frame.temperature[0].x, 5_000.0);
}

#[test]
fn projection_is_repeatable() {
    let points: Vec<(i64, f64, f64, f64)> = (0..500)
        .map(|i| (i * 1_000, 60.0 + (i % 17) as f64 * 0.3, (i % 255) as f64, 40.0))
        .collect();
    let buffer = buffer(100_000, &points);
    let config = all_series();
    let input = Projection {
        buffer: &buffer,
        low: 300_000.0,
        high: 499_000.0,
        config: &config,
        plot_width_px: 50,
        target: None,
    };
    assert_eq!(project(&input), project(&input));
}

#[test]
fn app_state_frame_follows_live_window() {
    let mut state = AppState::new(3_600_000, DisplayConfig::default(), 600);
    assert!(state.chart_frame().is_none());

    state.clock.observe_uptime(0, 0);
    for time in [0, 1_000, 2_000] {
        state.buffer.append(
            &state.clock,
            Sample {
                time,
                temperature: 60.0,
            },
            PowerSample {
                time,
                power: 0.0,
                mean_power: 0.0,
            },
        );
    }
    state.navigate(Route::Chart, 0);
    let frame = state.chart_frame().expect("frame");
    assert_eq!(frame.x_range, (0.0, 1_200_000.0));
    assert_eq!(frame.stride, 2);
    assert_eq!(frame.temperature.len(), 2);
}
