use brewpid_core::view_window::MIN_WINDOW_MS;
use brewpid_core::{
    GestureState, LinearAxis, PlotPoint, PlotRect, PointerButton, Touch, ViewWindow,
};

const WIDTH: f64 = 1_200_000.0;
const OLDEST: i64 = -2_000_000;
const NEWEST: i64 = 1_000_000;
const BOUNDS: Option<(i64, i64)> = Some((OLDEST, NEWEST));

const RECT: PlotRect = PlotRect {
    x1: 0.0,
    x2: 2_000.0,
    y1: 400.0,
    y2: 0.0,
};

/// 600 ms per pixel across the current window.
fn axis(window: &ViewWindow) -> LinearAxis {
    LinearAxis {
        low: window.low(),
        high: window.high(),
        length_px: 2_000.0,
    }
}

fn live_window() -> ViewWindow {
    let mut window = ViewWindow::new(WIDTH);
    window.follow(OLDEST, NEWEST);
    window
}

fn at(x: f64) -> PlotPoint {
    PlotPoint::new(x, 200.0)
}

#[test]
fn live_window_tracks_newest_sample() {
    let mut window = ViewWindow::new(WIDTH);
    window.follow(0, 500_000);
    assert_eq!((window.low(), window.high()), (0.0, WIDTH));

    window.follow(OLDEST, NEWEST);
    assert_eq!(window.low(), NEWEST as f64 - WIDTH);
    assert_eq!(window.high(), NEWEST as f64);
    assert!(window.is_live());
    assert!(window.is_following());
}

#[test]
fn drag_pans_window_and_leaves_live_mode() {
    let mut window = live_window();
    let (low, high) = (window.low(), window.high());

    assert!(window.pointer_down(at(100.0), PointerButton::Primary, &RECT, BOUNDS));
    assert_eq!(window.state(), GestureState::Dragging);

    let axis = axis(&window);
    let outcome = window.pointer_move(at(150.0), &RECT, &axis, BOUNDS);
    assert!(outcome.redraw);
    assert_eq!(window.low(), low - 30_000.0);
    assert_eq!(window.high(), high - 30_000.0);
    assert!(!window.is_live());

    let outcome = window.pointer_up();
    assert!(outcome.ended);
    assert_eq!(window.state(), GestureState::Manual);

    window.follow(OLDEST, NEWEST + 60_000);
    assert_eq!(window.high(), high - 30_000.0);
}

#[test]
fn dragging_back_to_newest_returns_to_live() {
    let mut window = live_window();
    window.pointer_down(at(100.0), PointerButton::Primary, &RECT, BOUNDS);
    let axis = axis(&window);
    window.pointer_move(at(150.0), &RECT, &axis, BOUNDS);
    window.pointer_up();
    assert_eq!(window.state(), GestureState::Manual);

    assert!(window.pointer_down(at(150.0), PointerButton::Primary, &RECT, BOUNDS));
    let axis = self::axis(&window);
    window.pointer_move(at(101.0), &RECT, &axis, BOUNDS);
    assert_eq!(window.high(), NEWEST as f64);
    assert!(window.is_live());

    let outcome = window.pointer_up();
    assert!(outcome.redraw);
    assert_eq!(window.state(), GestureState::Live);
}

#[test]
fn clamp_holds_for_any_drag_distance() {
    for pixels in [-1_000.0, -400.0, -6.0, 6.0, 100.0, 400.0, 999.5, 1_000.0] {
        let mut window = live_window();
        window.pointer_down(at(1_000.0), PointerButton::Primary, &RECT, BOUNDS);
        let axis = LinearAxis {
            low: 0.0,
            high: 6_000_000.0,
            length_px: 2_000.0,
        };
        window.pointer_move(at(1_000.0 + pixels), &RECT, &axis, BOUNDS);

        assert!(window.low() <= window.high(), "{pixels}");
        assert!(window.low() >= OLDEST as f64, "{pixels}");
        assert!(window.high() <= NEWEST as f64, "{pixels}");
        assert_eq!(window.high() - window.low(), WIDTH, "{pixels}");
        assert_eq!(
            window.is_live(),
            window.high() >= NEWEST as f64 - 1_500.0,
            "{pixels}"
        );
    }
}

#[test]
fn clamp_snaps_when_data_is_narrower_than_window() {
    let mut window = ViewWindow::new(WIDTH);
    window.clamp(10_000.0, 20_000.0);
    assert_eq!(window.low(), 10_000.0);
    assert_eq!(window.high(), 10_000.0 + WIDTH);
    assert!(window.is_live());
}

#[test]
fn small_moves_are_ignored() {
    let mut window = live_window();
    window.pointer_down(at(100.0), PointerButton::Primary, &RECT, BOUNDS);
    let axis = axis(&window);
    let outcome = window.pointer_move(at(104.0), &RECT, &axis, BOUNDS);
    assert!(!outcome.redraw);
    assert_eq!(window.high(), NEWEST as f64);
}

#[test]
fn short_history_is_not_movable_by_primary_drag() {
    let bounds = Some((0, 500_000));
    let mut window = ViewWindow::new(WIDTH);
    window.follow(0, 500_000);
    assert!(window.pointer_down(at(100.0), PointerButton::Primary, &RECT, bounds));
    assert_eq!(window.state(), GestureState::Live);

    let axis = axis(&window);
    let outcome = window.pointer_move(at(600.0), &RECT, &axis, bounds);
    assert!(!outcome.redraw);
    assert_eq!(window.low(), 0.0);
    assert!(window.pointer_up().ended);
    assert_eq!(window.state(), GestureState::Live);
}

#[test]
fn secondary_drag_resizes_with_high_fixed() {
    let mut window = live_window();
    assert!(window.pointer_down(at(1_000.0), PointerButton::Secondary, &RECT, BOUNDS));
    let axis = axis(&window);
    window.pointer_move(at(1_100.0), &RECT, &axis, BOUNDS);

    assert_eq!(window.width_ms(), WIDTH + 60_000.0);
    assert_eq!(window.high(), NEWEST as f64);
    assert_eq!(window.low(), NEWEST as f64 - WIDTH - 60_000.0);
    assert!(window.is_live());
}

#[test]
fn resize_never_goes_below_minimum_width() {
    let mut window = live_window();
    window.pointer_down(at(1_990.0), PointerButton::Secondary, &RECT, BOUNDS);
    let axis = axis(&window);
    window.pointer_move(at(5.0), &RECT, &axis, BOUNDS);
    assert_eq!(window.width_ms(), MIN_WINDOW_MS);
    assert!(window.low() <= window.high());
}

#[test]
fn pinch_keeps_anchor_stationary() {
    let mut window = live_window();
    let first = Touch {
        id: 1,
        point: at(1_000.0),
    };
    window.touch_start(&[first], BOUNDS);
    assert_eq!(window.state(), GestureState::Dragging);

    let axis = axis(&window);
    let pivot = 1_000.0 * 600.0 + window.low();
    let outcome = window.touch_move(&[first], Some(2.0), &axis, BOUNDS);
    assert!(outcome.redraw);
    assert_eq!(window.width_ms(), WIDTH / 2.0);
    assert_eq!((pivot - window.low()) / window.width_ms(), 0.5);
    assert!(!window.is_live());

    let outcome = window.touch_end(&[1]);
    assert!(outcome.ended);
    assert_eq!(window.state(), GestureState::Manual);
}

#[test]
fn second_finger_starts_pinch_on_short_history() {
    let bounds = Some((0, 600_000));
    let mut window = ViewWindow::new(WIDTH);
    window.follow(0, 600_000);
    let first = Touch {
        id: 1,
        point: at(1_000.0),
    };
    let second = Touch {
        id: 2,
        point: at(1_400.0),
    };

    window.touch_start(&[first], bounds);
    assert_eq!(window.state(), GestureState::Live);

    window.touch_start(&[second], bounds);
    assert_eq!(window.state(), GestureState::Dragging);

    let axis = axis(&window);
    let outcome = window.touch_move(&[first], Some(4.0), &axis, bounds);
    assert!(outcome.redraw);
    assert_eq!(window.width_ms(), WIDTH / 4.0);

    let outcome = window.touch_end(&[1, 2]);
    assert!(outcome.ended);
    assert_ne!(window.state(), GestureState::Dragging);
}

#[test]
fn single_touch_pans() {
    let mut window = live_window();
    window.touch_start(
        &[Touch {
            id: 7,
            point: at(500.0),
        }],
        BOUNDS,
    );
    let axis = axis(&window);
    window.touch_move(
        &[Touch {
            id: 7,
            point: at(600.0),
        }],
        None,
        &axis,
        BOUNDS,
    );
    assert_eq!(window.high(), NEWEST as f64 - 60_000.0);
    assert_eq!(window.width_ms(), WIDTH);

    assert!(!window.touch_end(&[99]).ended);
    assert!(window.touch_end(&[7]).ended);
}

#[test]
fn pointer_outside_plot_is_ignored_or_ends_gesture() {
    let mut window = live_window();
    assert!(!window.pointer_down(at(-5.0), PointerButton::Primary, &RECT, BOUNDS));
    assert!(!window.pointer_down(at(10.0), PointerButton::Other, &RECT, BOUNDS));
    assert!(!window.is_tracking_pointer());

    window.pointer_down(at(100.0), PointerButton::Primary, &RECT, BOUNDS);
    let axis = axis(&window);
    let outcome = window.pointer_move(PlotPoint::new(100.0, 500.0), &RECT, &axis, BOUNDS);
    assert!(outcome.ended);
    assert!(!window.is_tracking_pointer());
}
