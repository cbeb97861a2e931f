/// A drag only counts once the pointer moved this far from its anchor.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;
/// `high` this close to the newest sample snaps back to live.
pub const LIVE_SNAP_MS: f64 = 1_500.0;
/// Narrowest window a resize gesture can produce.
pub const MIN_WINDOW_MS: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Live,
    Dragging,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: u64,
    pub point: PlotPoint,
}

/// Plot area in renderer pixels; `y1` is the bottom edge, `y2` the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl PlotRect {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn contains(&self, point: PlotPoint) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y2 && point.y <= self.y1
    }
}

/// Inverse projection of the renderer's X axis, pixels to data.
pub trait AxisProjection {
    fn data_x(&self, pixel_x: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAxis {
    pub low: f64,
    pub high: f64,
    pub length_px: f64,
}

impl AxisProjection for LinearAxis {
    fn data_x(&self, pixel_x: f64) -> f64 {
        if self.length_px <= 0.0 {
            return self.low;
        }
        pixel_x * (self.high - self.low) / self.length_px + self.low
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureOutcome {
    /// The window moved and the chart should be projected again.
    pub redraw: bool,
    /// The gesture finished; the display config should be persisted.
    pub ended: bool,
}

/// Visible time range over the sample buffer.
#[derive(Debug, Clone)]
pub struct ViewWindow {
    low: f64,
    high: f64,
    width_ms: f64,
    live: bool,
    state: GestureState,
    anchor: Option<PlotPoint>,
    button: PointerButton,
    touches: Vec<Touch>,
    initial_width: f64,
}

impl ViewWindow {
    pub fn new(width_ms: f64) -> Self {
        let width_ms = width_ms.max(0.0);
        Self {
            low: 0.0,
            high: width_ms,
            width_ms,
            live: true,
            state: GestureState::Live,
            anchor: None,
            button: PointerButton::Primary,
            touches: Vec::new(),
            initial_width: width_ms,
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn width_ms(&self) -> f64 {
        self.width_ms
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Live and not held by a gesture; new samples may move the window.
    pub fn is_following(&self) -> bool {
        self.state == GestureState::Live
    }

    pub fn is_tracking_pointer(&self) -> bool {
        self.anchor.is_some()
    }

    /// Width chosen outside a gesture, e.g. from persisted config.
    pub fn set_width_ms(&mut self, width_ms: f64) {
        self.width_ms = width_ms.max(0.0);
        if self.state != GestureState::Dragging {
            self.high = self.low + self.width_ms;
        }
    }

    /// Leaves manual mode and follows the newest sample again.
    pub fn go_live(&mut self) {
        self.state = GestureState::Live;
        self.live = true;
        self.anchor = None;
        self.touches.clear();
    }

    /// Tracks the newest sample; does nothing while a gesture holds the window.
    pub fn follow(&mut self, oldest: i64, newest: i64) {
        if self.state != GestureState::Live {
            return;
        }
        self.low = (newest as f64 - self.width_ms).max(oldest as f64);
        self.high = self.low + self.width_ms;
        self.live = true;
    }

    pub fn pointer_down(
        &mut self,
        point: PlotPoint,
        button: PointerButton,
        rect: &PlotRect,
        bounds: Option<(i64, i64)>,
    ) -> bool {
        if button == PointerButton::Other || !rect.contains(point) {
            return false;
        }
        self.anchor = Some(point);
        self.button = button;
        self.start_gesture(bounds);
        true
    }

    pub fn pointer_move(
        &mut self,
        point: PlotPoint,
        rect: &PlotRect,
        axis: &dyn AxisProjection,
        bounds: Option<(i64, i64)>,
    ) -> GestureOutcome {
        if self.anchor.is_none() {
            return GestureOutcome::default();
        }
        if !rect.contains(point) {
            return self.end_gesture();
        }
        GestureOutcome {
            redraw: self.move_to(point, None, axis, bounds),
            ended: false,
        }
    }

    pub fn pointer_up(&mut self) -> GestureOutcome {
        if self.anchor.is_none() {
            return GestureOutcome::default();
        }
        self.end_gesture()
    }

    pub fn touch_start(&mut self, started: &[Touch], bounds: Option<(i64, i64)>) {
        self.touches.extend_from_slice(started);
        let Some(first) = self.touches.first().copied() else {
            return;
        };
        if self.anchor.is_none() {
            self.anchor = Some(first.point);
            self.start_gesture(bounds);
        } else if self.state != GestureState::Dragging {
            // A later finger makes this a pinch, which may move a window the
            // first touch could not.
            self.start_gesture(bounds);
        }
    }

    /// `scale` is the pinch factor reported by the platform, if any.
    pub fn touch_move(
        &mut self,
        moved: &[Touch],
        scale: Option<f64>,
        axis: &dyn AxisProjection,
        bounds: Option<(i64, i64)>,
    ) -> GestureOutcome {
        let mut outcome = GestureOutcome::default();
        for touch in moved {
            let Some(index) = self.touches.iter().position(|t| t.id == touch.id) else {
                continue;
            };
            self.touches[index] = *touch;
            if index != 0 {
                continue;
            }
            let redraw = match (scale.filter(|s| *s != 1.0), self.anchor) {
                (Some(scale), Some(anchor)) => self.move_to(anchor, Some(scale), axis, bounds),
                _ => self.move_to(touch.point, None, axis, bounds),
            };
            outcome.redraw |= redraw;
        }
        outcome
    }

    pub fn touch_end(&mut self, ended: &[u64]) -> GestureOutcome {
        self.touches.retain(|t| !ended.contains(&t.id));
        if self.touches.is_empty() && self.anchor.is_some() {
            self.end_gesture()
        } else {
            GestureOutcome::default()
        }
    }

    fn is_scale_intent(&self) -> bool {
        if self.touches.is_empty() {
            self.button == PointerButton::Secondary
        } else {
            self.touches.len() > 1
        }
    }

    fn start_gesture(&mut self, bounds: Option<(i64, i64)>) {
        self.initial_width = self.width_ms;
        let Some((oldest, newest)) = bounds else {
            return;
        };
        let movable = self.state == GestureState::Manual
            || self.is_scale_intent()
            || (newest - oldest) as f64 > self.width_ms;
        if movable {
            log::debug!("View window gesture started");
            self.state = GestureState::Dragging;
        }
    }

    fn end_gesture(&mut self) -> GestureOutcome {
        self.anchor = None;
        self.touches.clear();
        let mut redraw = false;
        if self.state == GestureState::Dragging {
            self.state = if self.live {
                redraw = true;
                GestureState::Live
            } else {
                GestureState::Manual
            };
            log::debug!("View window gesture ended in {:?}", self.state);
        }
        GestureOutcome {
            redraw,
            ended: true,
        }
    }

    fn move_to(
        &mut self,
        point: PlotPoint,
        scale: Option<f64>,
        axis: &dyn AxisProjection,
        bounds: Option<(i64, i64)>,
    ) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        if (point.x - anchor.x).abs() <= DRAG_THRESHOLD_PX && scale.is_none() {
            return false;
        }
        let mut redraw = false;
        if let (GestureState::Dragging, Some((oldest, newest))) = (self.state, bounds) {
            let delta = axis.data_x(point.x) - axis.data_x(anchor.x);
            match scale {
                Some(scale) if scale > 0.0 && scale.is_finite() => {
                    let pivot = axis.data_x(anchor.x).clamp(self.low, self.high);
                    let fraction = if self.width_ms > 0.0 {
                        (pivot - self.low) / self.width_ms
                    } else {
                        0.0
                    };
                    self.width_ms = (self.initial_width / scale).max(MIN_WINDOW_MS);
                    self.low = pivot - fraction * self.width_ms;
                    self.high = self.low + self.width_ms;
                }
                Some(_) => {}
                None if self.is_scale_intent() => {
                    self.width_ms = (self.width_ms + delta).max(MIN_WINDOW_MS);
                    self.low = self.high - self.width_ms;
                }
                None => {
                    self.low -= delta;
                    self.high -= delta;
                }
            }
            self.clamp(oldest as f64, newest as f64);
            redraw = true;
        }
        self.anchor = Some(point);
        redraw
    }

    /// Keeps the window inside the data and decides whether it is live.
    pub fn clamp(&mut self, oldest: f64, newest: f64) {
        self.live = false;
        if newest - oldest < self.width_ms {
            self.low = oldest;
            self.high = oldest + self.width_ms;
            self.live = true;
            return;
        }
        if self.low < oldest {
            let excess = oldest - self.low;
            self.low = oldest;
            self.high += excess;
        }
        if self.high - newest >= -LIVE_SNAP_MS {
            self.low -= self.high - newest;
            self.high = newest;
            self.live = true;
        }
    }
}
