use serde::{Deserialize, Serialize};

/// Snapshot of the bounded view handed to the X scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewWindow {
    /// Width of the visible window in days; 0 shows the whole domain.
    pub view_days: f64,
    /// How far the window is shifted back from the latest data, in days.
    pub pan_offset_days: f64,
}

impl ViewWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_bounded(&self) -> bool {
        self.view_days > 0.0
    }
}

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanState {
    Idle,
    /// Hovering over a chart whose view is bounded.
    Ready,
    /// Dragging; remembers where the drag began.
    Panning { start_x: f64, start_offset_days: f64 },
}

/// Pan state machine for one chart. Owned by that chart; every mutation goes
/// through `&mut self`, one pointer event at a time.
///
/// Holds `0 <= pan_offset_days <= max_offset_days()` after every call.
#[derive(Debug, Clone)]
pub struct ViewportController {
    view_days: f64,
    pan_offset_days: f64,
    total_domain_days: f64,
    state: PanState,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            view_days: 0.0,
            pan_offset_days: 0.0,
            total_domain_days: 0.0,
            state: PanState::Idle,
        }
    }
}

impl ViewportController {
    pub fn new(view_days: f64) -> Self {
        Self {
            view_days: sanitize_days(view_days),
            ..Self::default()
        }
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn view_days(&self) -> f64 {
        self.view_days
    }

    pub fn pan_offset_days(&self) -> f64 {
        self.pan_offset_days
    }

    pub fn total_domain_days(&self) -> f64 {
        self.total_domain_days
    }

    pub fn window(&self) -> ViewWindow {
        ViewWindow {
            view_days: self.view_days,
            pan_offset_days: self.pan_offset_days,
        }
    }

    /// Furthest the window may be shifted back.
    pub fn max_offset_days(&self) -> f64 {
        if self.view_days > 0.0 {
            (self.total_domain_days - self.view_days).max(0.0)
        } else {
            0.0
        }
    }

    /// New data was loaded: remember its span and reset the view.
    pub fn load_data(&mut self, total_domain_days: f64) {
        self.total_domain_days = sanitize_days(total_domain_days);
        self.reset();
        tracing::debug!(total_days = self.total_domain_days, "viewport reset for new data");
    }

    pub fn set_view_days(&mut self, view_days: f64) {
        self.view_days = sanitize_days(view_days);
        self.reset();
        tracing::debug!(view_days = self.view_days, "viewport reset for new view width");
    }

    fn reset(&mut self) {
        self.pan_offset_days = 0.0;
        self.state = PanState::Idle;
    }

    pub fn pointer_enter(&mut self) {
        if self.state == PanState::Idle && self.view_days > 0.0 {
            self.state = PanState::Ready;
        }
    }

    /// Leaving the chart ends a drag; leaving while merely hovering goes idle.
    pub fn pointer_leave(&mut self) {
        self.state = match self.state {
            PanState::Panning { .. } => PanState::Ready,
            _ => PanState::Idle,
        };
    }

    /// Start a drag at `pointer_x`. Ignored when the view is unbounded.
    /// Returns whether panning began.
    pub fn begin_pan(&mut self, pointer_x: f64) -> bool {
        if self.view_days <= 0.0 || !pointer_x.is_finite() {
            return false;
        }
        if let PanState::Panning { .. } = self.state {
            return false;
        }
        self.state = PanState::Panning {
            start_x: pointer_x,
            start_offset_days: self.pan_offset_days,
        };
        tracing::trace!(pointer_x, offset = self.pan_offset_days, "pan started");
        true
    }

    /// Move the drag to `pointer_x`. The whole chart width spans the full
    /// pannable range; the result is clamped to `[0, max_offset_days()]`.
    pub fn pan_to(&mut self, pointer_x: f64, chart_width: f64) {
        let PanState::Panning {
            start_x,
            start_offset_days,
        } = self.state
        else {
            return;
        };
        if !(chart_width > 0.0) || !pointer_x.is_finite() {
            return;
        }

        let max_offset = self.max_offset_days();
        let delta_px = pointer_x - start_x;
        let offset = start_offset_days + delta_px * (max_offset / chart_width);
        self.pan_offset_days = offset.clamp(0.0, max_offset);
    }

    pub fn end_pan(&mut self) {
        if let PanState::Panning { .. } = self.state {
            self.state = PanState::Ready;
            tracing::trace!(offset = self.pan_offset_days, "pan finished");
        }
    }

    pub fn cancel_pan(&mut self) {
        self.end_pan();
    }
}

fn sanitize_days(days: f64) -> f64 {
    if days.is_finite() && days > 0.0 {
        days
    } else {
        0.0
    }
}
