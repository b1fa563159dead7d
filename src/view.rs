//! Pan/zoom state and the single controller that mutates it.
//!
//! Browser events are translated into [`ViewEvent`]s by the wasm layer, so
//! everything here runs (and is tested) without a DOM.

use crate::config::AppConfig;

/// Wheel zoom factor applied for a scroll-down notch.
pub const ZOOM_OUT_FACTOR: f64 = 1.1;
/// Wheel zoom factor applied for a scroll-up notch.
pub const ZOOM_IN_FACTOR: f64 = 0.9;

/// Key that restores the initial view.
pub const RESET_KEY: &str = " ";

/// Platform-neutral input, positions in canvas-relative CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Wheel { delta_y: f64 },
    Key(String),
    PointerDown { button: i16, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub offset: (f64, f64),
    pub scale: f64,
    pub pointer_prev: (f64, f64),
    pub pointer_curr: (f64, f64),
    pub dragging: bool,
    dirty: bool,
    initial_scale: f64,
    initial_offset: (f64, f64),
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(0.5, (0.0, 0.0))
    }
}

impl ViewState {
    pub fn new(initial_scale: f64, initial_offset: (f64, f64)) -> Self {
        Self {
            offset: initial_offset,
            scale: initial_scale,
            pointer_prev: (0.0, 0.0),
            pointer_curr: (0.0, 0.0),
            dragging: false,
            // First frame must draw.
            dirty: true,
            initial_scale,
            initial_offset,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let [x, y] = config.initial_offset;
        Self::new(config.initial_scale, (x, y))
    }

    /// Applies one input event. Returns `true` if the rendered image changes,
    /// in which case the dirty flag is also raised.
    pub fn apply(&mut self, event: &ViewEvent) -> bool {
        let changed = match *event {
            ViewEvent::Wheel { delta_y } => {
                let factor = if delta_y > 0.0 { ZOOM_OUT_FACTOR } else { ZOOM_IN_FACTOR };
                self.zoom(factor);
                true
            }
            ViewEvent::Key(ref key) if key == RESET_KEY => {
                self.reset();
                true
            }
            ViewEvent::Key(_) => false,
            ViewEvent::PointerDown { button: 0, x, y } => {
                self.dragging = true;
                self.pointer_prev = (x, y);
                true
            }
            ViewEvent::PointerDown { .. } => false,
            ViewEvent::PointerMove { x, y } if self.dragging => {
                self.offset.0 += x - self.pointer_prev.0;
                self.offset.1 += y - self.pointer_prev.1;
                self.pointer_prev = (x, y);
                self.pointer_curr = (0.0, 0.0);
                true
            }
            ViewEvent::PointerMove { .. } => false,
            ViewEvent::PointerUp | ViewEvent::PointerLeave => {
                self.dragging = false;
                false
            }
        };
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Multiplies the scale by `factor`, shrinking the offset so the pan
    /// centre keeps its logical position. The anchor is the origin, not the
    /// cursor.
    pub fn zoom(&mut self, factor: f64) {
        let new_scale = self.scale * factor;
        let k = (new_scale - self.scale) / new_scale;
        self.offset.0 -= self.offset.0 * k;
        self.offset.1 -= self.offset.1 * k;
        self.scale = new_scale;
        log::debug!(
            "scale = {}  | x,y = {},{}",
            self.scale,
            self.offset.0,
            self.offset.1
        );
    }

    pub fn reset(&mut self) {
        self.scale = self.initial_scale;
        self.offset = self.initial_offset;
        self.pointer_prev = (0.0, 0.0);
        self.pointer_curr = (0.0, 0.0);
        self.dragging = false;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// `(x0, y0, scale)` for `u_geometryB`. Screen y grows downwards, the
    /// shader's grows upwards.
    pub fn geometry_b(&self) -> [f32; 3] {
        [
            (self.offset.0 * self.scale) as f32,
            (-self.offset.1 * self.scale) as f32,
            self.scale as f32,
        ]
    }
}
