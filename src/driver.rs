//! Routes view mutations to the screen according to [`RenderMode`].
//!
//! Kept free of browser types so the dispatch can be tested on the host.

use crate::config::RenderMode;
use crate::view::{ViewEvent, ViewState};

/// Something a view can be drawn onto.
pub trait Surface {
    fn draw(&mut self, view: &ViewState);
    fn resize(&mut self, width: u32, height: u32);
}

/// The view plus the surface it drives. Shared by every DOM callback.
pub struct Driver<S> {
    pub view: ViewState,
    pub surface: S,
    pub mode: RenderMode,
}

impl<S: Surface> Driver<S> {
    pub fn new(view: ViewState, surface: S, mode: RenderMode) -> Self {
        Self { view, surface, mode }
    }

    /// Applies one input event. Immediate mode draws before returning;
    /// animation mode leaves the view dirty for the next [`Driver::frame`].
    pub fn handle(&mut self, event: &ViewEvent) {
        if self.view.apply(event) {
            self.flush_immediate();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.view.mark_dirty();
        self.flush_immediate();
    }

    /// One animation frame: draw only if something changed.
    pub fn frame(&mut self) {
        if self.view.take_dirty() {
            self.surface.draw(&self.view);
        }
    }

    fn flush_immediate(&mut self) {
        if self.mode == RenderMode::Immediate {
            self.frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Preset};

    #[derive(Default)]
    struct Recorder {
        draws: Vec<[f32; 3]>,
        sizes: Vec<(u32, u32)>,
    }

    impl Surface for Recorder {
        fn draw(&mut self, view: &ViewState) {
            self.draws.push(view.geometry_b());
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.sizes.push((width, height));
        }
    }

    fn driver(preset: Preset) -> Driver<Recorder> {
        let cfg = AppConfig::preset(preset);
        let mut d = Driver::new(ViewState::from_config(&cfg), Recorder::default(), cfg.render_mode);
        // Startup always draws once.
        d.frame();
        d
    }

    #[test]
    fn immediate_mode_draws_inside_the_handler() {
        let mut d = driver(Preset::Immediate);
        assert_eq!(d.surface.draws.len(), 1);

        d.handle(&ViewEvent::Wheel { delta_y: 1.0 });
        assert_eq!(d.surface.draws.len(), 2);
        assert!(!d.view.is_dirty());
        assert!((d.surface.draws[1][2] - 0.55).abs() < 1e-6);

        d.handle(&ViewEvent::PointerDown { button: 0, x: 10.0, y: 10.0 });
        d.handle(&ViewEvent::PointerMove { x: 14.0, y: 10.0 });
        assert_eq!(d.surface.draws.len(), 4);

        // Nothing left for the frame callback.
        d.frame();
        assert_eq!(d.surface.draws.len(), 4);
    }

    #[test]
    fn animation_mode_defers_to_the_frame() {
        let mut d = driver(Preset::Animated);
        assert_eq!(d.surface.draws.len(), 1);

        d.handle(&ViewEvent::Wheel { delta_y: 1.0 });
        d.handle(&ViewEvent::Wheel { delta_y: -1.0 });
        assert_eq!(d.surface.draws.len(), 1);
        assert!(d.view.is_dirty());

        d.frame();
        assert_eq!(d.surface.draws.len(), 2);
        assert!(!d.view.is_dirty());

        d.frame();
        assert_eq!(d.surface.draws.len(), 2);
    }

    #[test]
    fn ignored_events_never_draw() {
        for preset in [Preset::Immediate, Preset::Animated] {
            let mut d = driver(preset);
            d.handle(&ViewEvent::PointerMove { x: 3.0, y: 4.0 });
            d.handle(&ViewEvent::Key("a".into()));
            d.frame();
            assert_eq!(d.surface.draws.len(), 1, "{preset:?}");
        }
    }

    #[test]
    fn resize_reaches_surface_and_redraws() {
        let mut d = driver(Preset::Immediate);
        d.resize(640, 480);
        assert_eq!(d.surface.sizes, vec![(640, 480)]);
        assert_eq!(d.surface.draws.len(), 2);

        let mut d = driver(Preset::Animated);
        d.resize(640, 480);
        assert_eq!(d.surface.sizes, vec![(640, 480)]);
        assert_eq!(d.surface.draws.len(), 1);
        d.frame();
        assert_eq!(d.surface.draws.len(), 2);
    }
}
