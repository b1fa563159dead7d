//! CPU reference of `static/shaders/frag.glsl`.
//!
//! The field is the surface left by a cutting tool fed along an Archimedean
//! spiral (pitch `s`) while vibrating with amplitude `A`. Each pixel takes
//! the lowest cut among the nearby spiral turns. Keep this file and the
//! shader in step: the tests here pin behaviour the shader must share.

use std::f64::consts::TAU;

use crate::config::ShaderParams;

/// Value returned outside the patterned annulus.
pub const SENTINEL: f64 = 100.0;

/// Spiral turns scanned on each side of the nearest one.
pub const MK: i64 = 10;

/// Distance from the centre inwards from the outer rim, `R - |p - c|`.
pub fn len_q(x: f64, y: f64, x0: f64, y0: f64, big_r: f64) -> f64 {
    big_r - (x - x0).hypot(y - y0)
}

/// Polar angle of `p` around `c` in `[0, 2π)`; `0` at the centre itself.
pub fn fi_q(x: f64, y: f64, x0: f64, y0: f64) -> f64 {
    let (dx, dy) = (x - x0, y - y0);
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let a = dy.atan2(dx);
    let a = if a < 0.0 { a + TAU } else { a };
    // -0.0 and tiny negatives can round up to exactly TAU.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Tool-tip profile height at lateral distance `arg` from the tip.
///
/// A circular nose of radius `ro` joined to two straight flanks leaving at
/// angles `a` (positive side) and `b` (negative side). `g` tilts the tool,
/// which slides the arc's lowest point by `ro * sin(g)`.
pub fn f(arg: f64, a: f64, b: f64, g: f64, ro: f64) -> f64 {
    let u = arg + ro * g.sin();
    let right = ro * a.sin();
    let left = ro * b.sin();
    if u > right {
        ro * (1.0 - a.cos()) + (u - right) * a.tan()
    } else if u < -left {
        ro * (1.0 - b.cos()) + (-u - left) * b.tan()
    } else {
        ro - (ro * ro - u * u).max(0.0).sqrt()
    }
}

/// Shader constants unpacked into named `f64`s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub chi: f64,
    pub omega: f64,
    pub amplitude: f64,
    pub feed: f64,
    pub outer_r: f64,
    pub inner_r: f64,
    pub alfa: f64,
    pub betta: f64,
    pub gamma: f64,
    pub ro: f64,
}

impl From<&ShaderParams> for FieldParams {
    fn from(p: &ShaderParams) -> Self {
        let [chi, omega, amplitude, feed] = p.data.map(f64::from);
        let [outer_r, inner_r] = p.support.map(f64::from);
        let [alfa, betta, gamma, ro] = p.resez.map(f64::from);
        Self { chi, omega, amplitude, feed, outer_r, inner_r, alfa, betta, gamma, ro }
    }
}

impl FieldParams {
    /// Field value at logical point `(x, y)` around pan centre `(x0, y0)`.
    pub fn evaluate(&self, x: f64, y: f64, x0: f64, y0: f64) -> f64 {
        let l = len_q(x, y, x0, y0, self.outer_r);
        if !(0.0..=self.outer_r - self.inner_r).contains(&l) {
            return SENTINEL;
        }
        let fi = fi_q(x, y, x0, y0);
        let s = self.feed;
        let lambda = l - fi * s / TAU;
        // Turn index stays a float, as in the shader; an integer would
        // overflow for a vanishing feed.
        let ns = (l / s).floor();

        let a = self.alfa - self.gamma;
        let b = self.betta + self.gamma;
        let tilt = self.gamma.cos();

        let mut a_min = SENTINEL;
        for i in -MK..=MK {
            let kk = ns + i as f64;
            let k = self.amplitude * ((fi + kk * TAU) * self.chi / self.omega).sin();
            let v = f(lambda - kk * s, a, b, self.gamma, self.ro) + k * tilt;
            a_min = a_min.min(v);
        }
        a_min
    }

    /// Gray level the shader writes before the GPU clamps it to `[0, 1]`.
    pub fn intensity(value: f64) -> f64 {
        (value + 0.1) * 10.0
    }

    /// Unclamped intensity at pixel `(px, py)`, origin bottom-left as in
    /// `gl_FragCoord`. `geometry_b` is `(x0, y0, scale)`.
    pub fn intensity_at_pixel(
        &self,
        px: f64,
        py: f64,
        width: f64,
        height: f64,
        geometry_b: [f32; 3],
    ) -> f64 {
        let [x0, y0, scale] = geometry_b.map(f64::from);
        let x = (px + 0.5 - width * 0.5) * scale;
        let y = (py + 0.5 - height * 0.5) * scale;
        Self::intensity(self.evaluate(x, y, x0, y0))
    }
}

/// Renders a clamped grayscale image, rows top to bottom.
pub fn render_grayscale(
    width: u32,
    height: u32,
    params: &ShaderParams,
    geometry_b: [f32; 3],
) -> Vec<f32> {
    let field = FieldParams::from(params);
    let (w, h) = (width as f64, height as f64);
    let mut out = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height {
        let py = (height - 1 - row) as f64;
        for col in 0..width {
            let v = field.intensity_at_pixel(col as f64, py, w, h, geometry_b);
            out.push(v.clamp(0.0, 1.0) as f32);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn params() -> FieldParams {
        FieldParams::from(&ShaderParams::default())
    }

    #[test]
    fn fi_is_zero_at_centre() {
        assert_eq!(fi_q(3.0, -2.0, 3.0, -2.0), 0.0);
    }

    #[test]
    fn fi_quadrants() {
        assert!((fi_q(1.0, 0.0, 0.0, 0.0) - 0.0).abs() < 1e-12);
        assert!((fi_q(0.0, 1.0, 0.0, 0.0) - PI / 2.0).abs() < 1e-12);
        assert!((fi_q(-1.0, 0.0, 0.0, 0.0) - PI).abs() < 1e-12);
        assert!((fi_q(0.0, -1.0, 0.0, 0.0) - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn fi_stays_below_tau_for_negative_zero() {
        let a = fi_q(1.0, -0.0, 0.0, 0.0);
        assert!((0.0..TAU).contains(&a));
    }

    #[test]
    fn len_is_depth_into_disk() {
        assert_eq!(len_q(0.0, 0.0, 0.0, 0.0, 200.0), 200.0);
        assert_eq!(len_q(3.0, 4.0, 0.0, 0.0, 200.0), 195.0);
    }

    #[test]
    fn profile_branches_meet() {
        let (a, b, ro) = (0.1, 0.15, 2.0);
        let right = ro * f64::sin(a);
        let left = ro * f64::sin(b);
        let eps = 1e-9;
        assert!((f(right - eps, a, b, 0.0, ro) - f(right + eps, a, b, 0.0, ro)).abs() < 1e-6);
        assert!((f(-left - eps, a, b, 0.0, ro) - f(-left + eps, a, b, 0.0, ro)).abs() < 1e-6);
        assert_eq!(f(0.0, a, b, 0.0, ro), 0.0);
    }

    #[test]
    fn profile_grows_away_from_tip() {
        let (a, b, ro) = (0.3, 0.4, 1.0);
        let mut prev = 0.0;
        for i in 1..50 {
            let v = f(i as f64 * 0.1, a, b, 0.0, ro);
            assert!(v > prev);
            prev = v;
        }
    }

    #[test]
    fn tilt_shifts_tip() {
        let ro = 1.0;
        let g: f64 = 0.2;
        assert!(f(-ro * g.sin(), 0.3, 0.4, g, ro).abs() < 1e-12);
    }

    #[test]
    fn outside_annulus_is_sentinel() {
        let p = params();
        assert_eq!(p.evaluate(250.0, 0.0, 0.0, 0.0), SENTINEL);
        assert_eq!(p.evaluate(5.0, 5.0, 0.0, 0.0), SENTINEL);
        assert_eq!(p.evaluate(0.0, 0.0, 0.0, 0.0), SENTINEL);
        assert_eq!(FieldParams::intensity(SENTINEL), 1001.0);
    }

    #[test]
    fn inside_annulus_is_near_surface() {
        let p = params();
        let v = p.evaluate(100.0, 37.0, 0.0, 0.0);
        assert!(v < SENTINEL);
        assert!(v.abs() < 0.01, "v = {v}");
    }

    #[test]
    fn vanishing_feed_does_not_overflow() {
        for feed in [0.0, 1e-30] {
            let p = FieldParams { feed, ..params() };
            let v = p.evaluate(100.0, 37.0, 0.0, 0.0);
            assert!(v.is_finite(), "feed {feed}: {v}");
        }
    }

    #[test]
    fn pixel_mapping_centres_on_pan() {
        let p = params();
        // Centre pixel of a 101x101 canvas with no pan lands inside the hole.
        let v = p.intensity_at_pixel(50.0, 50.0, 101.0, 101.0, [0.0, 0.0, 0.5]);
        assert_eq!(v, 1001.0);
    }

    #[test]
    fn grayscale_is_clamped_and_sized() {
        let img = render_grayscale(8, 6, &ShaderParams::default(), [0.0, 0.0, 0.5]);
        assert_eq!(img.len(), 48);
        assert!(img.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
