use std::f64::consts::TAU;

use wave_viz::config::{AppConfig, Preset, ShaderParams};
use wave_viz::field::{self, fi_q, FieldParams, SENTINEL};
use wave_viz::view::ViewState;

/// Canvas size the golden values were taken at, default view of each preset.
const GOLDEN_W: u32 = 400;
const GOLDEN_H: u32 = 300;

/// `(col, py, intensity)` with `py` counted from the bottom as in
/// `gl_FragCoord`. All points sit inside the annulus.
const ANIMATED_GOLDEN: [(u32, u32, f64); 6] = [
    (0, 150, 1.0001578182563606),
    (100, 150, 1.0001410786362526),
    (200, 100, 0.9900030469500363),
    (300, 250, 1.0075055704859568),
    (350, 20, 0.9935538689319451),
    (50, 280, 1.0065763125067482),
];

const IMMEDIATE_GOLDEN: [(u32, u32, f64); 6] = [
    (0, 150, 0.6952276154481005),
    (100, 150, 0.9659721476042353),
    (200, 100, 0.2678876252240714),
    (300, 250, 0.4767434915816287),
    (350, 20, 1.120082563776617),
    (50, 280, 0.7635574918709187),
];

fn check_golden(preset: Preset, golden: &[(u32, u32, f64)], checksum: f64) {
    let cfg = AppConfig::preset(preset);
    let view = ViewState::from_config(&cfg);
    let p = FieldParams::from(&cfg.shader);
    let (w, h) = (GOLDEN_W as f64, GOLDEN_H as f64);
    for &(col, py, want) in golden {
        let got = p.intensity_at_pixel(col as f64, py as f64, w, h, view.geometry_b());
        assert!((got - want).abs() < 1e-9, "{preset:?} ({col}, {py}): {got} vs {want}");
    }

    let img = field::render_grayscale(GOLDEN_W, GOLDEN_H, &cfg.shader, view.geometry_b());
    let sum: f64 = img.iter().map(|&v| f64::from(v)).sum();
    assert!((sum - checksum).abs() < 1e-3, "{preset:?} checksum {sum} vs {checksum}");
}

#[test]
fn animated_default_view_matches_golden() {
    check_golden(Preset::Animated, &ANIMATED_GOLDEN, 119681.93376082182);
}

#[test]
fn immediate_default_view_matches_golden() {
    check_golden(Preset::Immediate, &IMMEDIATE_GOLDEN, 75595.73499967379);
}

#[test]
fn hole_and_rim_are_white() {
    let params = ShaderParams::default();
    // scale 1: R=200 spans 200 px, r=20 spans 20 px.
    let (w, h) = (500u32, 500u32);
    let img = field::render_grayscale(w, h, &params, [0.0, 0.0, 1.0]);
    let at = |col: u32, row: u32| img[(row * w + col) as usize];
    assert_eq!(at(250, 250), 1.0);
    assert_eq!(at(5, 5), 1.0);
    assert_eq!(at(495, 250), 1.0);
}

#[test]
fn pattern_follows_pan() {
    let cfg = AppConfig::preset(Preset::Immediate);
    let centred = field::render_grayscale(60, 60, &cfg.shader, [0.0, 0.0, 5.0]);
    let shifted = field::render_grayscale(60, 60, &cfg.shader, [50.0, 0.0, 5.0]);
    // Pan by 10 px at scale 5: columns move right by 10.
    let w = 60usize;
    for row in 0..60 {
        for col in 0..40 {
            let a = centred[row * w + col];
            let b = shifted[row * w + col + 10];
            assert!((a - b).abs() < 1e-5, "row {row} col {col}: {a} vs {b}");
        }
    }
}

#[test]
fn sentinel_outside_support_for_any_angle() {
    let p = FieldParams::from(&ShaderParams::default());
    for i in 0..360 {
        let t = i as f64 / 360.0 * TAU;
        let (c, s) = (t.cos(), t.sin());
        assert_eq!(p.evaluate(7.0 + 201.0 * c, -3.0 + 201.0 * s, 7.0, -3.0), SENTINEL);
        assert_eq!(p.evaluate(7.0 + 19.0 * c, -3.0 + 19.0 * s, 7.0, -3.0), SENTINEL);
        assert_eq!(FieldParams::intensity(SENTINEL), 1001.0);
        let fi = fi_q(7.0 + c, -3.0 + s, 7.0, -3.0);
        assert!((0.0..TAU).contains(&fi));
    }
}
