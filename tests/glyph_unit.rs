//! Unit tests for the glyph transcoding core.
//!
//! These tests cover the pure per-cell functions:
//! - Glyph mapping and the brightness floor
//! - Zone and disc classification
//! - Lightness clamping
//! - Motion thresholding

use glyphcam::camera::Frame;
use glyphcam::glyph::*;
use proptest::prelude::*;

// ==================== Glyph Mapping Tests ====================

#[test]
fn test_glyph_inversion_default_palette() {
    let palette = Palette::default();
    let n = palette.len();
    assert_eq!(palette.index_for(0.0), n - 1);
    assert_eq!(palette.index_for(255.0), 0);
}

#[test]
fn test_brighter_never_sparser() {
    // Index decreases (toward denser glyphs) as brightness increases
    let palette = Palette::default();
    let mut last = palette.index_for(0.0);
    for b in 1..=255 {
        let idx = palette.index_for(b as f32);
        assert!(idx <= last, "brightness {} went from {} to {}", b, last, idx);
        last = idx;
    }
}

#[test]
fn test_suppression_boundary() {
    assert!(!is_visible(15.0, DEFAULT_BRIGHTNESS_FLOOR));
    assert!(is_visible(16.0, DEFAULT_BRIGHTNESS_FLOOR));
}

proptest! {
    #[test]
    fn prop_glyph_inversion_any_length(glyphs in "[!-~]{2,40}") {
        let palette = Palette::new(&glyphs).unwrap();
        let n = palette.len();
        prop_assert_eq!(palette.index_for(0.0), n - 1);
        prop_assert_eq!(palette.index_for(255.0), 0);
    }

    #[test]
    fn prop_glyph_for_is_pure(avg in 0.0f32..=255.0) {
        let palette = Palette::default();
        prop_assert_eq!(palette.glyph_for(avg), palette.glyph_for(avg));
        prop_assert!(palette.index_for(avg) < palette.len());
    }

    #[test]
    fn prop_color_for_is_pure(
        x in 0u32..640,
        y in 0u32..480,
        brightness in 0.0f32..=255.0,
    ) {
        let scheme = ZoneScheme::default();
        let a = scheme.color_for(x, y, 640, 480, brightness);
        let b = scheme.color_for(x, y, 640, 480, brightness);
        prop_assert_eq!(a, b);
        prop_assert!(a.lightness >= 30.0 && a.lightness <= 80.0);
    }
}

// ==================== Zone Colouring Tests ====================

#[test]
fn test_lightness_exact_bounds() {
    let scheme = ZoneScheme::default();
    assert_eq!(scheme.lightness(0.0), 30.0);
    assert_eq!(scheme.lightness(255.0), 80.0);
    for b in [127.0, 128.0] {
        let l = scheme.lightness(b);
        assert!(l > 30.0 && l < 80.0, "lightness for {} was {}", b, l);
    }
}

#[test]
fn test_zone_rows_for_height_300() {
    assert_eq!(Zone::classify(99, 300), Zone::Top);
    assert_eq!(Zone::classify(100, 300), Zone::Middle);
    assert_eq!(Zone::classify(199, 300), Zone::Middle);
    assert_eq!(Zone::classify(200, 300), Zone::Bottom);
}

#[test]
fn test_centre_is_emblem_coloured() {
    let scheme = ZoneScheme::default();
    assert_eq!(Region::classify(150, 150, 300, 300), Region::Emblem);
    let color = scheme.color_for(150, 150, 300, 300, 128.0);
    assert_eq!(color.hue, 240.0);
    assert_eq!(color.saturation, 100.0);
}

#[test]
fn test_disc_boundary_at_150_101_and_150_100() {
    // (150, 101) is 49 from the centre, (150, 100) is 50; the disc radius is 300/6 = 50
    assert_eq!(Region::classify(150, 101, 300, 300), Region::Emblem);
    assert_eq!(Region::classify(150, 100, 300, 300), Region::Neutral);
}

#[test]
fn test_middle_band_outside_disc_is_grey() {
    let scheme = ZoneScheme::default();
    for (x, y) in [(150, 100), (20, 150), (280, 199)] {
        assert_eq!(Region::classify(x, y, 300, 300), Region::Neutral);
        let rgb = scheme.color_for(x, y, 300, 300, 200.0).to_rgb();
        assert_eq!(rgb.r, rgb.g);
        assert_eq!(rgb.g, rgb.b);
    }
}

#[test]
fn test_top_and_bottom_ignore_x() {
    for x in [0, 150, 299] {
        assert_eq!(Region::classify(x, 10, 300, 300), Region::Top);
        assert_eq!(Region::classify(x, 290, 300, 300), Region::Bottom);
    }
}

// ==================== Motion Detection Tests ====================

fn grey(width: u32, height: u32) -> Frame {
    Frame::solid(width, height, [120, 120, 120, 255])
}

#[test]
fn test_motion_difference_of_nine_is_moving() {
    let mut detector = MotionDetector::default();
    let before = grey(8, 8);
    detector.commit(&before);

    let mut after = before.clone();
    after.set_pixel(4, 4, [120, 129, 120, 255]);
    for (x, y) in cell_origins(8, 8, 4) {
        assert_eq!(detector.is_moving(&after, x, y), (x, y) == (4, 4));
    }
}

#[test]
fn test_motion_difference_of_eight_is_static() {
    let mut detector = MotionDetector::default();
    let before = grey(8, 8);
    detector.commit(&before);

    let mut after = before.clone();
    after.set_pixel(4, 4, [120, 128, 120, 255]);
    assert!(cell_origins(8, 8, 4).all(|(x, y)| !detector.is_moving(&after, x, y)));
}

#[test]
fn test_motion_diffs_only_against_previous_frame() {
    let mut detector = MotionDetector::default();
    let a = grey(4, 4);
    let mut b = a.clone();
    b.set_pixel(0, 0, [120, 200, 120, 255]);

    detector.commit(&a);
    assert!(detector.is_moving(&b, 0, 0));
    detector.commit(&b);
    assert!(!detector.is_moving(&b, 0, 0));
}
