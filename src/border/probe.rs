//! Per-side trimmability probe
//!
//! Decides whether one side of an image carries a clean, fully
//! trimmable solid-color border.
//!
//! # Algorithm
//!
//! Exact-match auto-trim works on the whole image at once, so a solid
//! border on the *opposite* side would also be removed and corrupt the
//! size comparison. To isolate one side, the probe pads the opposite
//! side with a white filler line and then a black filler line before
//! trimming. No border color can match both fillers, so the trim
//! consumes exactly the outer filler and stops at the inner one, and
//! the perpendicular sides are protected because every one of their
//! slices now contains both filler colors. After trimming, the
//! surviving filler line is chopped back off and the dimension along
//! the probed axis is compared against the original: any reduction can
//! only have come from the probed side.
//!
//! If the whole image is one solid color, every side reports trimmable;
//! downstream logic treats that as a full border.

use image::{Rgba, RgbaImage};

use super::types::{Side, SliceAxis};
use crate::engine::RasterEngine;

/// White filler line, spliced first (ends up innermost)
const FILLER_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Black filler line, spliced second (ends up outermost)
const FILLER_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Thickness of each filler line in pixels
const FILLER_THICKNESS: u32 = 1;

/// Probes one side of an image for a cleanly trimmable border
pub struct EdgeTrimProbe<'e> {
    engine: &'e dyn RasterEngine,
}

impl<'e> EdgeTrimProbe<'e> {
    pub fn new(engine: &'e dyn RasterEngine) -> Self {
        Self { engine }
    }

    /// `true` if an exact-match trim removes at least one pixel line
    /// from `side`
    pub fn probe(&self, image: &RgbaImage, side: Side) -> bool {
        let (w0, h0) = self.engine.dimensions(image);
        let opposite = side.opposite();

        let padded = self.engine.splice(image, opposite, FILLER_THICKNESS, FILLER_WHITE);
        let padded = self.engine.splice(&padded, opposite, FILLER_THICKNESS, FILLER_BLACK);

        let trimmed = self.engine.auto_trim(&padded);

        // the inner (white) filler always survives the trim
        let restored = self.engine.chop(&trimmed, opposite, FILLER_THICKNESS);
        let (w1, h1) = self.engine.dimensions(&restored);

        let trimmable = match side.axis() {
            SliceAxis::Row => h1 != h0,
            SliceAxis::Column => w1 != w0,
        };

        tracing::trace!(%side, before = ?(w0, h0), after = ?(w1, h1), trimmable, "edge probe");
        trimmable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ImageEngine;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    /// Non-uniform body: no row or column of this pattern repeats a
    /// single color
    fn textured(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        })
    }

    fn paint_rows(img: &mut RgbaImage, rows: std::ops::Range<u32>, color: Rgba<u8>) {
        let w = img.width();
        for y in rows {
            for x in 0..w {
                img.put_pixel(x, y, color);
            }
        }
    }

    fn paint_cols(img: &mut RgbaImage, cols: std::ops::Range<u32>, color: Rgba<u8>) {
        let h = img.height();
        for x in cols {
            for y in 0..h {
                img.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn test_probe_detects_north_border_only() {
        let engine = ImageEngine::new();
        let probe = EdgeTrimProbe::new(&engine);

        let mut img = textured(60, 60);
        paint_rows(&mut img, 0..10, WHITE);

        assert!(probe.probe(&img, Side::North));
        assert!(!probe.probe(&img, Side::South));
        assert!(!probe.probe(&img, Side::East));
        assert!(!probe.probe(&img, Side::West));
    }

    #[test]
    fn test_probe_detects_all_sides() {
        let engine = ImageEngine::new();
        let probe = EdgeTrimProbe::new(&engine);

        let mut img = textured(60, 60);
        paint_rows(&mut img, 0..8, WHITE);
        paint_rows(&mut img, 52..60, WHITE);
        paint_cols(&mut img, 0..8, WHITE);
        paint_cols(&mut img, 52..60, WHITE);

        for side in Side::all() {
            assert!(probe.probe(&img, side), "side {side}");
        }
    }

    #[test]
    fn test_probe_not_fooled_by_opposite_border() {
        let engine = ImageEngine::new();
        let probe = EdgeTrimProbe::new(&engine);

        // solid border on the south side only, in a different color
        let mut img = textured(60, 60);
        paint_rows(&mut img, 50..60, BLACK);

        assert!(!probe.probe(&img, Side::North));
        assert!(probe.probe(&img, Side::South));
    }

    #[test]
    fn test_probe_opposite_border_matching_filler_colors() {
        let engine = ImageEngine::new();
        let probe = EdgeTrimProbe::new(&engine);

        // white south border: matches the inner filler; black north
        // border: matches the outer filler. Neither may leak into the
        // other side's verdict.
        let mut img = textured(60, 60);
        paint_rows(&mut img, 0..6, BLACK);
        paint_rows(&mut img, 54..60, WHITE);

        assert!(probe.probe(&img, Side::North));
        assert!(probe.probe(&img, Side::South));
        assert!(!probe.probe(&img, Side::East));
        assert!(!probe.probe(&img, Side::West));
    }

    #[test]
    fn test_probe_solid_image_reports_every_side() {
        let engine = ImageEngine::new();
        let probe = EdgeTrimProbe::new(&engine);

        let img = RgbaImage::from_pixel(30, 30, WHITE);
        for side in Side::all() {
            assert!(probe.probe(&img, side), "side {side}");
        }
    }

    #[test]
    fn test_probe_fuzzy_border_is_not_trimmable() {
        let engine = ImageEngine::new();
        let probe = EdgeTrimProbe::new(&engine);

        // repeating but not single-color rows at the south edge
        let mut img = textured(60, 60);
        for y in 55..60 {
            for x in 0..60 {
                img.put_pixel(x, y, Rgba([200, (x * 3 % 256) as u8, 50, 255]));
            }
        }

        assert!(!probe.probe(&img, Side::South));
    }
}
