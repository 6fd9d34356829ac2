//! Whole-image border classification
//!
//! Runs the edge-trim probe on all four sides and aggregates the
//! verdicts into a [`BorderState`]. Both corner colors are sampled
//! here, before any geometry changes: the top-left pixel defines the
//! border color for the north and west sides, the bottom-right pixel
//! for the south and east sides.
//!
//! A fully transparent top-left pixel means "no defined border color".
//! That is not an error; the state is still computed, but the composer
//! treats it as a no-op sentinel and never mutates the image.

use image::RgbaImage;

use super::probe::EdgeTrimProbe;
use super::types::{BorderState, Side, SideVerdict};
use crate::engine::RasterEngine;

/// Classifies the border situation of a whole image
pub struct BorderClassifier<'e> {
    engine: &'e dyn RasterEngine,
}

impl<'e> BorderClassifier<'e> {
    pub fn new(engine: &'e dyn RasterEngine) -> Self {
        Self { engine }
    }

    /// Probe all four sides and sample both corner colors
    pub fn classify(&self, image: &RgbaImage) -> BorderState {
        let (w, h) = self.engine.dimensions(image);
        let corner_nw = self.engine.sample(image, 0, 0);
        let corner_se = self.engine.sample(image, w.saturating_sub(1), h.saturating_sub(1));

        let probe = EdgeTrimProbe::new(self.engine);
        let verdicts = Side::all().map(|side| {
            let (cx, cy) = side.corner(w, h);
            SideVerdict {
                side,
                trimmable: probe.probe(image, side),
                border_color: self.engine.sample(image, cx, cy),
                residual: None,
            }
        });

        let state = BorderState {
            verdicts,
            corner_nw,
            corner_se,
        };
        tracing::debug!(
            kind = %state.kind(),
            transparent = state.is_transparent(),
            "classified border"
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderKind;
    use crate::engine::ImageEngine;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn textured(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        })
    }

    #[test]
    fn test_classify_full_border() {
        let engine = ImageEngine::new();
        let classifier = BorderClassifier::new(&engine);

        let mut img = RgbaImage::from_pixel(50, 50, WHITE);
        let content = textured(30, 30);
        image::imageops::replace(&mut img, &content, 10, 10);

        let state = classifier.classify(&img);
        assert_eq!(state.kind(), BorderKind::FullBorder);
        assert!(state.full());
        assert!(state.any());
        assert_eq!(state.corner_nw, WHITE);
    }

    #[test]
    fn test_classify_partial_border() {
        let engine = ImageEngine::new();
        let classifier = BorderClassifier::new(&engine);

        let mut img = textured(50, 50);
        for y in 0..10 {
            for x in 0..50 {
                img.put_pixel(x, y, WHITE);
            }
        }

        let state = classifier.classify(&img);
        assert_eq!(state.kind(), BorderKind::PartialBorder);
        assert!(state.verdict(Side::North).trimmable);
        assert!(!state.verdict(Side::South).trimmable);
        assert!(!state.full());
        assert!(state.any());
    }

    #[test]
    fn test_classify_no_border() {
        let engine = ImageEngine::new();
        let classifier = BorderClassifier::new(&engine);

        let state = classifier.classify(&textured(40, 40));
        assert_eq!(state.kind(), BorderKind::NoBorder);
        assert!(!state.any());
    }

    #[test]
    fn test_classify_solid_image_is_full() {
        let engine = ImageEngine::new();
        let classifier = BorderClassifier::new(&engine);

        let state = classifier.classify(&RgbaImage::from_pixel(25, 25, WHITE));
        assert_eq!(state.kind(), BorderKind::FullBorder);
    }

    #[test]
    fn test_classify_transparent_corner_sentinel() {
        let engine = ImageEngine::new();
        let classifier = BorderClassifier::new(&engine);

        let mut img = RgbaImage::from_pixel(40, 40, WHITE);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 0]));

        let state = classifier.classify(&img);
        assert!(state.is_transparent());
    }

    #[test]
    fn test_classify_samples_both_corner_colors() {
        let engine = ImageEngine::new();
        let classifier = BorderClassifier::new(&engine);

        let blue = Rgba([20, 20, 220, 255]);
        let mut img = textured(40, 40);
        // white north border, blue south border
        for x in 0..40 {
            for y in 0..5 {
                img.put_pixel(x, y, WHITE);
            }
            for y in 35..40 {
                img.put_pixel(x, y, blue);
            }
        }

        let state = classifier.classify(&img);
        assert_eq!(state.corner_nw, WHITE);
        assert_eq!(state.corner_se, blue);
        assert_eq!(state.verdict(Side::North).border_color, WHITE);
        assert_eq!(state.verdict(Side::South).border_color, blue);
    }
}
