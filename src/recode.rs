//! Photographic output classification
//!
//! Normalized scans and screenshots are usually flat-color images that
//! compress well as PNG. Photographic pages do not; for those the
//! pipeline can re-encode the normalized result as JPEG. The decision
//! is a simple distinct-color count against a configurable threshold.

use image::RgbaImage;
use std::collections::HashSet;

/// Default distinct-color count at or above which an image is
/// considered photographic
pub const DEFAULT_PHOTO_COLOR_THRESHOLD: u32 = 4096;

/// Decides whether a normalized image should be re-encoded lossily
#[derive(Debug, Clone, Copy)]
pub struct PhotoClassifier {
    threshold: u32,
}

impl PhotoClassifier {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// `true` once the image contains at least `threshold` distinct
    /// colors. Counting stops as soon as the threshold is reached.
    pub fn is_photographic(&self, image: &RgbaImage) -> bool {
        if self.threshold == 0 {
            return true;
        }
        let mut seen: HashSet<[u8; 4]> = HashSet::new();
        for pixel in image.pixels() {
            seen.insert(pixel.0);
            if seen.len() >= self.threshold as usize {
                return true;
            }
        }
        false
    }
}

impl Default for PhotoClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PHOTO_COLOR_THRESHOLD)
    }
}
