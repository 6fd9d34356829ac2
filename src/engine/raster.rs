//! Default raster engine backed by the `image` crate

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::{EngineError, RasterEngine, Result};
use crate::border::{Side, SliceAxis};

/// Raster engine implemented on in-memory RGBA buffers
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageEngine;

impl ImageEngine {
    pub fn new() -> Self {
        Self
    }

    /// Encode as JPEG with an explicit quality setting.
    ///
    /// JPEG has no alpha channel, so the image is flattened to RGB.
    pub fn encode_jpeg(&self, image: &RgbaImage, path: &Path, quality: u8) -> Result<()> {
        let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
        let file = File::create(path).map_err(|e| EngineError::Encode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;
        let writer = BufWriter::new(file);
        rgb.write_with_encoder(JpegEncoder::new_with_quality(writer, quality))
            .map_err(|e| EngineError::Encode {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

/// All pixels of row `y` within `[x0, x1)` equal `color`
fn row_uniform(image: &RgbaImage, y: u32, x0: u32, x1: u32, color: Rgba<u8>) -> bool {
    (x0..x1).all(|x| *image.get_pixel(x, y) == color)
}

/// All pixels of column `x` within `[y0, y1)` equal `color`
fn col_uniform(image: &RgbaImage, x: u32, y0: u32, y1: u32, color: Rgba<u8>) -> bool {
    (y0..y1).all(|y| *image.get_pixel(x, y) == color)
}

impl RasterEngine for ImageEngine {
    fn decode(&self, path: &Path) -> Result<RgbaImage> {
        if !path.exists() {
            return Err(EngineError::ImageNotFound(path.to_path_buf()));
        }
        let img = image::open(path).map_err(|e| EngineError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(img.to_rgba8())
    }

    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<()> {
        let is_jpeg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));

        if is_jpeg {
            // RGBA is not a valid JPEG color type
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            rgb.save(path).map_err(|e| EngineError::Encode {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            image.save(path).map_err(|e| EngineError::Encode {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    fn sample(&self, image: &RgbaImage, x: u32, y: u32) -> Rgba<u8> {
        let (w, h) = image.dimensions();
        *image.get_pixel(x.min(w.saturating_sub(1)), y.min(h.saturating_sub(1)))
    }

    fn auto_trim(&self, image: &RgbaImage) -> RgbaImage {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return image.clone();
        }

        let bg_nw = *image.get_pixel(0, 0);
        let bg_se = *image.get_pixel(w - 1, h - 1);

        let mut top = 0u32;
        let mut bottom = h;
        let mut left = 0u32;
        let mut right = w;

        // Removing rows can expose uniform columns and vice versa, so
        // iterate until the window is stable.
        let mut changed = true;
        while changed {
            changed = false;
            while bottom - top > 1 && row_uniform(image, top, left, right, bg_nw) {
                top += 1;
                changed = true;
            }
            while bottom - top > 1 && row_uniform(image, bottom - 1, left, right, bg_se) {
                bottom -= 1;
                changed = true;
            }
            while right - left > 1 && col_uniform(image, left, top, bottom, bg_nw) {
                left += 1;
                changed = true;
            }
            while right - left > 1 && col_uniform(image, right - 1, top, bottom, bg_se) {
                right -= 1;
                changed = true;
            }
        }

        imageops::crop_imm(image, left, top, right - left, bottom - top).to_image()
    }

    fn splice(&self, image: &RgbaImage, side: Side, thickness: u32, fill: Rgba<u8>) -> RgbaImage {
        let (w, h) = image.dimensions();
        let (out_w, out_h, dst_x, dst_y) = match side {
            Side::North => (w, h + thickness, 0, thickness),
            Side::South => (w, h + thickness, 0, 0),
            Side::West => (w + thickness, h, thickness, 0),
            Side::East => (w + thickness, h, 0, 0),
        };

        let mut out = RgbaImage::from_pixel(out_w, out_h, fill);
        imageops::replace(&mut out, image, i64::from(dst_x), i64::from(dst_y));
        out
    }

    fn chop(&self, image: &RgbaImage, side: Side, thickness: u32) -> RgbaImage {
        let (w, h) = image.dimensions();
        let t = match side.axis() {
            SliceAxis::Row => thickness.min(h.saturating_sub(1)),
            SliceAxis::Column => thickness.min(w.saturating_sub(1)),
        };

        let (x, y, out_w, out_h) = match side {
            Side::North => (0, t, w, h - t),
            Side::South => (0, 0, w, h - t),
            Side::West => (t, 0, w - t, h),
            Side::East => (0, 0, w - t, h),
        };

        imageops::crop_imm(image, x, y, out_w, out_h).to_image()
    }

    fn crop_slice(&self, image: &RgbaImage, axis: SliceAxis, index: u32) -> RgbaImage {
        let (w, h) = image.dimensions();
        match axis {
            SliceAxis::Row => {
                let y = index.min(h.saturating_sub(1));
                imageops::crop_imm(image, 0, y, w, 1).to_image()
            }
            SliceAxis::Column => {
                let x = index.min(w.saturating_sub(1));
                imageops::crop_imm(image, x, 0, 1, h).to_image()
            }
        }
    }

    fn compare_exact(&self, a: &RgbaImage, b: &RgbaImage) -> bool {
        a.dimensions() == b.dimensions() && a.as_raw() == b.as_raw()
    }

    fn dimensions(&self, image: &RgbaImage) -> (u32, u32) {
        image.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);
    const BLUE: Rgba<u8> = Rgba([30, 30, 200, 255]);

    /// White canvas with a solid red block at the given offset
    fn bordered(w: u32, h: u32, x0: u32, y0: u32, bw: u32, bh: u32) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(w, h, WHITE);
        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                img.put_pixel(x, y, RED);
            }
        }
        img
    }

    #[test]
    fn test_auto_trim_uniform_border() {
        let engine = ImageEngine::new();
        let img = bordered(100, 80, 20, 10, 60, 60);
        let trimmed = engine.auto_trim(&img);
        assert_eq!(trimmed.dimensions(), (60, 60));
        assert_eq!(*trimmed.get_pixel(0, 0), RED);
    }

    #[test]
    fn test_auto_trim_no_border() {
        let engine = ImageEngine::new();
        // checkerboard: no edge row or column is uniform
        let img = RgbaImage::from_fn(10, 10, |x, y| if (x + y) % 2 == 0 { RED } else { BLUE });
        let trimmed = engine.auto_trim(&img);
        assert_eq!(trimmed.dimensions(), (10, 10));
    }

    #[test]
    fn test_auto_trim_solid_collapses_to_single_pixel() {
        let engine = ImageEngine::new();
        let img = RgbaImage::from_pixel(40, 40, WHITE);
        let trimmed = engine.auto_trim(&img);
        assert_eq!(trimmed.dimensions(), (1, 1));
        assert_eq!(*trimmed.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_auto_trim_distinct_corner_colors() {
        let engine = ImageEngine::new();
        // white border on top, blue border on bottom, red content between
        let mut img = RgbaImage::from_pixel(20, 30, RED);
        for y in 0..5 {
            for x in 0..20 {
                img.put_pixel(x, y, WHITE);
            }
        }
        for y in 25..30 {
            for x in 0..20 {
                img.put_pixel(x, y, BLUE);
            }
        }
        let trimmed = engine.auto_trim(&img);
        assert_eq!(trimmed.dimensions(), (20, 20));
        assert_eq!(*trimmed.get_pixel(0, 0), RED);
    }

    #[test]
    fn test_splice_north_and_west() {
        let engine = ImageEngine::new();
        let img = RgbaImage::from_pixel(10, 10, RED);

        let north = engine.splice(&img, Side::North, 3, BLUE);
        assert_eq!(north.dimensions(), (10, 13));
        assert_eq!(*north.get_pixel(5, 0), BLUE);
        assert_eq!(*north.get_pixel(5, 3), RED);

        let west = engine.splice(&img, Side::West, 4, BLUE);
        assert_eq!(west.dimensions(), (14, 10));
        assert_eq!(*west.get_pixel(0, 5), BLUE);
        assert_eq!(*west.get_pixel(4, 5), RED);
    }

    #[test]
    fn test_splice_south_and_east() {
        let engine = ImageEngine::new();
        let img = RgbaImage::from_pixel(10, 10, RED);

        let south = engine.splice(&img, Side::South, 2, BLUE);
        assert_eq!(south.dimensions(), (10, 12));
        assert_eq!(*south.get_pixel(5, 11), BLUE);
        assert_eq!(*south.get_pixel(5, 9), RED);

        let east = engine.splice(&img, Side::East, 2, BLUE);
        assert_eq!(east.dimensions(), (12, 10));
        assert_eq!(*east.get_pixel(11, 5), BLUE);
        assert_eq!(*east.get_pixel(9, 5), RED);
    }

    #[test]
    fn test_chop_inverts_splice() {
        let engine = ImageEngine::new();
        let img = bordered(20, 20, 5, 5, 10, 10);
        for side in Side::all() {
            let grown = engine.splice(&img, side, 3, BLUE);
            let restored = engine.chop(&grown, side, 3);
            assert!(engine.compare_exact(&img, &restored), "side {side}");
        }
    }

    #[test]
    fn test_chop_clamps_to_one_pixel() {
        let engine = ImageEngine::new();
        let img = RgbaImage::from_pixel(10, 10, RED);
        let chopped = engine.chop(&img, Side::North, 50);
        assert_eq!(chopped.dimensions(), (10, 1));
    }

    #[test]
    fn test_crop_slice_row_and_column() {
        let engine = ImageEngine::new();
        let mut img = RgbaImage::from_pixel(10, 8, WHITE);
        for x in 0..10 {
            img.put_pixel(x, 3, RED);
        }
        for y in 0..8 {
            img.put_pixel(6, y, BLUE);
        }

        let row = engine.crop_slice(&img, SliceAxis::Row, 3);
        assert_eq!(row.dimensions(), (10, 1));
        assert_eq!(*row.get_pixel(0, 0), RED);
        // crossing column overwrote x=6
        assert_eq!(*row.get_pixel(6, 0), BLUE);

        let col = engine.crop_slice(&img, SliceAxis::Column, 6);
        assert_eq!(col.dimensions(), (1, 8));
        assert_eq!(*col.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn test_compare_exact_zero_tolerance() {
        let engine = ImageEngine::new();
        let a = RgbaImage::from_pixel(5, 5, RED);
        let mut b = a.clone();
        assert!(engine.compare_exact(&a, &b));

        b.put_pixel(4, 4, Rgba([200, 30, 31, 255]));
        assert!(!engine.compare_exact(&a, &b));

        let c = RgbaImage::from_pixel(5, 6, RED);
        assert!(!engine.compare_exact(&a, &c));
    }

    #[test]
    fn test_decode_missing_file() {
        let engine = ImageEngine::new();
        let result = engine.decode(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(EngineError::ImageNotFound(_))));
    }

    #[test]
    fn test_encode_decode_roundtrip_png() {
        let engine = ImageEngine::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");

        let img = bordered(30, 30, 10, 10, 10, 10);
        engine.encode(&img, &path).unwrap();
        let back = engine.decode(&path).unwrap();
        assert!(engine.compare_exact(&img, &back));
    }

    #[test]
    fn test_encode_jpeg_flattens_alpha() {
        let engine = ImageEngine::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");

        let img = RgbaImage::from_pixel(16, 16, Rgba([200, 30, 30, 128]));
        engine.encode_jpeg(&img, &path, 90).unwrap();
        let back = engine.decode(&path).unwrap();
        assert_eq!(back.dimensions(), (16, 16));
        // decoded JPEG is opaque
        assert_eq!(back.get_pixel(8, 8).0[3], 255);
    }
}
