//! Raster engine abstraction
//!
//! The border pipeline is pure decision logic; every pixel-level
//! primitive it needs (decode, encode, sampling, exact-match trim,
//! splice, chop, slice extraction, exact comparison) is expressed
//! through the [`RasterEngine`] trait. [`ImageEngine`] is the default
//! implementation backed by the `image` crate.

mod raster;

pub use raster::ImageEngine;

use crate::border::{Side, SliceAxis};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Raster engine error types
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Pixel-level capability surface consumed by the border pipeline.
///
/// Geometry operations return a new image; callers own sequencing and
/// commit semantics. All comparisons are exact: a single differing
/// pixel (including alpha) counts as different.
pub trait RasterEngine: Sync {
    /// Load an image from disk into RGBA form
    fn decode(&self, path: &Path) -> Result<RgbaImage>;

    /// Write an image to disk; the format follows the file extension
    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<()>;

    /// Read one pixel, including transparency
    fn sample(&self, image: &RgbaImage, x: u32, y: u32) -> Rgba<u8>;

    /// Remove uniform solid-color margins by exact color match.
    ///
    /// The border color for each edge is the adjacent corner pixel:
    /// top-left for the north and west edges, bottom-right for the
    /// south and east edges. An edge row or column is stripped only
    /// while it is uniformly that color. Never trims below 1x1; a
    /// fully uniform image collapses to a single background pixel.
    fn auto_trim(&self, image: &RgbaImage) -> RgbaImage;

    /// Add a strip of `fill` pixels, `thickness` deep, to one side
    fn splice(&self, image: &RgbaImage, side: Side, thickness: u32, fill: Rgba<u8>) -> RgbaImage;

    /// Remove `thickness` pixels from one side, clamped to keep at
    /// least one row/column
    fn chop(&self, image: &RgbaImage, side: Side, thickness: u32) -> RgbaImage;

    /// Extract one row or column as a 1-pixel-thick image
    fn crop_slice(&self, image: &RgbaImage, axis: SliceAxis, index: u32) -> RgbaImage;

    /// Pixel-identical test with zero tolerance
    fn compare_exact(&self, a: &RgbaImage, b: &RgbaImage) -> bool;

    /// Image width and height
    fn dimensions(&self, image: &RgbaImage) -> (u32, u32);
}
