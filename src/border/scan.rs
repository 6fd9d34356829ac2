//! Residual border measurement by slice comparison
//!
//! Some borders fail the coarse trim probe even though they are
//! visually a border: a thin repeating pattern instead of a flat
//! matte. For those sides the scanner measures how deep the
//! repetition runs by decomposing the image into 1-pixel row or
//! column slices, ordered from the edge inward, and counting how many
//! consecutive slices are pixel-identical to their predecessor.
//! Comparison is exact: a single differing pixel ends the run.
//!
//! Slices are materialized into a scoped temporary directory and
//! compared through the engine's decode/compare primitives. The
//! workspace is a mandatory scoped resource: it is acquired before any
//! slice is written and recursively deleted on every exit path,
//! including unwinding, via [`tempfile::TempDir`].
//!
//! The returned residual is signed: `count - frame_width`. Positive
//! means the side still carries too much border and should be chopped;
//! negative means it is short and should be extended.

use image::RgbaImage;
use std::path::Path;

use super::types::{BorderError, Result, Side};
use crate::engine::RasterEngine;

/// Measures residual border thickness on non-trimmable sides
pub struct SliceScanner<'e> {
    engine: &'e dyn RasterEngine,
    frame_width: u32,
}

impl<'e> SliceScanner<'e> {
    pub fn new(engine: &'e dyn RasterEngine, frame_width: u32) -> Self {
        Self {
            engine,
            frame_width,
        }
    }

    /// Signed correction needed to bring `side` to exactly the target
    /// frame width.
    ///
    /// A side whose first slice already differs from its neighbor
    /// yields `0 - frame_width`: the full frame must be added.
    pub fn measure_residual(&self, image: &RgbaImage, side: Side) -> Result<i64> {
        let workspace = tempfile::tempdir().map_err(BorderError::Workspace)?;
        let count = self.count_identical_slices(image, side, workspace.path())?;
        let residual = i64::from(count) - i64::from(self.frame_width);
        tracing::debug!(%side, count, residual, "slice scan");
        Ok(residual)
        // workspace dropped here: slices removed on success and error alike
    }

    /// Number of consecutive identical slice pairs, starting at the
    /// outermost slice of `side` and walking inward
    fn count_identical_slices(&self, image: &RgbaImage, side: Side, workdir: &Path) -> Result<u32> {
        let (w, h) = self.engine.dimensions(image);
        let axis = side.axis();
        let total = match axis {
            super::SliceAxis::Row => h,
            super::SliceAxis::Column => w,
        };
        if total < 2 {
            return Ok(0);
        }

        // slice order runs from the edge inward; for south and east
        // that is the reversed sequence
        let index_at = |i: u32| match side {
            Side::North | Side::West => i,
            Side::South => h - 1 - i,
            Side::East => w - 1 - i,
        };

        let mut prev = self.materialize(image, side, index_at(0), 0, workdir)?;
        let mut count = 0u32;

        for i in 1..total {
            let cur = self.materialize(image, side, index_at(i), i, workdir)?;
            if !self.engine.compare_exact(&prev, &cur) {
                break;
            }
            count += 1;
            prev = cur;
        }

        Ok(count)
    }

    /// Write one slice into the workspace and read it back
    fn materialize(
        &self,
        image: &RgbaImage,
        side: Side,
        index: u32,
        ordinal: u32,
        workdir: &Path,
    ) -> Result<RgbaImage> {
        let slice = self.engine.crop_slice(image, side.axis(), index);
        let path = workdir.join(format!("slice_{ordinal:06}.png"));
        self.engine.encode(&slice, &path)?;
        Ok(self.engine.decode(&path)?)
    }
}
