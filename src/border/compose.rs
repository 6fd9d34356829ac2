//! Frame composition
//!
//! Turns a border classification into the final trim/extend geometry
//! and produces the normalized image.
//!
//! Three paths:
//!
//! - **Full border**: every side trimmable. Trim to content bounds,
//!   then add a uniform frame of the target width in the top-left
//!   corner color.
//! - **Partial border**: trim to content bounds, splice a full-width
//!   strip onto each trimmable side in that side's corner color, then
//!   measure each non-trimmable side with the slice scanner and bring
//!   it to the target width. The per-side corrections are collected as
//!   [`FrameInstruction`] records and applied in one canvas rebuild:
//!   either every side is corrected or none is.
//! - **No-op**: no trimmable side, or a fully transparent top-left
//!   pixel (no defined border color). The input is left untouched.

use image::{imageops, Rgba, RgbaImage};

use super::scan::SliceScanner;
use super::types::{BorderKind, BorderState, FrameInstruction, FrameOp, Result, Side};
use crate::engine::RasterEngine;

/// Composes the normalized frame from a border classification
pub struct FrameComposer<'e> {
    engine: &'e dyn RasterEngine,
    frame_width: u32,
}

impl<'e> FrameComposer<'e> {
    pub fn new(engine: &'e dyn RasterEngine, frame_width: u32) -> Self {
        Self {
            engine,
            frame_width,
        }
    }

    /// Compute the normalized image, or `None` when nothing should
    /// change (no border, or the transparent-corner sentinel).
    ///
    /// The input image is never mutated; commit is the caller's job.
    pub fn compose(&self, image: &RgbaImage, state: &BorderState) -> Result<Option<RgbaImage>> {
        if state.is_transparent() {
            tracing::debug!("transparent corner, skipping normalization");
            return Ok(None);
        }

        match state.kind() {
            BorderKind::NoBorder => Ok(None),
            BorderKind::FullBorder => Ok(Some(self.frame_uniform(image, state))),
            BorderKind::PartialBorder => self.frame_per_side(image, state).map(Some),
        }
    }

    /// Full-border path: one trim, one uniform frame
    fn frame_uniform(&self, image: &RgbaImage, state: &BorderState) -> RgbaImage {
        let trimmed = self.engine.auto_trim(image);
        Side::all().iter().fold(trimmed, |img, &side| {
            self.engine.splice(&img, side, self.frame_width, state.corner_nw)
        })
    }

    /// Partial-border path: splice trimmable sides, scan and correct
    /// the rest
    fn frame_per_side(&self, image: &RgbaImage, state: &BorderState) -> Result<RgbaImage> {
        // corner colors come from the state, sampled before any
        // geometry changed
        let mut work = self.engine.auto_trim(image);
        for side in Side::all() {
            if !state.verdict(side).trimmable {
                continue;
            }
            let fill = match side {
                Side::North | Side::West => state.corner_nw,
                Side::South | Side::East => state.corner_se,
            };
            work = self.engine.splice(&work, side, self.frame_width, fill);
        }

        // measure every remaining side before touching any of them
        let scanner = SliceScanner::new(self.engine, self.frame_width);
        let mut instructions = Vec::new();
        for side in Side::all() {
            if state.verdict(side).trimmable {
                continue;
            }
            let residual = scanner.measure_residual(&work, side)?;
            if residual > 0 {
                instructions.push(FrameInstruction {
                    side,
                    op: FrameOp::Chop(residual as u32),
                });
            } else if residual < 0 {
                let (w, h) = self.engine.dimensions(&work);
                let (cx, cy) = side.corner(w, h);
                instructions.push(FrameInstruction {
                    side,
                    op: FrameOp::Extend {
                        thickness: residual.unsigned_abs() as u32,
                        fill: self.engine.sample(&work, cx, cy),
                    },
                });
            }
        }

        Ok(apply_instructions(&work, &instructions))
    }
}

/// Apply all corrections in a single canvas rebuild.
///
/// The target geometry is computed up front from the instruction set
/// and the output is materialized in one pass, so there is no
/// intermediate state with some sides resized and others not.
pub fn apply_instructions(image: &RgbaImage, instructions: &[FrameInstruction]) -> RgbaImage {
    if instructions.is_empty() {
        return image.clone();
    }

    let (w, h) = image.dimensions();
    let mut chop = SideAmounts::default();
    let mut extend = SideAmounts::default();
    let mut fills: [Option<Rgba<u8>>; 4] = [None; 4];

    for inst in instructions {
        let slot = inst.side.index();
        match inst.op {
            FrameOp::Chop(t) => chop.0[slot] += t,
            FrameOp::Extend { thickness, fill } => {
                extend.0[slot] += thickness;
                fills[slot] = Some(fill);
            }
        }
    }

    // clamp chops so the source window keeps at least one pixel
    let src_y0 = chop.get(Side::North).min(h.saturating_sub(1));
    let src_y1 = h - chop.get(Side::South).min(h - 1 - src_y0);
    let src_x0 = chop.get(Side::West).min(w.saturating_sub(1));
    let src_x1 = w - chop.get(Side::East).min(w - 1 - src_x0);

    let core_w = src_x1 - src_x0;
    let core_h = src_y1 - src_y0;
    let out_w = core_w + extend.get(Side::West) + extend.get(Side::East);
    let out_h = core_h + extend.get(Side::North) + extend.get(Side::South);

    let mut out = RgbaImage::new(out_w, out_h);

    // fill rows first, then columns, so vertical strips own the corners
    if let Some(fill) = fills[Side::North.index()] {
        fill_rect(&mut out, 0, 0, out_w, extend.get(Side::North), fill);
    }
    if let Some(fill) = fills[Side::South.index()] {
        let t = extend.get(Side::South);
        fill_rect(&mut out, 0, out_h - t, out_w, t, fill);
    }
    if let Some(fill) = fills[Side::West.index()] {
        fill_rect(&mut out, 0, 0, extend.get(Side::West), out_h, fill);
    }
    if let Some(fill) = fills[Side::East.index()] {
        let t = extend.get(Side::East);
        fill_rect(&mut out, out_w - t, 0, t, out_h, fill);
    }

    let core = imageops::crop_imm(image, src_x0, src_y0, core_w, core_h).to_image();
    imageops::replace(
        &mut out,
        &core,
        i64::from(extend.get(Side::West)),
        i64::from(extend.get(Side::North)),
    );
    out
}

/// Per-side pixel amounts in [North, South, East, West] order
#[derive(Debug, Default, Clone, Copy)]
struct SideAmounts([u32; 4]);

impl SideAmounts {
    fn get(&self, side: Side) -> u32 {
        self.0[side.index()]
    }
}

fn fill_rect(image: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, fill: Rgba<u8>) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            image.put_pixel(x, y, fill);
        }
    }
}
