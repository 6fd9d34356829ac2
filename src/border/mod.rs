//! Border detection & frame normalization module
//!
//! Inspects a raster image, decides which of its four edges carry a
//! uniform solid-color border, and normalizes that border to a fixed
//! target width.
//!
//! # Components
//!
//! - [`EdgeTrimProbe`] - per-side trimmability test with opposite-side
//!   filler padding
//! - [`BorderClassifier`] - aggregates the four probes into a
//!   [`BorderState`]
//! - [`SliceScanner`] - residual measurement for fuzzy borders by
//!   exact slice comparison
//! - [`FrameComposer`] - computes and applies the final trim/extend
//!   geometry
//!
//! # Example
//!
//! ```rust,no_run
//! use framenorm::{BorderClassifier, FrameComposer, ImageEngine, RasterEngine};
//! use std::path::Path;
//!
//! let engine = ImageEngine::new();
//! let image = engine.decode(Path::new("page.png")).unwrap();
//!
//! let state = BorderClassifier::new(&engine).classify(&image);
//! let framed = FrameComposer::new(&engine, 20).compose(&image, &state).unwrap();
//!
//! if let Some(framed) = framed {
//!     engine.encode(&framed, Path::new("page_framed.png")).unwrap();
//! }
//! ```

mod classify;
mod compose;
mod probe;
mod scan;
mod types;

pub use classify::BorderClassifier;
pub use compose::{apply_instructions, FrameComposer};
pub use probe::EdgeTrimProbe;
pub use scan::SliceScanner;
pub use types::{
    BorderError, BorderKind, BorderState, FrameInstruction, FrameOp, Result, Side, SideVerdict,
    SliceAxis,
};

// ============================================================
// Constants
// ============================================================

/// Default target border thickness in pixels
pub const DEFAULT_FRAME_WIDTH: u32 = 20;
