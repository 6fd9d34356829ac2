//! framenorm - batch border normalizer for scanned and captured images
//!
//! Detects which edges of an image carry a uniform solid-color border
//! and reframes them to a fixed target width. Clean borders are
//! trimmed and re-added uniformly; fuzzy repetitive borders are
//! measured by exact slice comparison and chopped or extended per
//! side.
//!
//! The pixel-level primitives live behind the [`RasterEngine`] trait;
//! [`ImageEngine`] is the default implementation backed by the `image`
//! crate.

pub mod border;
pub mod cli;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod progress;
pub mod recode;

pub use border::{
    apply_instructions, BorderClassifier, BorderError, BorderKind, BorderState, EdgeTrimProbe,
    FrameComposer, FrameInstruction, FrameOp, Side, SideVerdict, SliceAxis, SliceScanner,
    DEFAULT_FRAME_WIDTH,
};
pub use cli::{Cli, Commands, NormalizeArgs};
pub use config::{CliOverrides, Config, ConfigError};
pub use engine::{EngineError, ImageEngine, RasterEngine};
pub use pipeline::{
    remove_pending_temp_files, NormalizeAction, NormalizeError, NormalizeOutcome,
    NormalizePipeline,
};
pub use progress::{OutputMode, ProcessingStage, ProgressTracker};
pub use recode::{PhotoClassifier, DEFAULT_PHOTO_COLOR_THRESHOLD};

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INPUT_NOT_FOUND: i32 = 2;
    /// Scoped temporary storage could not be acquired
    pub const RESOURCE_ERROR: i32 = 3;
}
