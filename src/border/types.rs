//! Common types for border classification and framing

use image::Rgba;
use thiserror::Error;

// ============================================================
// Sides and axes
// ============================================================

/// One edge of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    /// All four sides, in probe order
    pub fn all() -> [Side; 4] {
        [Side::North, Side::South, Side::East, Side::West]
    }

    /// Position of this side in the [`Side::all`] ordering
    pub fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::South => 1,
            Side::East => 2,
            Side::West => 3,
        }
    }

    /// The facing side. Used by the trim probe to pad the far edge
    /// so an asymmetric border there cannot skew the measurement.
    pub fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::East => Side::West,
            Side::West => Side::East,
        }
    }

    /// Axis of the 1-pixel slices adjacent to this side
    pub fn axis(self) -> SliceAxis {
        match self {
            Side::North | Side::South => SliceAxis::Row,
            Side::East | Side::West => SliceAxis::Column,
        }
    }

    /// Coordinates of the corner pixel whose color defines this side's
    /// border color: top-left for North/West, bottom-right for South/East.
    pub fn corner(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Side::North | Side::West => (0, 0),
            Side::South | Side::East => (width.saturating_sub(1), height.saturating_sub(1)),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::North => "north",
            Side::South => "south",
            Side::East => "east",
            Side::West => "west",
        };
        write!(f, "{name}")
    }
}

/// Orientation of a 1-pixel slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceAxis {
    /// Horizontal strip, one pixel tall
    Row,
    /// Vertical strip, one pixel wide
    Column,
}

// ============================================================
// Classification results
// ============================================================

/// Per-side classification result
#[derive(Debug, Clone, Copy)]
pub struct SideVerdict {
    /// Which side this verdict describes
    pub side: Side,
    /// Whether an exact-match trim removes this side's margin entirely
    pub trimmable: bool,
    /// Border color sampled from the side's adjacent corner pixel
    pub border_color: Rgba<u8>,
    /// Signed correction in pixels, measured by the slice scanner.
    /// Only filled in for sides that were not cleanly trimmable.
    pub residual: Option<i64>,
}

/// Aggregate border classification over all four sides
#[derive(Debug, Clone)]
pub struct BorderState {
    /// Verdicts in [North, South, East, West] order
    pub verdicts: [SideVerdict; 4],
    /// Top-left corner color (border color for North/West)
    pub corner_nw: Rgba<u8>,
    /// Bottom-right corner color (border color for South/East)
    pub corner_se: Rgba<u8>,
}

impl BorderState {
    /// Verdict for a single side. The array is always built in
    /// [`Side::all`] order, so the lookup is positional.
    pub fn verdict(&self, side: Side) -> &SideVerdict {
        &self.verdicts[side.index()]
    }

    /// All four sides trimmable
    pub fn full(&self) -> bool {
        self.verdicts.iter().all(|v| v.trimmable)
    }

    /// At least one side trimmable. `full()` implies `any()`.
    pub fn any(&self) -> bool {
        self.verdicts.iter().any(|v| v.trimmable)
    }

    /// Fully transparent top-left corner means there is no defined
    /// border color; classification is computed but never acted on.
    pub fn is_transparent(&self) -> bool {
        self.corner_nw.0[3] == 0
    }

    /// Overall classification derived from the per-side verdicts
    pub fn kind(&self) -> BorderKind {
        if self.full() {
            BorderKind::FullBorder
        } else if self.any() {
            BorderKind::PartialBorder
        } else {
            BorderKind::NoBorder
        }
    }
}

/// Overall border classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// No side carries a trimmable border
    NoBorder,
    /// Some but not all sides carry a trimmable border
    PartialBorder,
    /// All four sides carry a trimmable border
    FullBorder,
}

impl std::fmt::Display for BorderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BorderKind::NoBorder => "none",
            BorderKind::PartialBorder => "partial",
            BorderKind::FullBorder => "full",
        };
        write!(f, "{name}")
    }
}

// ============================================================
// Frame instructions
// ============================================================

/// Geometry correction for one side.
///
/// Corrections are accumulated as explicit records and applied as a
/// single batch canvas rebuild, so an error mid-sequence can never
/// leave the image with some sides resized and others not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInstruction {
    pub side: Side,
    pub op: FrameOp,
}

/// The correction itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOp {
    /// Remove this many pixels from the side
    Chop(u32),
    /// Add this many pixels of `fill` to the side
    Extend { thickness: u32, fill: Rgba<u8> },
}

// ============================================================
// Errors
// ============================================================

/// Border pipeline error types
#[derive(Debug, Error)]
pub enum BorderError {
    /// The scoped slice workspace could not be created. Nothing has
    /// been mutated when this is reported.
    #[error("failed to acquire slice workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error(transparent)]
    Engine(#[from] crate::engine::EngineError),
}

pub type Result<T> = std::result::Result<T, BorderError>;
