//! Progress tracking for batch normalization runs

use std::fmt;

/// Processing stages for one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    /// Probing the four edges
    #[default]
    Classifying,
    /// Measuring residual borders by slice comparison
    Scanning,
    /// Computing and applying the frame geometry
    Composing,
    /// Committing the normalized file
    Writing,
    /// Done
    Completed,
}

impl ProcessingStage {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Classifying => "Classifying",
            ProcessingStage::Scanning => "Scanning",
            ProcessingStage::Composing => "Composing",
            ProcessingStage::Writing => "Writing",
            ProcessingStage::Completed => "Completed",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Summary only
    #[default]
    Normal,
    /// Per-image progress
    Verbose,
    /// Per-stage detail
    VeryVerbose,
}

impl OutputMode {
    /// Map a `-v` count to an output mode
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, OutputMode::Verbose | OutputMode::VeryVerbose)
    }
}

/// Batch run accounting
pub struct ProgressTracker;

impl ProgressTracker {
    /// Print the end-of-run summary
    pub fn print_summary(total: usize, ok: usize, skipped: usize, errors: usize) {
        println!();
        println!("=== Summary ===");
        println!("  Total:   {total}");
        println!("  OK:      {ok}");
        println!("  Skipped: {skipped}");
        println!("  Errors:  {errors}");
    }
}
