//! Per-image normalization pipeline
//!
//! Runs classify → compose → commit for a single image. The stages
//! operate on an in-memory working copy; nothing is written until the
//! full correction set has been computed, and the final encode goes to
//! a temporary file that is renamed into place only on success. The
//! destination is therefore always either fully normalized or
//! byte-identical to the input, never half-framed.
//!
//! Failures abort the remaining stages for that image and are not
//! retried: the operations are deterministic, a retry would reproduce
//! the same failure.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::border::{BorderClassifier, BorderError, BorderKind, FrameComposer};
use crate::config::Config;
use crate::engine::{EngineError, ImageEngine, RasterEngine};
use crate::exit_codes;
use crate::progress::ProcessingStage;
use crate::recode::PhotoClassifier;

/// Normalization error types
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Border(#[from] BorderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to commit {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NormalizeError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NormalizeError::InputNotFound(_) => exit_codes::INPUT_NOT_FOUND,
            NormalizeError::Border(BorderError::Workspace(_)) => exit_codes::RESOURCE_ERROR,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;

/// What the pipeline did with one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeAction {
    /// Border was normalized and written as-is
    Framed,
    /// Border was normalized and re-encoded as JPEG
    FramedJpeg,
    /// No border to normalize (or transparent corner); input copied
    /// unmodified
    Unchanged,
}

/// Result of processing one image
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: BorderKind,
    pub action: NormalizeAction,
}

/// Single-image normalization pipeline
pub struct NormalizePipeline {
    config: Config,
    engine: ImageEngine,
}

impl NormalizePipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            engine: ImageEngine::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Destination path for an input file, before any JPEG re-encoding
    /// decision
    pub fn output_path(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let name = input.file_name().unwrap_or_default();
        output_dir.join(name)
    }

    /// Normalize one image into `output_dir`
    pub fn process(&self, input: &Path, output_dir: &Path) -> Result<NormalizeOutcome> {
        if !input.exists() {
            return Err(NormalizeError::InputNotFound(input.to_path_buf()));
        }

        let span = tracing::info_span!("normalize", input = %input.display());
        let _guard = span.enter();

        let image = self.engine.decode(input)?;

        tracing::debug!(stage = %ProcessingStage::Classifying);
        let state = BorderClassifier::new(&self.engine).classify(&image);
        let kind = state.kind();

        tracing::debug!(stage = %ProcessingStage::Composing);
        let composer = FrameComposer::new(&self.engine, self.config.frame_width);
        let framed = composer.compose(&image, &state)?;

        match framed {
            None => {
                let output = self.output_path(input, output_dir);
                if !same_file(input, &output) {
                    std::fs::copy(input, &output)?;
                }
                tracing::info!(%kind, "left unchanged");
                Ok(NormalizeOutcome {
                    input: input.to_path_buf(),
                    output,
                    kind,
                    action: NormalizeAction::Unchanged,
                })
            }
            Some(result) => {
                let photographic = self.config.photo_recode
                    && PhotoClassifier::new(self.config.photo_color_threshold)
                        .is_photographic(&result);

                let output = if photographic {
                    self.output_path(input, output_dir).with_extension("jpg")
                } else {
                    self.output_path(input, output_dir)
                };

                tracing::debug!(stage = %ProcessingStage::Writing);
                self.commit(&result, &output, photographic)?;
                tracing::info!(%kind, output = %output.display(), "normalized");
                Ok(NormalizeOutcome {
                    input: input.to_path_buf(),
                    output,
                    kind,
                    action: if photographic {
                        NormalizeAction::FramedJpeg
                    } else {
                        NormalizeAction::Framed
                    },
                })
            }
        }
    }

    /// Encode to a temporary file next to the destination, then rename
    /// into place.
    ///
    /// The temporary file is tracked while it exists so a termination
    /// signal handler can delete it; drop-based cleanup does not run
    /// when the process is killed mid-encode.
    fn commit(&self, image: &image::RgbaImage, dest: &Path, as_jpeg: bool) -> Result<()> {
        let dir = dest.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));

        let ext = dest
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_string();

        let tmp = tempfile::Builder::new()
            .prefix(".framenorm-")
            .suffix(&format!(".{ext}"))
            .tempfile_in(dir)?;
        let tmp_path = tmp.into_temp_path();

        let tracked = tmp_path.to_path_buf();
        PENDING_OUTPUTS.track(&tracked);

        let result = (|| -> Result<()> {
            if as_jpeg {
                self.engine
                    .encode_jpeg(image, &tmp_path, self.config.jpeg_quality)?;
            } else {
                self.engine.encode(image, &tmp_path)?;
            }

            tmp_path.persist(dest).map_err(|e| NormalizeError::Commit {
                path: dest.to_path_buf(),
                source: e.error,
            })?;
            Ok(())
        })();

        PENDING_OUTPUTS.untrack(&tracked);
        result
    }
}

// ============ Signal-Safe Temp File Tracking ============

/// In-flight temporary output files, by path
struct PendingOutputs {
    paths: Mutex<Vec<PathBuf>>,
}

impl PendingOutputs {
    const fn new() -> Self {
        Self {
            paths: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
        self.paths.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn track(&self, path: &Path) {
        self.lock().push(path.to_path_buf());
    }

    fn untrack(&self, path: &Path) {
        self.lock().retain(|p| p != path);
    }

    fn remove_all(&self) {
        let paths = std::mem::take(&mut *self.lock());
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

static PENDING_OUTPUTS: PendingOutputs = PendingOutputs::new();

/// Delete any temporary output files still being written.
///
/// For termination-signal handlers: a killed process never runs the
/// drop-based cleanup, and a half-encoded temp file would otherwise
/// survive in the destination directory.
pub fn remove_pending_temp_files() {
    PENDING_OUTPUTS.remove_all();
}

/// Best-effort check that two paths refer to the same file
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => a == b,
    }
}
