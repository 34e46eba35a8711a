pub mod batch;
pub mod convert;
pub mod formats;
pub mod normalize;
pub mod report;
pub mod resolve;

use std::path::PathBuf;

pub use batch::{BatchRunner, NullSink, ProgressSink};
pub use convert::EncodeSettings;
pub use formats::{supported_input_extensions, InputFormat, OutputFormat};
pub use report::{ConversionReport, FailureKind, Outcome, OutcomeKind, SkipReason};
pub use resolve::{PathResolver, ResolveError, WorkItem};

/// Default encoder quality for lossy targets.
pub const DEFAULT_QUALITY: u8 = 80;

/// Default source-size cap. Larger files are skipped rather than attempted.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// What to do when a derived destination filename already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Derive a unique name by tagging the source extension and, if needed,
    /// a counter: `a.webp` -> `a_jpg.webp` -> `a_jpg_1.webp`.
    Rename,
}

/// Immutable description of one conversion run.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Source file or directory. Must exist.
    pub input_path: PathBuf,
    /// Destination file (single-file input) or directory. Derived from the
    /// input when absent.
    pub output_path: Option<PathBuf>,
    pub target_format: OutputFormat,
    /// 0-100, meaningful only for lossy encodes.
    pub quality: u8,
    /// Honored only when the target format is WebP.
    pub lossless: bool,
    pub on_collision: CollisionPolicy,
    /// `None` disables the size cap.
    pub max_file_size: Option<u64>,
}

impl ConversionRequest {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            target_format: OutputFormat::Webp,
            quality: DEFAULT_QUALITY,
            lossless: false,
            on_collision: CollisionPolicy::default(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}
