// Library exports for reuse by GUI front-ends and other applications
pub mod cli;
pub mod conversion;
pub mod progress;
pub mod utils;

// Re-export commonly used types
pub use cli::{Args, TargetFormat};
pub use conversion::{
    BatchRunner, CollisionPolicy, ConversionReport, ConversionRequest, FailureKind, Outcome,
    OutcomeKind, OutputFormat, ProgressSink, ResolveError, SkipReason,
};
pub use progress::{ConsoleSink, JsonMessage, JsonSink};
