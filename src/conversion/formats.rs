use std::path::Path;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Input formats the pipeline will attempt to decode (closed set).
///
/// Extension matching is case-insensitive. Anything outside this set found
/// during a directory scan is reported as skipped rather than silently
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum InputFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
    Gif,
    Ico,
    Pnm,
}

impl InputFormat {
    /// Map a file extension (without the dot) to an input format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tiff" | "tif" => Some(Self::Tiff),
            "gif" => Some(Self::Gif),
            "ico" => Some(Self::Ico),
            "ppm" | "pgm" | "pbm" | "pnm" => Some(Self::Pnm),
            _ => None,
        }
    }

    /// All extensions recognized for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::Bmp => &["bmp"],
            Self::Tiff => &["tiff", "tif"],
            Self::Gif => &["gif"],
            Self::Ico => &["ico"],
            Self::Pnm => &["ppm", "pgm", "pbm", "pnm"],
        }
    }
}

/// Output formats the pipeline can encode (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Webp,
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Extension used when deriving destination filenames.
    pub fn canonical_extension(&self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Whether the encoder accepts an alpha channel. Drives the
    /// normalization policy: non-alpha destinations get transparent pixels
    /// composited onto white.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Self::Webp | Self::Png | Self::Tiff)
    }

    /// Whether `quality` has any effect for this format.
    pub fn has_lossy_mode(&self) -> bool {
        matches!(self, Self::Webp | Self::Jpeg)
    }
}

/// Sorted list of every recognized input extension, for `--formats` output
/// and help text.
pub fn supported_input_extensions() -> Vec<&'static str> {
    let mut extensions: Vec<&'static str> = InputFormat::iter()
        .flat_map(|format| format.extensions().iter().copied())
        .collect();
    extensions.sort_unstable();
    extensions
}

/// Check whether a path carries a recognized input extension.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(InputFormat::from_extension)
        .is_some()
}
