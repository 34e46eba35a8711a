use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::conversion::{CollisionPolicy, ConversionRequest, OutputFormat, DEFAULT_QUALITY};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TargetFormat {
    /// WebP (default; only format with a lossless switch)
    #[value(name = "webp")]
    Webp,
    /// PNG (always lossless, keeps alpha)
    #[value(name = "png")]
    Png,
    /// JPEG (lossy, no alpha; transparency is composited onto white)
    #[value(name = "jpg", alias = "jpeg")]
    Jpeg,
    /// BMP (no alpha)
    #[value(name = "bmp")]
    Bmp,
    /// TIFF (keeps alpha)
    #[value(name = "tiff", alias = "tif")]
    Tiff,
}

impl From<TargetFormat> for OutputFormat {
    fn from(format: TargetFormat) -> Self {
        match format {
            TargetFormat::Webp => OutputFormat::Webp,
            TargetFormat::Png => OutputFormat::Png,
            TargetFormat::Jpeg => OutputFormat::Jpeg,
            TargetFormat::Bmp => OutputFormat::Bmp,
            TargetFormat::Tiff => OutputFormat::Tiff,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "webp-converter",
    about = "Convert raster images to WebP (and other formats), one file or a whole directory",
    long_about = "
WebP Image Converter

Converts single image files or entire directories to WebP (or PNG, JPEG, BMP,
TIFF). Transparency is composited onto a white background for formats that
cannot represent it. Every discovered file is accounted for in the final
report as converted, failed, or skipped.

Example Usage:
  # Convert a single file next to the source
  webp-converter image.jpg

  # Convert with a custom output name
  webp-converter image.jpg -o output.webp

  # Convert every supported image in a directory into ./converted
  webp-converter ~/Pictures -o ./converted

  # Lossless WebP at full fidelity
  webp-converter image.png --lossless

  # JPEG output at quality 90, keeping existing files untouched
  webp-converter ~/Pictures -f jpg -q 90 --rename-existing

  # Machine-readable progress for wrapping GUIs or scripts
  webp-converter ~/Pictures --json-progress

  # List supported input formats
  webp-converter --formats"
)]
pub struct Args {
    /// Input image file or directory of images
    #[arg(value_name = "INPUT", required_unless_present = "formats")]
    pub input: Option<PathBuf>,

    /// Output file (for a single input file) or directory (for a directory
    /// input); derived from the input when omitted
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Target output format
    #[arg(short = 'f', long = "format", default_value = "webp")]
    pub format: TargetFormat,

    /// Encoder quality for lossy targets (0-100)
    #[arg(
        short = 'q',
        long = "quality",
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(0..=100),
        value_name = "N"
    )]
    pub quality: u8,

    /// Use lossless compression (WebP only; ignored for other formats)
    #[arg(long = "lossless")]
    pub lossless: bool,

    /// Rename the destination instead of overwriting an existing file
    #[arg(long = "rename-existing")]
    pub rename_existing: bool,

    /// Skip source files larger than this many megabytes (0 = no limit)
    #[arg(long = "max-size", default_value_t = 50, value_name = "MB")]
    pub max_size_mb: u64,

    /// Number of parallel conversion jobs (0 = auto-detect CPU cores)
    #[arg(short = 'j', long = "jobs", default_value_t = 0, value_name = "N")]
    pub jobs: usize,

    /// Enable verbose output with per-file diagnostics
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Emit progress as JSON lines on stdout (suppresses normal output)
    #[arg(long = "json-progress")]
    pub json_progress: bool,

    /// Show supported input formats and exit
    #[arg(long = "formats")]
    pub formats: bool,
}

impl Args {
    /// Build the immutable request the pipeline consumes.
    pub fn to_request(&self) -> ConversionRequest {
        let mut request = ConversionRequest::new(self.input.clone().unwrap_or_default());
        request.output_path = self.output.clone();
        request.target_format = self.format.into();
        request.quality = self.quality;
        request.lossless = self.lossless;
        request.on_collision = if self.rename_existing {
            CollisionPolicy::Rename
        } else {
            CollisionPolicy::Overwrite
        };
        request.max_file_size = match self.max_size_mb {
            0 => None,
            mb => Some(mb * 1024 * 1024),
        };
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["webp-converter", "photo.jpg"]);
        assert_eq!(args.format, TargetFormat::Webp);
        assert_eq!(args.quality, 80);
        assert!(!args.lossless);
        assert!(!args.rename_existing);
        assert_eq!(args.max_size_mb, 50);
        assert_eq!(args.jobs, 0);
    }

    #[test]
    fn test_quality_range_enforced() {
        assert!(Args::try_parse_from(["webp-converter", "photo.jpg", "-q", "120"]).is_err());
        assert!(Args::try_parse_from(["webp-converter", "photo.jpg", "-q", "100"]).is_ok());
        assert!(Args::try_parse_from(["webp-converter", "photo.jpg", "-q", "0"]).is_ok());
    }

    #[test]
    fn test_format_aliases() {
        let args = parse(&["webp-converter", "photo.png", "-f", "jpeg"]);
        assert_eq!(args.format, TargetFormat::Jpeg);
        let args = parse(&["webp-converter", "photo.png", "-f", "tif"]);
        assert_eq!(args.format, TargetFormat::Tiff);
    }

    #[test]
    fn test_input_required_unless_formats() {
        assert!(Args::try_parse_from(["webp-converter"]).is_err());
        assert!(Args::try_parse_from(["webp-converter", "--formats"]).is_ok());
    }

    #[test]
    fn test_to_request_maps_flags() {
        let args = parse(&[
            "webp-converter",
            "photo.jpg",
            "-o",
            "out.webp",
            "--lossless",
            "--rename-existing",
            "--max-size",
            "10",
        ]);
        let request = args.to_request();
        assert_eq!(request.input_path, PathBuf::from("photo.jpg"));
        assert_eq!(request.output_path, Some(PathBuf::from("out.webp")));
        assert!(request.lossless);
        assert_eq!(request.on_collision, CollisionPolicy::Rename);
        assert_eq!(request.max_file_size, Some(10 * 1024 * 1024));
    }

    #[test]
    fn test_max_size_zero_disables_cap() {
        let args = parse(&["webp-converter", "photo.jpg", "--max-size", "0"]);
        assert_eq!(args.to_request().max_file_size, None);
    }

    #[test]
    fn test_default_request_constants() {
        let args = parse(&["webp-converter", "photo.jpg"]);
        let request = args.to_request();
        assert_eq!(request.quality, DEFAULT_QUALITY);
        assert_eq!(
            request.max_file_size,
            Some(crate::conversion::DEFAULT_MAX_FILE_SIZE)
        );
    }
}
