use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::{Args, TargetFormat};

/// Create the styled progress bar used for batch runs.
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Format a byte count with a binary unit suffix.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Validate command line arguments before the run starts.
pub fn validate_inputs(args: &Args) -> Result<()> {
    let input = match &args.input {
        Some(input) => input,
        None => return Err(anyhow::anyhow!("Input file or directory is required")),
    };

    if !input.exists() {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            input.display()
        ));
    }
    if !input.is_dir() && !input.is_file() {
        return Err(anyhow::anyhow!(
            "Input path is neither a file nor a directory: {}",
            input.display()
        ));
    }

    if args.jobs > 32 {
        return Err(anyhow::anyhow!(
            "Job count too high (max 32), got: {}",
            args.jobs
        ));
    }

    Ok(())
}

/// Warn when flags have no effect for the chosen target format.
pub fn warn_ineffective_flags(args: &Args) {
    if args.json_progress {
        return;
    }
    if args.lossless && args.format != TargetFormat::Webp {
        println!(
            "{} --lossless only applies to WebP output; ignoring",
            style("[WARNING]").yellow().bold()
        );
    }
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_validate_inputs_rejects_missing_path() {
        let args = Args::try_parse_from(["webp-converter", "/no/such/input.jpg"]).unwrap();
        assert!(validate_inputs(&args).is_err());
    }

    #[test]
    fn test_validate_inputs_rejects_excessive_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        std::fs::write(&source, b"stub").unwrap();
        let args = Args::try_parse_from([
            "webp-converter",
            source.to_str().unwrap(),
            "-j",
            "64",
        ])
        .unwrap();
        assert!(validate_inputs(&args).is_err());
    }

    #[test]
    fn test_validate_inputs_accepts_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        std::fs::write(&source, b"stub").unwrap();
        let args =
            Args::try_parse_from(["webp-converter", source.to_str().unwrap()]).unwrap();
        assert!(validate_inputs(&args).is_ok());
    }
}
