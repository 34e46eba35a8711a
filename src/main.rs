use anyhow::Result;
use clap::Parser;
use console::style;
use std::time::Instant;

use webp_converter::cli::Args;
use webp_converter::conversion::{
    supported_input_extensions, BatchRunner, ConversionReport, ProgressSink,
};
use webp_converter::progress::{ConsoleSink, JsonSink};
use webp_converter::utils::{
    format_bytes, format_duration, validate_inputs, verbose_println, warn_ineffective_flags,
};

fn print_supported_formats() {
    println!("Supported input formats:");
    for ext in supported_input_extensions() {
        println!("  .{}", ext);
    }
}

fn print_summary(report: &ConversionReport, elapsed: std::time::Duration) {
    println!();
    println!("{}", style("Results Summary:").bold().green());
    println!("  Total files: {}", style(report.total()).bold());
    println!("  Converted: {}", style(report.converted()).bold().green());
    if report.failed() > 0 {
        println!("  Failed: {}", style(report.failed()).bold().red());
    }
    if report.skipped() > 0 {
        println!("  Skipped: {}", style(report.skipped()).bold().yellow());
    }
    if report.bytes_written() > 0 {
        println!(
            "  Bytes written: {}",
            style(format_bytes(report.bytes_written())).bold()
        );
    }
    println!("  Elapsed: {}", style(format_duration(elapsed)).dim());

    if report.failed() > 0 {
        println!();
        println!("{}", style("Errors encountered:").bold().red());
        for (i, outcome) in report.failures().enumerate() {
            if let webp_converter::conversion::OutcomeKind::Failed { kind, message } =
                &outcome.kind
            {
                println!(
                    "  {}: {} - {}: {}",
                    style(format!("#{}", i + 1)).dim(),
                    style(outcome.source.display()).bold().red(),
                    kind,
                    message
                );
            }
        }
    }
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let args = Args::parse();

    if args.formats {
        print_supported_formats();
        return Ok(());
    }

    if !args.json_progress {
        println!("{}", style("WebP Image Converter").bold().blue());
        println!();
    }

    validate_inputs(&args)?;
    warn_ineffective_flags(&args);

    let request = args.to_request();
    if args.verbose && !args.json_progress {
        verbose_println(true, &format!("Input: {}", request.input_path.display()));
        verbose_println(
            true,
            &format!(
                "Output: {}",
                request
                    .output_path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(derived from input)".to_string())
            ),
        );
        verbose_println(true, &format!("Target format: {}", request.target_format));
        verbose_println(
            true,
            &format!("Quality: {} (lossless: {})", request.quality, request.lossless),
        );
    }

    let runner = BatchRunner::new(args.jobs)?;
    verbose_println(
        args.verbose && !args.json_progress,
        &format!("Parallel jobs: {}", runner.jobs()),
    );

    let sink: Box<dyn ProgressSink> = if args.json_progress {
        Box::new(JsonSink::new())
    } else {
        Box::new(ConsoleSink::new())
    };

    let report = runner.run(&request, sink.as_ref())?;

    if !args.json_progress {
        print_summary(&report, start_time.elapsed());
    }

    if report.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
