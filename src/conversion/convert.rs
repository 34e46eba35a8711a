use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use super::formats::OutputFormat;
use super::normalize::normalize;
use super::report::{FailureKind, Outcome};
use super::resolve::WorkItem;

/// Encoder parameters shared by every item in a run.
#[derive(Debug, Clone, Copy)]
pub struct EncodeSettings {
    pub target: OutputFormat,
    /// 0-100, meaningful only for formats with a lossy mode.
    pub quality: u8,
    /// Honored only for WebP; silently ignored elsewhere.
    pub lossless: bool,
}

/// Convert one work item: decode, normalize, encode, write.
///
/// Never returns an error; every failure mode is classified into the
/// outcome. Pre-tagged skip items bypass the codec entirely.
pub fn convert(item: &WorkItem, settings: &EncodeSettings) -> Outcome {
    if let Some(reason) = item.skip {
        return Outcome::skipped(item.source.clone(), reason);
    }

    let image = match image::open(&item.source) {
        Ok(image) => image,
        Err(e) => {
            return Outcome::failed(item.source.clone(), FailureKind::Decode, e.to_string())
        }
    };

    let image = normalize(image, settings.target);

    let encoded = match encode(&image, settings) {
        Ok(bytes) => bytes,
        Err(e) => {
            return Outcome::failed(item.source.clone(), FailureKind::Write, format!("{:#}", e))
        }
    };

    if let Err(e) = write_bytes(&item.dest, &encoded) {
        return Outcome::failed(item.source.clone(), FailureKind::Write, format!("{:#}", e));
    }

    Outcome::converted(item.source.clone(), item.dest.clone(), encoded.len() as u64)
}

/// Encode a normalized image to in-memory bytes for the target format.
pub fn encode(image: &DynamicImage, settings: &EncodeSettings) -> Result<Vec<u8>> {
    match settings.target {
        OutputFormat::Webp => {
            let encoder = webp::Encoder::from_image(image)
                .map_err(|e| anyhow!("webp encoder rejected image: {}", e))?;
            let memory = if settings.lossless {
                encoder.encode_lossless()
            } else {
                encoder.encode(settings.quality as f32)
            };
            Ok(memory.to_vec())
        }
        OutputFormat::Jpeg => {
            let mut buffer = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut buffer, settings.quality);
            image
                .write_with_encoder(encoder)
                .context("jpeg encoding failed")?;
            Ok(buffer)
        }
        OutputFormat::Png | OutputFormat::Bmp | OutputFormat::Tiff => {
            let format = match settings.target {
                OutputFormat::Png => ImageFormat::Png,
                OutputFormat::Bmp => ImageFormat::Bmp,
                _ => ImageFormat::Tiff,
            };
            let mut cursor = Cursor::new(Vec::new());
            image
                .write_to(&mut cursor, format)
                .with_context(|| format!("{:?} encoding failed", format))?;
            Ok(cursor.into_inner())
        }
    }
}

fn write_bytes(dest: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(dest, bytes).with_context(|| format!("failed to write {}", dest.display()))
}
