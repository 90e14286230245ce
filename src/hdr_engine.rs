//! HDR Engine - end-to-end burst processing
//!
//! Provides:
//! - In-memory pipeline: merge -> tone map
//! - File pipeline: decode -> merge -> tone map -> JPEG encode
//! - JSON config and report types shared with the JVM side

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use serde::{Deserialize, Serialize};

use crate::error::{ImagingError, Result};
use crate::frame::Frame;
use crate::merge_engine::merge_exposures;
use crate::tone_engine::{tone_map_in_place, SigmoidCurve};

/// Per-call pipeline configuration, passed as JSON from the JVM
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HdrConfig {
    pub tone_map: bool,
    pub contrast: f32,
    pub midpoint: f32,
    pub jpeg_quality: u8,
}

impl Default for HdrConfig {
    fn default() -> Self {
        let curve = SigmoidCurve::default();
        Self {
            tone_map: true,
            contrast: curve.contrast,
            midpoint: curve.midpoint,
            jpeg_quality: 95,
        }
    }
}

impl HdrConfig {
    /// Parse config JSON; a blank string means defaults
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(ImagingError::InvalidConfig(format!(
                "contrast must be positive, got {}",
                self.contrast
            )));
        }
        if !(0.0..=1.0).contains(&self.midpoint) {
            return Err(ImagingError::InvalidConfig(format!(
                "midpoint must be within [0, 1], got {}",
                self.midpoint
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ImagingError::InvalidConfig(format!(
                "jpegQuality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    pub fn curve(&self) -> SigmoidCurve {
        SigmoidCurve::new(self.contrast, self.midpoint)
    }
}

/// Summary returned to the caller as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdrReport {
    pub width: usize,
    pub height: usize,
    pub frames_merged: usize,
    pub frames_skipped: usize,
    pub frames_unreadable: usize,
    pub tone_mapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// HDR processing engine
pub struct HdrEngine;

impl HdrEngine {
    /// Merge a burst and optionally tone map the result
    pub fn process_frames(frames: &[Frame], config: &HdrConfig) -> Result<(Frame, HdrReport)> {
        config.validate()?;

        let outcome = merge_exposures(frames)?;
        let mut frame = outcome.frame;
        if config.tone_map {
            tone_map_in_place(&mut frame, &config.curve());
        }

        let report = HdrReport {
            width: frame.width,
            height: frame.height,
            frames_merged: outcome.merged,
            frames_skipped: outcome.skipped,
            frames_unreadable: 0,
            tone_mapped: config.tone_map,
            output: None,
        };
        Ok((frame, report))
    }

    /// Decode image files, process them, and write the result as JPEG
    pub fn process_files<P: AsRef<Path>>(
        inputs: &[P],
        output: &Path,
        config: &HdrConfig,
    ) -> Result<HdrReport> {
        config.validate()?;

        let mut frames = Vec::with_capacity(inputs.len());
        let mut unreadable = 0;
        for input in inputs {
            let path = input.as_ref();
            match Self::decode_file(path) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    log::warn!("Skipping unreadable frame {}: {}", path.display(), e);
                    unreadable += 1;
                }
            }
        }

        let (frame, mut report) = Self::process_frames(&frames, config)?;
        Self::write_jpeg(&frame, output, config.jpeg_quality)?;

        report.frames_unreadable = unreadable;
        report.output = Some(output.display().to_string());
        log::info!(
            "HDR written to {} ({}x{}, {} merged)",
            output.display(), report.width, report.height, report.frames_merged
        );
        Ok(report)
    }

    pub fn decode_file(path: &Path) -> Result<Frame> {
        let image = image::open(path)?.to_rgb8();
        Frame::from_rgb_image(&image)
    }

    /// Encode in memory first so a failed encode never leaves a partial file at `path`
    pub fn write_jpeg(frame: &Frame, path: &Path, quality: u8) -> Result<()> {
        let image = frame.to_rgb_image()?;
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, quality).encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgb8,
        )?;
        fs::write(path, encoded)?;
        Ok(())
    }
}
