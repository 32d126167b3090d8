//! Export options.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested export format.
///
/// `Mp3` requests are accepted but no perceptual codec exists: they are
/// written as 16-bit PCM WAV. The extension and MIME type always describe
/// the bytes actually produced, only the progress step names mention MP3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Wav16,
    Wav24,
    Mp3 { bitrate_kbps: u32 },
}

impl ExportFormat {
    /// Bit depth the encoder writes for this format.
    pub fn bit_depth(&self) -> BitDepth {
        match self {
            ExportFormat::Wav24 => BitDepth::Int24,
            ExportFormat::Wav16 | ExportFormat::Mp3 { .. } => BitDepth::Int16,
        }
    }

    /// File extension (without dot).
    pub fn extension(&self) -> &'static str {
        "wav"
    }

    pub fn mime_type(&self) -> &'static str {
        "audio/wav"
    }

    /// Whether this request degrades to PCM.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ExportFormat::Mp3 { .. })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wav-16" => Ok(ExportFormat::Wav16),
            "wav-24" => Ok(ExportFormat::Wav24),
            "mp3-192" => Ok(ExportFormat::Mp3 { bitrate_kbps: 192 }),
            "mp3-320" => Ok(ExportFormat::Mp3 { bitrate_kbps: 320 }),
            other => Err(ExportError::UnsupportedFormat(format!(
                "{other} (supported: wav-16, wav-24, mp3-192, mp3-320)"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Wav16 => f.write_str("wav-16"),
            ExportFormat::Wav24 => f.write_str("wav-24"),
            ExportFormat::Mp3 { bitrate_kbps } => write!(f, "mp3-{bitrate_kbps}"),
        }
    }
}

/// PCM bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitDepth {
    #[default]
    Int16,
    Int24,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            BitDepth::Int16 => 2,
            BitDepth::Int24 => 3,
        }
    }
}

/// Tuning for the assembly, fade and progress stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Seam crossfade window, capped at half a loop.
    pub crossfade_seconds: f64,
    /// Upper bound for the edge fade, in samples.
    pub edge_fade_max_samples: usize,
    /// Edge fade length as a fraction of the assembled length.
    pub edge_fade_ratio: f64,
    /// Frames between encoder progress events.
    pub progress_interval_frames: usize,
    /// Loops between assembler progress events.
    pub loop_progress_stride: usize,
    /// Capacity of the progress channel used by background exports.
    pub progress_channel_capacity: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            crossfade_seconds: 0.2,
            edge_fade_max_samples: 8800,
            edge_fade_ratio: 0.1,
            progress_interval_frames: 50_000,
            loop_progress_stride: 5,
            progress_channel_capacity: 64,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.crossfade_seconds.is_finite() || self.crossfade_seconds < 0.0 {
            return Err(ExportError::InvalidOptions(format!(
                "crossfade_seconds must be a non-negative number, got {}",
                self.crossfade_seconds
            )));
        }
        // Fade-in and fade-out regions must never overlap.
        if !self.edge_fade_ratio.is_finite() || !(0.0..=0.5).contains(&self.edge_fade_ratio) {
            return Err(ExportError::InvalidOptions(format!(
                "edge_fade_ratio must be within 0.0..=0.5, got {}",
                self.edge_fade_ratio
            )));
        }
        if self.progress_interval_frames == 0 {
            return Err(ExportError::InvalidOptions(
                "progress_interval_frames must be at least 1".into(),
            ));
        }
        if self.loop_progress_stride == 0 {
            return Err(ExportError::InvalidOptions(
                "loop_progress_stride must be at least 1".into(),
            ));
        }
        if self.progress_channel_capacity == 0 {
            return Err(ExportError::InvalidOptions(
                "progress_channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
