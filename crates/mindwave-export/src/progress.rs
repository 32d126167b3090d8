//! Progress events emitted at fixed pipeline milestones.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportPhase {
    Analyzing,
    Building,
    Fading,
    EncodingWav,
    /// Only reported for mp3 requests, which still produce PCM.
    EncodingMp3,
    Finalizing,
}

impl ExportPhase {
    /// Step label carried by worker progress messages.
    pub fn label(&self) -> &'static str {
        match self {
            ExportPhase::Analyzing => "Analyzing audio",
            ExportPhase::Building => "Building audio",
            ExportPhase::Fading => "Applying fades",
            ExportPhase::EncodingWav => "Encoding WAV",
            ExportPhase::EncodingMp3 => "Encoding MP3",
            ExportPhase::Finalizing => "Finalizing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProgress {
    pub step: ExportPhase,
    pub detail: String,
    /// Overall completion (0 to 100), non-decreasing within one export.
    pub percent: u8,
}

impl ExportProgress {
    pub fn new(step: ExportPhase, detail: impl Into<String>, percent: u8) -> Self {
        Self {
            step,
            detail: detail.into(),
            percent: percent.min(100),
        }
    }
}

/// Map `done / total` of a stage onto `base..base + span` percent, rounding down.
pub(crate) fn scaled_percent(base: u8, span: u8, done: usize, total: usize) -> u8 {
    if total == 0 {
        return base;
    }
    let fraction = done as f64 / total as f64;
    (base as f64 + fraction * span as f64).floor().min(100.0) as u8
}
