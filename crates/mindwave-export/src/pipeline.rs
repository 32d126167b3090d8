//! The three-stage export pipeline: assemble, shape, encode.
//!
//! Stages run strictly in order on the calling thread. Progress milestones
//! are reported through `on_progress` and carry no control flow; a failure
//! in any stage aborts the export without producing a payload.

use crate::dsp::{apply_edge_fades, assemble, validate_request};
use crate::error::Result;
use crate::format::wav::{encode_wav_with_progress, WavConfig};
use crate::options::{BitDepth, ExportFormat, ExportOptions};
use crate::progress::{scaled_percent, ExportPhase, ExportProgress};
use crate::types::{AssembledMaster, AudioChunk};
use std::time::Instant;

/// Encoded export and its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    /// Complete WAV file bytes
    pub payload: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
    /// Format the caller asked for (may be an mp3 fallback)
    pub format: ExportFormat,
    /// Bit depth actually written
    pub bit_depth: BitDepth,
    pub frames: usize,
    pub duration_seconds: f64,
    pub processing_time_seconds: f64,
}

impl ExportResult {
    /// Processing time with two decimals, as reported to workers' callers.
    pub fn processing_time_display(&self) -> String {
        format!("{:.2}", self.processing_time_seconds)
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Assemble the loop and apply the edge fades.
pub fn render_master(
    chunks: &[AudioChunk],
    loop_count: u32,
    sample_rate: u32,
    options: &ExportOptions,
    on_progress: &impl Fn(ExportProgress),
) -> Result<AssembledMaster> {
    options.validate()?;
    validate_request(chunks, loop_count, sample_rate)?;

    on_progress(ExportProgress::new(
        ExportPhase::Building,
        format!("Assembling {loop_count}x loop"),
        15,
    ));
    let mut master = assemble(chunks, loop_count, sample_rate, options, on_progress)?;

    on_progress(ExportProgress::new(
        ExportPhase::Fading,
        "Smoothing transitions",
        50,
    ));
    apply_edge_fades(&mut master, options);

    Ok(master)
}

/// Quantize a shaped master into the container selected by `format`.
pub fn encode_master(
    master: &AssembledMaster,
    sample_rate: u32,
    format: ExportFormat,
    options: &ExportOptions,
    on_progress: &impl Fn(ExportProgress),
) -> Result<Vec<u8>> {
    let bit_depth = format.bit_depth();

    let (phase, base, span) = if format.is_fallback() {
        log::warn!("{format} requested: no perceptual encoder available, writing 16-bit PCM WAV");
        on_progress(ExportProgress::new(
            ExportPhase::EncodingMp3,
            "Initializing encoder",
            60,
        ));
        on_progress(ExportProgress::new(
            ExportPhase::EncodingMp3,
            "Converting to high-quality format",
            70,
        ));
        (ExportPhase::EncodingMp3, 70, 25)
    } else {
        let detail = match bit_depth {
            BitDepth::Int16 => "16-bit PCM",
            BitDepth::Int24 => "24-bit PCM",
        };
        on_progress(ExportProgress::new(ExportPhase::EncodingWav, detail, 60));
        (ExportPhase::EncodingWav, 60, 35)
    };

    let config = WavConfig::stereo(sample_rate, bit_depth);
    encode_wav_with_progress(
        master.left(),
        master.right(),
        &config,
        options.progress_interval_frames,
        |frame, total| {
            on_progress(ExportProgress::new(
                phase,
                format!("{}%", scaled_percent(0, 100, frame, total)),
                scaled_percent(base, span, frame, total),
            ))
        },
    )
}

/// Run a complete export.
///
/// `chunks` are consumed; the returned payload is owned by the caller and
/// nothing is retained once this returns.
pub fn run_export(
    chunks: Vec<AudioChunk>,
    format: ExportFormat,
    loop_count: u32,
    sample_rate: u32,
    options: &ExportOptions,
    on_progress: impl Fn(ExportProgress),
) -> Result<ExportResult> {
    let started = Instant::now();
    options.validate()?;
    validate_request(&chunks, loop_count, sample_rate)?;

    on_progress(ExportProgress::new(
        ExportPhase::Analyzing,
        "Calculating buffer size",
        5,
    ));

    let master = render_master(&chunks, loop_count, sample_rate, options, &on_progress)?;
    drop(chunks);

    let payload = encode_master(&master, sample_rate, format, options, &on_progress)?;

    on_progress(ExportProgress::new(
        ExportPhase::Finalizing,
        "Preparing download",
        98,
    ));

    let result = ExportResult {
        payload,
        mime_type: format.mime_type(),
        extension: format.extension(),
        format,
        bit_depth: format.bit_depth(),
        frames: master.len(),
        duration_seconds: master.duration_seconds(sample_rate),
        processing_time_seconds: started.elapsed().as_secs_f64(),
    };

    log::info!(
        "exported {} frames ({:.2}s, {} bytes) as {} in {}s",
        result.frames,
        result.duration_seconds,
        result.payload.len(),
        format,
        result.processing_time_display()
    );

    Ok(result)
}
