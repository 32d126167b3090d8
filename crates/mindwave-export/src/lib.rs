//! # MindWave Export
//!
//! Offline loop export for MindWave sessions.
//!
//! A recorded session loop arrives as a sequence of short stereo chunks.
//! This crate turns it into a WAV file of arbitrary length:
//! - **Loop assembly**: the chunks are concatenated and tiled `loop_count`
//!   times with a linear crossfade at every seam
//! - **Envelope shaping**: a raised-cosine fade-in/out so the file starts
//!   and ends in silence
//! - **Encoding**: 16 or 24-bit PCM WAV with a canonical 44-byte header
//!
//! ## Usage
//!
//! ```ignore
//! use mindwave_export::{AudioChunk, ExportBuilder, ExportFormat};
//!
//! let result = ExportBuilder::new(chunks, 44100)
//!     .format(ExportFormat::Wav16)
//!     .loop_count(10)
//!     .encode()?;
//! std::fs::write("session.wav", &result.payload)?;
//! ```
//!
//! Hosts that talk in messages can use [`ExportWorker`], which accepts
//! [`ExportRequest`]s on a dedicated thread and answers with
//! [`WorkerMessage`]s.
//!
//! ## Formats
//!
//! `wav-16`, `wav-24`, and `mp3-192` / `mp3-320`. There is no perceptual
//! encoder: mp3 requests are written as 16-bit PCM WAV with a `wav`
//! extension and `audio/wav` MIME type.

// Core modules
pub mod error;
pub mod export_builder;
mod handle;
mod options;
pub mod pipeline;
pub mod progress;
pub mod types;

// Advanced APIs
pub mod capture;
pub mod dsp;
pub mod format;
pub mod worker;

// Re-exports
pub use capture::{LoopRecorder, RecorderState};
pub use error::{ExportError, Result};
pub use export_builder::ExportBuilder;
pub use handle::{ExportHandle, ExportStatus};
pub use options::{BitDepth, ExportFormat, ExportOptions};
pub use pipeline::{run_export, ExportResult};
pub use progress::{ExportPhase, ExportProgress};
pub use types::{AssembledMaster, AudioChunk, LoopBuffer};
pub use worker::{handle_request, ExportRequest, ExportWorker, WorkerMessage};

pub use format::wav::{encode_wav_memory, parse_wav_header, WavConfig, WavHeader};

use std::path::Path;

/// Write an encoded export to disk.
///
/// A missing extension is filled in from the result; an explicit one is kept.
pub fn write_export(path: impl AsRef<Path>, result: &ExportResult) -> Result<()> {
    let path = path.as_ref();
    let path = if path.extension().is_none() {
        path.with_extension(result.extension)
    } else {
        path.to_path_buf()
    };
    std::fs::write(&path, &result.payload)?;
    log::debug!("wrote {} bytes to {}", result.payload.len(), path.display());
    Ok(())
}
