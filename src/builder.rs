//! Builder for configuring and constructing a `MindWaveSession`.

use crate::export::capture::DEFAULT_CHUNK_SECONDS;
use crate::export::{ExportOptions, LoopRecorder};
use crate::{Error, MindWaveSession, Result};

/// The sample rate is fixed for the lifetime of the session: every captured
/// chunk and every export uses it.
///
/// # Example
///
/// ```ignore
/// use mindwave::prelude::*;
///
/// let mut session = MindWaveSession::builder()
///     .sample_rate(48000)
///     .crossfade_seconds(0.25)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct MindWaveSessionBuilder {
    sample_rate: u32,
    chunk_seconds: f64,
    options: ExportOptions,
}

impl Default for MindWaveSessionBuilder {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            chunk_seconds: DEFAULT_CHUNK_SECONDS,
            options: ExportOptions::default(),
        }
    }
}

impl MindWaveSessionBuilder {
    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Length of each captured chunk. Default: 0.1
    pub fn chunk_seconds(mut self, seconds: f64) -> Self {
        self.chunk_seconds = seconds;
        self
    }

    pub fn options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn crossfade_seconds(mut self, seconds: f64) -> Self {
        self.options.crossfade_seconds = seconds;
        self
    }

    pub fn build(self) -> Result<MindWaveSession> {
        if self.sample_rate == 0 {
            return Err(Error::Session("sample rate must be positive".into()));
        }
        if !self.chunk_seconds.is_finite() || self.chunk_seconds <= 0.0 {
            return Err(Error::Session(format!(
                "chunk length must be a positive number of seconds, got {}",
                self.chunk_seconds
            )));
        }
        self.options.validate()?;

        let recorder = LoopRecorder::with_chunk_duration(self.sample_rate, self.chunk_seconds)?;
        log::debug!(
            "session ready: {} Hz, {} frames per chunk",
            self.sample_rate,
            recorder.chunk_frames()
        );
        Ok(MindWaveSession::from_parts(
            self.sample_rate,
            recorder,
            self.options,
        ))
    }
}
