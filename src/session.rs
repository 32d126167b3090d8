//! MindWaveSession that owns loop capture and hands takes to the exporter

use crate::export::{AudioChunk, ExportBuilder, ExportOptions, LoopRecorder, RecorderState};
use crate::{Error, Result};

/// A recording session: capture one loop, then export it as often as needed.
///
/// The session keeps the most recent take. Starting a new recording discards
/// it; `close()` discards it and ends the session, after which every call
/// fails with [`Error::Session`].
///
/// # Example
///
/// ```ignore
/// use mindwave::prelude::*;
///
/// let mut session = MindWaveSession::builder().sample_rate(44100).build()?;
///
/// session.record()?;
/// session.capture(&left, &right)?;
/// session.stop_recording()?;
///
/// session.export()?
///     .format(ExportFormat::Wav24)
///     .loop_count(10)
///     .to_file("session.wav")?;
/// ```
#[derive(Debug)]
pub struct MindWaveSession {
    sample_rate: u32,
    options: ExportOptions,
    recorder: LoopRecorder,
    /// Last finished take, in capture order
    take: Option<Vec<AudioChunk>>,
    closed: bool,
}

impl MindWaveSession {
    /// Create a new session builder
    pub fn builder() -> crate::MindWaveSessionBuilder {
        crate::MindWaveSessionBuilder::default()
    }

    pub(crate) fn from_parts(sample_rate: u32, recorder: LoopRecorder, options: ExportOptions) -> Self {
        Self {
            sample_rate,
            options,
            recorder,
            take: None,
            closed: false,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.state() == RecorderState::Recording
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn has_take(&self) -> bool {
        self.take.is_some()
    }

    /// Start capturing a new loop, discarding the previous take.
    pub fn record(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.recorder.start()?;
        self.take = None;
        Ok(())
    }

    /// Feed a block of planar stereo frames into the current recording.
    pub fn capture(&mut self, left: &[f32], right: &[f32]) -> Result<()> {
        self.ensure_open()?;
        self.recorder.push(left, right)?;
        Ok(())
    }

    /// Feed a block of interleaved stereo frames into the current recording.
    pub fn capture_interleaved(&mut self, samples: &[f32]) -> Result<()> {
        self.ensure_open()?;
        self.recorder.push_interleaved(samples)?;
        Ok(())
    }

    /// Finish the recording and keep it as the current take.
    ///
    /// Returns the number of chunks in the take.
    pub fn stop_recording(&mut self) -> Result<usize> {
        self.ensure_open()?;
        let chunks = self.recorder.stop()?;
        let count = chunks.len();
        log::info!(
            "take captured: {} chunks, {:.2}s",
            count,
            self.recorder.captured_frames() as f64 / self.sample_rate as f64
        );
        self.take = Some(chunks);
        Ok(count)
    }

    /// # Example
    /// ```ignore
    /// // Ten loops of the current take, 16-bit
    /// session.export()?.loop_count(10).to_file("loop.wav")?;
    ///
    /// // Background export with progress polling
    /// let handle = session.export()?.format(ExportFormat::Wav24).start()?;
    /// ```
    pub fn export(&self) -> Result<ExportBuilder> {
        self.ensure_open()?;
        let take = self
            .take
            .as_ref()
            .ok_or_else(|| Error::Session("no recorded take to export".into()))?;
        Ok(ExportBuilder::new(take.clone(), self.sample_rate).options(self.options.clone()))
    }

    /// End the session. The take and any recording in progress are dropped.
    pub fn close(&mut self) {
        if !self.closed {
            log::debug!("session closed");
        }
        self.recorder.reset();
        self.take = None;
        self.closed = true;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::Session("session is closed".into()))
        } else {
            Ok(())
        }
    }
}
