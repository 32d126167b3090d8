//! Loop capture: slices a live stereo stream into export chunks.

use crate::error::{ExportError, Result};
use crate::types::AudioChunk;

/// Default chunk length (seconds of audio per chunk)
pub const DEFAULT_CHUNK_SECONDS: f64 = 0.1;

/// Recorder lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Stopped,
}

/// Collects captured frames into fixed-size [`AudioChunk`]s.
///
/// `start()` moves `Idle → Recording`, `stop()` moves `Recording → Stopped`
/// and hands out the chunks, including a trailing partial one. A stopped
/// recorder can be started again for a fresh take.
#[derive(Debug)]
pub struct LoopRecorder {
    state: RecorderState,
    chunk_frames: usize,
    pending_left: Vec<f32>,
    pending_right: Vec<f32>,
    chunks: Vec<AudioChunk>,
    captured_frames: usize,
}

impl LoopRecorder {
    pub fn new(sample_rate: u32) -> Self {
        Self::from_chunk_frames(chunk_frames_for(sample_rate, DEFAULT_CHUNK_SECONDS))
    }

    /// Recorder cutting chunks of `seconds` each.
    ///
    /// `seconds` must be finite and positive.
    pub fn with_chunk_duration(sample_rate: u32, seconds: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ExportError::Capture(format!(
                "chunk duration must be a positive number of seconds, got {seconds}"
            )));
        }
        Ok(Self::from_chunk_frames(chunk_frames_for(sample_rate, seconds)))
    }

    // Pending buffers grow with the pushed blocks, not with the chunk size.
    fn from_chunk_frames(chunk_frames: usize) -> Self {
        Self {
            state: RecorderState::Idle,
            chunk_frames,
            pending_left: Vec::new(),
            pending_right: Vec::new(),
            chunks: Vec::new(),
            captured_frames: 0,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn chunk_frames(&self) -> usize {
        self.chunk_frames
    }

    /// Frames captured in the current take
    pub fn captured_frames(&self) -> usize {
        self.captured_frames
    }

    pub fn start(&mut self) -> Result<()> {
        if self.state == RecorderState::Recording {
            return Err(ExportError::Capture("recording already in progress".into()));
        }
        self.reset();
        self.state = RecorderState::Recording;
        log::debug!("loop capture started ({} frames per chunk)", self.chunk_frames);
        Ok(())
    }

    /// Append a block of planar stereo frames.
    pub fn push(&mut self, left: &[f32], right: &[f32]) -> Result<()> {
        self.ensure_recording()?;
        if left.len() != right.len() {
            return Err(ExportError::Capture(format!(
                "captured block channels differ in length (left {}, right {})",
                left.len(),
                right.len()
            )));
        }

        let mut offset = 0;
        while offset < left.len() {
            let room = self.chunk_frames - self.pending_left.len();
            let take = room.min(left.len() - offset);
            self.pending_left.extend_from_slice(&left[offset..offset + take]);
            self.pending_right.extend_from_slice(&right[offset..offset + take]);
            offset += take;
            if self.pending_left.len() == self.chunk_frames {
                self.flush()?;
            }
        }
        self.captured_frames += left.len();
        Ok(())
    }

    /// Append a block of interleaved stereo frames [L, R, L, R, ...].
    pub fn push_interleaved(&mut self, samples: &[f32]) -> Result<()> {
        self.ensure_recording()?;
        let block = AudioChunk::from_interleaved(samples)
            .map_err(|e| ExportError::Capture(e.to_string()))?;
        self.push(block.left(), block.right())
    }

    /// Finish the take and return its chunks in capture order.
    pub fn stop(&mut self) -> Result<Vec<AudioChunk>> {
        self.ensure_recording()?;
        if !self.pending_left.is_empty() {
            self.flush()?;
        }
        self.state = RecorderState::Stopped;

        let chunks = std::mem::take(&mut self.chunks);
        if chunks.is_empty() {
            return Err(ExportError::Capture("no audio captured".into()));
        }
        log::debug!(
            "loop capture stopped: {} chunks, {} frames",
            chunks.len(),
            self.captured_frames
        );
        Ok(chunks)
    }

    /// Drop everything captured so far and return to `Idle`.
    pub fn reset(&mut self) {
        self.pending_left = Vec::new();
        self.pending_right = Vec::new();
        self.chunks = Vec::new();
        self.captured_frames = 0;
        self.state = RecorderState::Idle;
    }

    fn ensure_recording(&self) -> Result<()> {
        if self.state == RecorderState::Recording {
            Ok(())
        } else {
            Err(ExportError::Capture(format!(
                "recorder is {:?}, not recording",
                self.state
            )))
        }
    }

    fn flush(&mut self) -> Result<()> {
        let left = std::mem::take(&mut self.pending_left);
        let right = std::mem::take(&mut self.pending_right);
        self.chunks.push(AudioChunk::stereo(left, right)?);
        Ok(())
    }
}

fn chunk_frames_for(sample_rate: u32, seconds: f64) -> usize {
    ((sample_rate as f64 * seconds).floor() as usize).max(1)
}
