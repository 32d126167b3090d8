//! Buffer types flowing through the export pipeline
//!
//! Captured audio enters as [`AudioChunk`]s, is flattened into one
//! [`LoopBuffer`] and leaves the assembler as an [`AssembledMaster`].
//! All buffers are planar stereo (separate left/right vectors).

use crate::error::{ExportError, Result};

/// One captured segment of stereo audio
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioChunk {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl AudioChunk {
    /// Create a stereo chunk. Both channels must have the same length.
    pub fn stereo(left: Vec<f32>, right: Vec<f32>) -> Result<Self> {
        if left.len() != right.len() {
            return Err(ExportError::InvalidData(format!(
                "chunk channels differ in length (left {}, right {})",
                left.len(),
                right.len()
            )));
        }
        Ok(Self { left, right })
    }

    /// Create a chunk from a mono capture by duplicating it into both channels
    pub fn mono(samples: Vec<f32>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    /// Create a chunk from interleaved stereo data [L, R, L, R, ...]
    pub fn from_interleaved(samples: &[f32]) -> Result<Self> {
        if samples.len() % 2 != 0 {
            return Err(ExportError::InvalidData(format!(
                "interleaved stereo data has odd length {}",
                samples.len()
            )));
        }
        let frames = samples.len() / 2;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in samples.chunks_exact(2) {
            left.push(frame[0]);
            right.push(frame[1]);
        }
        Ok(Self { left, right })
    }

    /// Length in samples (per channel)
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }
}

/// A single loop repetition: every chunk concatenated in capture order
#[derive(Debug, Clone, PartialEq)]
pub struct LoopBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl LoopBuffer {
    /// Concatenate chunks in order.
    pub fn from_chunks(chunks: &[AudioChunk]) -> Self {
        let len: usize = chunks.iter().map(AudioChunk::len).sum();
        let mut left = Vec::with_capacity(len);
        let mut right = Vec::with_capacity(len);
        for chunk in chunks {
            left.extend_from_slice(&chunk.left);
            right.extend_from_slice(&chunk.right);
        }
        Self { left, right }
    }

    /// Length in samples (per channel)
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }
}

/// The tiled, crossfaded output buffer handed to the encoder
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledMaster {
    pub(crate) left: Vec<f32>,
    pub(crate) right: Vec<f32>,
}

impl AssembledMaster {
    pub(crate) fn silent(len: usize) -> Result<Self> {
        let mut left = Vec::new();
        left.try_reserve_exact(len)?;
        left.resize(len, 0.0);
        let mut right = Vec::new();
        right.try_reserve_exact(len)?;
        right.resize(len, 0.0);
        Ok(Self { left, right })
    }

    /// Build a master directly from channel data (for encoding externally
    /// produced audio).
    pub fn from_channels(left: Vec<f32>, right: Vec<f32>) -> Result<Self> {
        if left.len() != right.len() {
            return Err(ExportError::InvalidData(
                "Left and right channels have different lengths".into(),
            ));
        }
        Ok(Self { left, right })
    }

    /// Length in frames
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Get duration in seconds
    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        self.len() as f64 / sample_rate as f64
    }

    pub fn into_channels(self) -> (Vec<f32>, Vec<f32>) {
        (self.left, self.right)
    }
}
