//! PCM WAV encoder
//!
//! Writes the canonical 44-byte RIFF/WAVE header (format tag 1, no
//! extensible chunk) followed by interleaved little-endian frames, at 16 or
//! 24 bits per sample.

use crate::error::{ExportError, Result};
use crate::options::BitDepth;

/// Size of the RIFF + `fmt ` + `data` headers preceding the samples
pub const WAV_HEADER_LEN: usize = 44;

const FORMAT_TAG_PCM: u16 = 1;

/// WAV encoder configuration
#[derive(Debug, Clone)]
pub struct WavConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bit depth
    pub bit_depth: BitDepth,
    /// Number of channels (always 2 for exports)
    pub channels: u16,
}

impl Default for WavConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: BitDepth::Int16,
            channels: 2,
        }
    }
}

impl WavConfig {
    /// Create a new WAV config for stereo output
    pub fn stereo(sample_rate: u32, bit_depth: BitDepth) -> Self {
        Self {
            sample_rate,
            bit_depth,
            channels: 2,
        }
    }

    pub fn block_align(&self) -> Result<u16> {
        self.channels
            .checked_mul(self.bit_depth.bytes_per_sample() as u16)
            .ok_or_else(|| {
                ExportError::Encoding(format!("{} channels overflow the frame size", self.channels))
            })
    }

    /// Fails when the rate does not fit the 32-bit header field.
    pub fn byte_rate(&self) -> Result<u32> {
        self.sample_rate
            .checked_mul(self.block_align()? as u32)
            .ok_or_else(|| {
                ExportError::Encoding(format!(
                    "sample rate {} Hz overflows the WAV byte rate field",
                    self.sample_rate
                ))
            })
    }
}

/// Decoded header fields of a canonical PCM WAV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Number of frames declared by the `data` chunk
    pub fn frames(&self) -> usize {
        if self.block_align == 0 {
            0
        } else {
            self.data_size as usize / self.block_align as usize
        }
    }
}

/// Encode stereo audio to WAV in memory
///
/// # Arguments
/// * `left` - Left channel samples (normalized -1.0 to 1.0)
/// * `right` - Right channel samples (normalized -1.0 to 1.0)
/// * `config` - WAV configuration
///
/// # Returns
/// WAV file bytes
pub fn encode_wav_memory(left: &[f32], right: &[f32], config: &WavConfig) -> Result<Vec<u8>> {
    encode_wav_with_progress(left, right, config, usize::MAX, |_, _| {})
}

/// Encode stereo audio to WAV in memory, calling `on_progress(frame, total)`
/// at every frame index divisible by `interval`.
pub fn encode_wav_with_progress(
    left: &[f32],
    right: &[f32],
    config: &WavConfig,
    interval: usize,
    on_progress: impl Fn(usize, usize),
) -> Result<Vec<u8>> {
    if left.len() != right.len() {
        return Err(ExportError::InvalidData(
            "Left and right channels have different lengths".into(),
        ));
    }
    if config.channels != 2 {
        return Err(ExportError::InvalidOptions(format!(
            "only stereo export is supported, got {} channels",
            config.channels
        )));
    }

    let frames = left.len();
    let block_align = config.block_align()?;
    let byte_rate = config.byte_rate()?;
    let data_size = data_size(frames, block_align)?;

    let mut buffer = Vec::new();
    buffer.try_reserve_exact(WAV_HEADER_LEN + data_size as usize)?;
    write_header(&mut buffer, config, block_align, byte_rate, data_size);

    let interval = interval.max(1);
    for i in 0..frames {
        let (l, r) = (left[i], right[i]);
        if l.is_nan() || r.is_nan() {
            return Err(ExportError::InvalidData(format!(
                "sample at frame {i} is not a number"
            )));
        }

        match config.bit_depth {
            BitDepth::Int16 => {
                buffer.extend_from_slice(&float_to_i16(l).to_le_bytes());
                buffer.extend_from_slice(&float_to_i16(r).to_le_bytes());
            }
            BitDepth::Int24 => {
                buffer.extend_from_slice(&float_to_i24(l).to_le_bytes()[..3]);
                buffer.extend_from_slice(&float_to_i24(r).to_le_bytes()[..3]);
            }
        }

        if i % interval == 0 {
            on_progress(i, frames);
        }
    }

    Ok(buffer)
}

/// Parse and validate the 44-byte header of a canonical PCM WAV file
pub fn parse_wav_header(bytes: &[u8]) -> Result<WavHeader> {
    if bytes.len() < WAV_HEADER_LEN {
        return Err(ExportError::InvalidData(format!(
            "WAV data is {} bytes, shorter than the {WAV_HEADER_LEN}-byte header",
            bytes.len()
        )));
    }

    let tag = |offset: usize, expected: &[u8; 4]| -> Result<()> {
        if &bytes[offset..offset + 4] == expected {
            Ok(())
        } else {
            Err(ExportError::InvalidData(format!(
                "expected `{}` at byte {offset}",
                String::from_utf8_lossy(expected)
            )))
        }
    };
    let u16_at = |offset: usize| u16::from_le_bytes([bytes[offset], bytes[offset + 1]]);
    let u32_at = |offset: usize| {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    };

    tag(0, b"RIFF")?;
    tag(8, b"WAVE")?;
    tag(12, b"fmt ")?;
    if u32_at(16) != 16 {
        return Err(ExportError::InvalidData(format!(
            "unexpected fmt chunk size {}",
            u32_at(16)
        )));
    }
    tag(36, b"data")?;

    Ok(WavHeader {
        riff_size: u32_at(4),
        format_tag: u16_at(20),
        channels: u16_at(22),
        sample_rate: u32_at(24),
        byte_rate: u32_at(28),
        block_align: u16_at(32),
        bits_per_sample: u16_at(34),
        data_size: u32_at(40),
    })
}

fn data_size(frames: usize, block_align: u16) -> Result<u32> {
    frames
        .checked_mul(block_align as usize)
        .and_then(|size| u32::try_from(size).ok())
        .filter(|size| size.checked_add(36).is_some())
        .ok_or_else(|| {
            ExportError::Encoding(format!(
                "{frames} frames exceed the 4 GiB WAV size limit"
            ))
        })
}

fn write_header(
    buffer: &mut Vec<u8>,
    config: &WavConfig,
    block_align: u16,
    byte_rate: u32,
    data_size: u32,
) {
    buffer.extend_from_slice(b"RIFF");
    buffer.extend_from_slice(&(36 + data_size).to_le_bytes());
    buffer.extend_from_slice(b"WAVE");

    buffer.extend_from_slice(b"fmt ");
    buffer.extend_from_slice(&16u32.to_le_bytes());
    buffer.extend_from_slice(&FORMAT_TAG_PCM.to_le_bytes());
    buffer.extend_from_slice(&config.channels.to_le_bytes());
    buffer.extend_from_slice(&config.sample_rate.to_le_bytes());
    buffer.extend_from_slice(&byte_rate.to_le_bytes());
    buffer.extend_from_slice(&block_align.to_le_bytes());
    buffer.extend_from_slice(&config.bit_depth.bits().to_le_bytes());

    buffer.extend_from_slice(b"data");
    buffer.extend_from_slice(&data_size.to_le_bytes());
}

/// Convert float sample to 16-bit integer with clipping.
///
/// Negative values scale by 32768 and positive ones by 32767, truncating
/// toward zero.
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0) as f64;
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// Convert float sample to 24-bit integer (stored as i32) with clipping
#[inline]
pub fn float_to_i24(sample: f32) -> i32 {
    let clamped = sample.clamp(-1.0, 1.0) as f64;
    if clamped < 0.0 {
        (clamped * 8388608.0) as i32
    } else {
        (clamped * 8388607.0) as i32
    }
}
