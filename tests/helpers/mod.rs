//! Test helpers and fixtures for MindWave integration tests
//!
//! Signals are generated deterministically and exports are decoded with
//! `hound`, independently of the encoder under test.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (passthrough, unity-sum crossfades)
//! - `INT16_LSB` / `INT24_LSB`: one quantization step of the PCM encoder
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]


use mindwave::prelude::*;
use std::io::Cursor;

/// Default test sample rate (the capture rate hosts use most)
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Capture block size used when feeding a session
pub const TEST_BLOCK_SIZE: usize = 512;

/// Create a session at the test sample rate with default export options.
pub fn test_session() -> MindWaveSession {
    MindWaveSession::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .build()
        .expect("Failed to create test session")
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate a DC offset signal (constant value).
pub fn generate_dc(value: f32, num_samples: usize) -> Vec<f32> {
    vec![value; num_samples]
}

/// Generate a linear ramp from start to end value.
pub fn generate_ramp(start: f32, end: f32, num_samples: usize) -> Vec<f32> {
    if num_samples <= 1 {
        return vec![start; num_samples];
    }
    let step = (end - start) / (num_samples - 1) as f32;
    (0..num_samples).map(|i| start + step * i as f32).collect()
}

/// Generate white noise (random samples in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Split a stereo signal into capture-sized chunks (last one may be short).
pub fn split_into_chunks(left: &[f32], right: &[f32], chunk_frames: usize) -> Vec<AudioChunk> {
    left.chunks(chunk_frames)
        .zip(right.chunks(chunk_frames))
        .map(|(l, r)| AudioChunk::stereo(l.to_vec(), r.to_vec()).expect("equal-length chunk"))
        .collect()
}

/// `count` chunks of `frames` samples each, one constant value per channel.
pub fn dc_chunks(count: usize, frames: usize, left: f32, right: f32) -> Vec<AudioChunk> {
    (0..count)
        .map(|_| {
            AudioChunk::stereo(generate_dc(left, frames), generate_dc(right, frames))
                .expect("equal-length chunk")
        })
        .collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Check if two signals are approximately equal within tolerance.
pub fn signals_approx_equal(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
}

/// Check if audio is silent (all samples below threshold).
pub fn is_silent(samples: &[f32], threshold: f32) -> bool {
    samples.iter().all(|&s| s.abs() <= threshold)
}

// =============================================================================
// Assertion Functions
// =============================================================================

/// Assert two signals are equal within tolerance, naming the first mismatch.
pub fn assert_signals_equal(a: &[f32], b: &[f32], epsilon: f32, context: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", context);
    if let Some((i, (x, y))) = a
        .iter()
        .zip(b.iter())
        .enumerate()
        .find(|(_, (x, y))| (*x - *y).abs() > epsilon)
    {
        panic!(
            "{}: Signals differ at sample {}: {} vs {} (diff={})",
            context,
            i,
            x,
            y,
            (x - y).abs()
        );
    }
}

/// Assert signal is silent within threshold.
pub fn assert_is_silent(samples: &[f32], threshold: f32, context: &str) {
    let max_val = peak(samples);
    assert!(
        max_val <= threshold,
        "{}: Expected silence (threshold {}), but peak was {}",
        context,
        threshold,
        max_val
    );
}

/// Assert signal is NOT silent (has content above threshold).
pub fn assert_not_silent(samples: &[f32], min_peak: f32, context: &str) {
    let max_val = peak(samples);
    assert!(
        max_val >= min_peak,
        "{}: Expected audio (min_peak {}), but peak was only {}",
        context,
        min_peak,
        max_val
    );
}

// =============================================================================
// WAV Decoding
// =============================================================================

/// Decoded PCM export: raw integer samples per channel.
#[derive(Debug)]
pub struct DecodedWav {
    pub spec: hound::WavSpec,
    pub left: Vec<i32>,
    pub right: Vec<i32>,
}

/// Decode an in-memory WAV payload with hound.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedWav, String> {
    let reader =
        hound::WavReader::new(Cursor::new(bytes)).map_err(|e| format!("Failed to parse WAV: {}", e))?;
    let spec = reader.spec();
    if spec.channels != 2 || spec.sample_format != hound::SampleFormat::Int {
        return Err(format!("Expected stereo integer PCM, got {:?}", spec));
    }

    let samples = reader
        .into_samples::<i32>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to read int samples: {}", e))?;

    let (left, right): (Vec<i32>, Vec<i32>) = samples.chunks(2).map(|frame| (frame[0], frame[1])).unzip();
    Ok(DecodedWav { spec, left, right })
}

/// Map a decoded integer sample back to [-1, 1] using the encoder's
/// asymmetric scale (negative full scale is one step larger).
pub fn pcm_to_float(sample: i32, bits: u16) -> f64 {
    let positive = ((1i64 << (bits - 1)) - 1) as f64;
    let negative = (1i64 << (bits - 1)) as f64;
    if sample < 0 {
        sample as f64 / negative
    } else {
        sample as f64 / positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine() {
        let samples = generate_sine(440.0, 44100.0, 44100);
        assert_eq!(samples.len(), 44100);
        // Check it's not silent
        assert!(rms(&samples) > 0.5);
        // Check it's normalized
        assert!(peak(&samples) <= 1.0);
    }

    #[test]
    fn test_split_into_chunks() {
        let chunks = split_into_chunks(&[0.0; 10], &[0.0; 10], 4);
        let lengths: Vec<usize> = chunks.iter().map(AudioChunk::len).collect();
        assert_eq!(lengths, vec![4, 4, 2]);
    }

    #[test]
    fn test_pcm_to_float_scale() {
        assert_eq!(pcm_to_float(32767, 16), 1.0);
        assert_eq!(pcm_to_float(-32768, 16), -1.0);
        assert_eq!(pcm_to_float(-8388608, 24), -1.0);
    }
}
