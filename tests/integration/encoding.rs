//! WAV encoding integration tests
//!
//! Payloads are decoded with hound, not with the crate's own header parser,
//! wherever sample values are checked.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use mindwave::export::{parse_wav_header, WavHeader};
use mindwave::prelude::*;

fn sine_chunks(frames: usize) -> Vec<AudioChunk> {
    let left: Vec<f32> = generate_sine(200.0, 8000.0, frames)
        .into_iter()
        .map(|s| s * 0.8)
        .collect();
    let right: Vec<f32> = generate_sine(207.5, 8000.0, frames)
        .into_iter()
        .map(|s| s * -0.8)
        .collect();
    split_into_chunks(&left, &right, 800)
}

fn export(chunks: Vec<AudioChunk>, format: ExportFormat, loop_count: u32) -> ExportResult {
    ExportBuilder::new(chunks, 8000)
        .format(format)
        .loop_count(loop_count)
        .encode()
        .expect("export failed")
}

/// Two silent frames at 44.1 kHz: a bare header plus eight zero bytes.
#[test]
fn test_two_silent_frames() {
    let chunk = AudioChunk::stereo(vec![0.0; 2], vec![0.0; 2]).unwrap();
    let result = ExportBuilder::new(vec![chunk], 44100).encode().unwrap();

    assert_eq!(result.payload.len(), 52);
    assert!(result.payload[44..].iter().all(|&b| b == 0));
    assert_eq!(&result.payload[0..4], b"RIFF");
    assert_eq!(&result.payload[8..16], b"WAVEfmt ");
    assert_eq!(&result.payload[36..40], b"data");
}

#[test]
fn test_header_sizes_16_bit() {
    let result = export(sine_chunks(4000), ExportFormat::Wav16, 3);
    let n = result.frames as u32;
    let header: WavHeader = parse_wav_header(&result.payload).unwrap();

    assert_eq!(header.riff_size, 36 + n * 4);
    assert_eq!(header.data_size, n * 4);
    assert_eq!(header.format_tag, 1);
    assert_eq!(header.channels, 2);
    assert_eq!(header.sample_rate, 8000);
    assert_eq!(header.byte_rate, 8000 * 4);
    assert_eq!(header.block_align, 4);
    assert_eq!(header.bits_per_sample, 16);
    assert_eq!(result.payload.len(), 44 + n as usize * 4);
}

#[test]
fn test_header_sizes_24_bit() {
    let result = export(sine_chunks(4000), ExportFormat::Wav24, 2);
    let n = result.frames as u32;
    let header = parse_wav_header(&result.payload).unwrap();

    assert_eq!(header.riff_size, 36 + n * 6);
    assert_eq!(header.data_size, n * 6);
    assert_eq!(header.byte_rate, 8000 * 6);
    assert_eq!(header.block_align, 6);
    assert_eq!(header.bits_per_sample, 24);
}

/// Decoded 16-bit samples land within one step of the rendered master.
#[test]
fn test_16_bit_round_trip_with_hound() {
    let chunks = sine_chunks(4000);
    let master = ExportBuilder::new(chunks.clone(), 8000)
        .loop_count(2)
        .render()
        .unwrap();
    let result = export(chunks, ExportFormat::Wav16, 2);

    let decoded = decode_wav(&result.payload).unwrap();
    assert_eq!(decoded.spec.bits_per_sample, 16);
    assert_eq!(decoded.spec.sample_rate, 8000);
    assert_eq!(decoded.left.len(), master.len());

    for (channel, source) in [(&decoded.left, master.left()), (&decoded.right, master.right())] {
        for (i, (&pcm, &sample)) in channel.iter().zip(source).enumerate() {
            let diff = (pcm_to_float(pcm, 16) - sample as f64).abs();
            assert!(diff <= INT16_LSB, "frame {}: diff {} exceeds one step", i, diff);
        }
    }
}

#[test]
fn test_24_bit_round_trip_with_hound() {
    let chunks = sine_chunks(2400);
    let master = ExportBuilder::new(chunks.clone(), 8000).render().unwrap();
    let result = export(chunks, ExportFormat::Wav24, 1);

    let decoded = decode_wav(&result.payload).unwrap();
    assert_eq!(decoded.spec.bits_per_sample, 24);

    for (i, (&pcm, &sample)) in decoded.left.iter().zip(master.left()).enumerate() {
        let diff = (pcm_to_float(pcm, 24) - sample as f64).abs();
        assert!(diff <= INT24_LSB, "frame {}: diff {} exceeds one step", i, diff);
    }
}

#[test]
fn test_full_scale_clamps() {
    let chunk = AudioChunk::stereo(vec![1.5; 20], vec![-3.0; 20]).unwrap();
    let options = ExportOptions {
        edge_fade_ratio: 0.0,
        ..Default::default()
    };
    let result = ExportBuilder::new(vec![chunk], 1000)
        .options(options)
        .encode()
        .unwrap();

    let decoded = decode_wav(&result.payload).unwrap();
    assert!(decoded.left.iter().all(|&s| s == 32767));
    assert!(decoded.right.iter().all(|&s| s == -32768));
}

/// mp3 requests produce the same bytes as a 16-bit WAV export.
#[test]
fn test_mp3_requests_fall_back_to_pcm() {
    let wav = export(sine_chunks(1600), ExportFormat::Wav16, 2);

    for name in ["mp3-192", "mp3-320"] {
        let format: ExportFormat = name.parse().unwrap();
        let mp3 = export(sine_chunks(1600), format, 2);
        assert_eq!(mp3.payload, wav.payload, "{} payload", name);
        assert_eq!(mp3.extension, "wav");
        assert_eq!(mp3.mime_type, "audio/wav");
        assert_eq!(mp3.bit_depth, BitDepth::Int16);
    }
}

#[test]
fn test_result_metadata() {
    let result = export(sine_chunks(4000), ExportFormat::Wav24, 4);
    // L = 4000, overlap = min(1600, 2000), total = 4·4000 − 3·1600
    assert_eq!(result.frames, 11200);
    approx::assert_relative_eq!(result.duration_seconds, 1.4);
    assert_eq!(result.extension, "wav");
    assert!(result.processing_time_seconds >= 0.0);
}

#[test]
fn test_nan_sample_fails_export() {
    let mut left = generate_dc(0.2, 100);
    left[50] = f32::NAN;
    let chunk = AudioChunk::stereo(left, generate_dc(0.2, 100)).unwrap();
    let err = ExportBuilder::new(vec![chunk], 1000).encode().unwrap_err();
    assert!(err.to_string().contains("not a number"));
}
