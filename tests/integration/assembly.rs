//! Loop assembly integration tests
//!
//! Lengths follow `N·L − (N−1)·overlap` with `overlap = min(floor(sr·0.2), floor(L/2))`.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use mindwave::prelude::*;
use proptest::prelude::*;

fn render(chunks: Vec<AudioChunk>, loop_count: u32, sample_rate: u32) -> (Vec<f32>, Vec<f32>) {
    ExportBuilder::new(chunks, sample_rate)
        .loop_count(loop_count)
        .render()
        .expect("render failed")
        .into_channels()
}

/// 3 × 0.1 s chunks at 44.1 kHz, three loops.
#[test]
fn test_three_loops_of_three_chunks() {
    let (left, right) = render(dc_chunks(3, 4410, 0.5, -0.5), 3, 44100);
    // L = 13230, overlap = min(8820, 6615) = 6615
    assert_eq!(left.len(), 26460);
    assert_eq!(right.len(), 26460);
}

/// A single loop is the concatenated input, apart from the edge fades.
#[test]
fn test_single_loop_matches_input() {
    let left_in = generate_sine(200.0, 44100.0, 13230);
    let right_in = generate_sine(210.0, 44100.0, 13230);
    let chunks = split_into_chunks(&left_in, &right_in, 4410);

    let (left, right) = render(chunks, 1, 44100);
    assert_eq!(left.len(), 13230);

    // edge fade = min(8800, 1323)
    let fade = 1323;
    assert_signals_equal(
        &left[fade..13230 - fade],
        &left_in[fade..13230 - fade],
        FLOAT_EPSILON,
        "left interior",
    );
    assert_signals_equal(
        &right[fade..13230 - fade],
        &right_in[fade..13230 - fade],
        FLOAT_EPSILON,
        "right interior",
    );
}

/// A loop shorter than the crossfade window overlaps by half itself.
#[test]
fn test_short_loop_overlaps_by_half() {
    let (left, _) = render(dc_chunks(1, 100, 0.3, 0.3), 2, 44100);
    assert_eq!(left.len(), 150);
}

/// Constant input stays constant across every seam.
#[test]
fn test_crossfade_weights_sum_to_one() {
    let (left, right) = render(dc_chunks(4, 1000, 0.5, -0.25), 3, 1000);
    // L = 4000, overlap = 200, total = 11600, edge fade = 1160
    assert_eq!(left.len(), 11600);
    let interior = 1160..11600 - 1160;

    for i in interior {
        assert!(
            (left[i] - 0.5).abs() <= FLOAT_EPSILON,
            "left dips to {} at {}",
            left[i],
            i
        );
        assert!(
            (right[i] + 0.25).abs() <= FLOAT_EPSILON,
            "right dips to {} at {}",
            right[i],
            i
        );
    }
}

#[test]
fn test_edges_are_silent() {
    let noise = generate_noise(8000, 7);
    let chunks = split_into_chunks(&noise, &noise, 800);
    let (left, right) = render(chunks, 5, 8000);

    for channel in [&left, &right] {
        assert_eq!(channel[0], 0.0);
        assert_eq!(channel[channel.len() - 1], 0.0);
        assert_is_silent(&channel[..1], SILENCE_THRESHOLD, "first frame");
    }
}

#[test]
fn test_fades_never_boost() {
    let (left, _) = render(dc_chunks(2, 500, 0.8, 0.8), 2, 1000);
    assert!(peak(&left) <= 0.8 + FLOAT_EPSILON);
    assert_not_silent(&left, 0.79, "faded master");
}

#[test]
fn test_invalid_requests_fail() {
    let empty: Vec<AudioChunk> = Vec::new();
    assert!(ExportBuilder::new(empty, 44100).render().is_err());
    assert!(ExportBuilder::new(dc_chunks(1, 10, 0.0, 0.0), 44100)
        .loop_count(0)
        .render()
        .is_err());
    assert!(ExportBuilder::new(dc_chunks(2, 0, 0.0, 0.0), 44100)
        .render()
        .is_err());
}

proptest! {
    #[test]
    fn prop_assembled_length(
        lengths in prop::collection::vec(0usize..400, 1..5),
        loop_count in 1u32..6,
        sample_rate in prop::sample::select(vec![100u32, 1000, 8000, 44100]),
    ) {
        let loop_len: usize = lengths.iter().sum();
        prop_assume!(loop_len > 0);

        let chunks: Vec<AudioChunk> = lengths
            .iter()
            .map(|&n| AudioChunk::mono(generate_dc(0.1, n)))
            .collect();
        let (left, right) = render(chunks, loop_count, sample_rate);

        let overlap = ((sample_rate as f64 * 0.2).floor() as usize).min(loop_len / 2);
        let n = loop_count as usize;
        let expected = n * loop_len - (n - 1) * overlap;
        prop_assert_eq!(left.len(), expected);
        prop_assert_eq!(right.len(), expected);
    }
}
