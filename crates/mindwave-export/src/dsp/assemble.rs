//! Loop tiling with linear crossfades at every seam.

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::progress::{scaled_percent, ExportPhase, ExportProgress};
use crate::types::{AssembledMaster, AudioChunk, LoopBuffer};

/// Crossfade window in samples: `crossfade_seconds` of audio, never more
/// than half a loop.
pub fn overlap_len(loop_len: usize, sample_rate: u32, crossfade_seconds: f64) -> usize {
    let proposed = (crossfade_seconds * sample_rate as f64).floor() as usize;
    proposed.min(loop_len / 2)
}

/// `loop_count * loop_len - (loop_count - 1) * overlap`
pub fn assembled_len(loop_len: usize, loop_count: u32, overlap: usize) -> Result<usize> {
    let count = loop_count as usize;
    let overflow = || {
        ExportError::Encoding(format!(
            "{count} loops of {loop_len} samples exceed the addressable buffer size"
        ))
    };
    let total = loop_len.checked_mul(count).ok_or_else(overflow)?;
    let shared = count.saturating_sub(1).checked_mul(overlap).ok_or_else(overflow)?;
    Ok(total - shared)
}

/// Reject requests that cannot produce a loop, before anything is allocated.
pub(crate) fn validate_request(chunks: &[AudioChunk], loop_count: u32, sample_rate: u32) -> Result<()> {
    if chunks.is_empty() {
        return Err(ExportError::InvalidData("no audio chunks to export".into()));
    }
    if loop_count == 0 {
        return Err(ExportError::InvalidOptions(
            "loop count must be at least 1".into(),
        ));
    }
    if sample_rate == 0 {
        return Err(ExportError::InvalidOptions(
            "sample rate must be positive".into(),
        ));
    }
    if chunks.iter().all(AudioChunk::is_empty) {
        return Err(ExportError::InvalidData(
            "captured loop contains no samples".into(),
        ));
    }
    Ok(())
}

/// Tile the concatenated chunks `loop_count` times.
///
/// Consecutive loops are placed `loop_len - overlap` samples apart and summed
/// into a zeroed buffer. Inside an overlap the outgoing loop is weighted by a
/// linear ramp 1 → 0 and the incoming loop 0 → 1, so the two weights sum to 1.
/// The first loop has no fade-in and the last no fade-out; with a single loop
/// the output is the loop itself.
pub fn assemble(
    chunks: &[AudioChunk],
    loop_count: u32,
    sample_rate: u32,
    options: &ExportOptions,
    on_progress: &impl Fn(ExportProgress),
) -> Result<AssembledMaster> {
    options.validate()?;
    validate_request(chunks, loop_count, sample_rate)?;

    let single = LoopBuffer::from_chunks(chunks);
    let loop_len = single.len();
    let overlap = overlap_len(loop_len, sample_rate, options.crossfade_seconds);
    let stride = loop_len - overlap;
    let final_len = assembled_len(loop_len, loop_count, overlap)?;

    log::debug!(
        "loop assembly: loop_len={} loop_count={} overlap={} final_len={} duration={:.2}s",
        loop_len,
        loop_count,
        overlap,
        final_len,
        final_len as f64 / sample_rate as f64
    );

    let mut master = AssembledMaster::silent(final_len)?;
    let loop_count = loop_count as usize;
    let fade_out_start = loop_len - overlap;

    for k in 0..loop_count {
        let start = k * stride;
        let fade_in = k > 0;
        let fade_out = k + 1 < loop_count;

        let dest_l = &mut master.left[start..start + loop_len];
        let dest_r = &mut master.right[start..start + loop_len];

        for i in 0..loop_len {
            let mut weight = 1.0f32;
            if fade_in && i < overlap {
                weight = i as f32 / overlap as f32;
            }
            // Both ramps apply when a short loop's windows touch.
            if fade_out && i >= fade_out_start {
                let rel = (i - fade_out_start) as f32;
                weight *= 1.0 - rel / overlap as f32;
            }
            dest_l[i] += single.left()[i] * weight;
            dest_r[i] += single.right()[i] * weight;
        }

        if k % options.loop_progress_stride == 0 || k + 1 == loop_count {
            on_progress(ExportProgress::new(
                ExportPhase::Building,
                format!("Loop {}/{}", k + 1, loop_count),
                scaled_percent(15, 30, k + 1, loop_count),
            ));
        }
    }

    Ok(master)
}
