//! Raised-cosine fade-in/out over the edges of the assembled master.

use crate::options::ExportOptions;
use crate::types::AssembledMaster;
use std::f64::consts::PI;

/// Edge fade length for a buffer of `total_len` frames.
///
/// Never more than half the buffer, so the head and tail ramps stay disjoint.
pub fn edge_fade_len(total_len: usize, options: &ExportOptions) -> usize {
    let proportional = (total_len as f64 * options.edge_fade_ratio).floor() as usize;
    options
        .edge_fade_max_samples
        .min(proportional)
        .min(total_len / 2)
}

/// Multiply the leading frames by a half-Hann ramp 0 → 1 and the trailing
/// frames by the mirrored ramp, so the first and last frames are silent.
pub fn apply_edge_fades(master: &mut AssembledMaster, options: &ExportOptions) {
    let total = master.len();
    let fade_len = edge_fade_len(total, options);
    if fade_len == 0 {
        return;
    }

    for i in 0..fade_len {
        let t = i as f64 / fade_len as f64;
        let gain = (0.5 * (1.0 - (PI * t).cos())) as f32;
        let tail = total - 1 - i;

        master.left[i] *= gain;
        master.right[i] *= gain;
        master.left[tail] *= gain;
        master.right[tail] *= gain;
    }
}
