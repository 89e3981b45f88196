//! Output limiting and headroom.

/*
Mixing Down
===========

Voices are summed at full scale, so two simultaneous notes can already reach
2.0 - well past the [-1, +1] range the output device accepts. The mix-down
policy is applied ONCE, after summation:

    output = clamp(total, -1.0, +1.0) * output_scale

The hard clamp is the safety net: whatever the registry accumulated, nothing
beyond the threshold leaves the engine. The scale is the working headroom: at
0.02, even the full sixteen-key polyphony saturating the clamp stays far from
the device ceiling, and a single voice sits at a comfortable listening level.

The scale is a fixed configuration constant, never derived from the active
voice count: an adaptive gain would pump audibly as voices come and go.
*/

/// Hard limit applied to the voice sum before scaling.
pub const CLIP_THRESHOLD: f64 = 1.0;

/// Default output headroom factor. See the module notes.
pub const OUTPUT_SCALE: f64 = 0.02;

/// Clamp a mixed sample to the safety threshold.
#[inline]
pub fn limit(sample: f64) -> f64 {
    sample.clamp(-CLIP_THRESHOLD, CLIP_THRESHOLD)
}

/// Full mix-down: clamp, then scale into output headroom.
#[inline]
pub fn master(total: f64, output_scale: f64) -> f64 {
    limit(total) * output_scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_samples_pass_through() {
        assert_eq!(limit(0.5), 0.5);
        assert_eq!(limit(-0.99), -0.99);
    }

    #[test]
    fn overload_is_clamped_symmetrically() {
        assert_eq!(limit(2.0), 1.0);
        assert_eq!(limit(-7.3), -1.0);
    }

    #[test]
    fn two_saturating_voices_scenario() {
        // Two voices each contributing 1.0: clamp(2.0) * 0.02 = 0.02.
        assert_eq!(master(2.0, OUTPUT_SCALE), 0.02);
    }
}
