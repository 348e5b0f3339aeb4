//! Musical unit conversions.

#[allow(unused_imports)]
use num_traits::float::Float;

/// Frequency ratio corresponding to an interval in semitones.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    2.0_f32.powf(semitones / 12.0)
}
