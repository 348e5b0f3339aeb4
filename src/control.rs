//! Pitch and loudness control.
//!
//! Converts a target MIDI note into a playback-rate ratio for the wavetable
//! cursor, relative to the native note and sample rate of the recording.
//! Pitch changes are either applied at the start of the next buffer or glide
//! to the target linearly in rate over a fixed window (legato portamento).

use crate::utils::units::semitones_to_ratio;

#[derive(Debug)]
pub struct PitchLoudnessController {
    native_note: f32,
    /// Correction for the wavetable being recorded at a different sample
    /// rate than the output stream.
    rate_scale: f32,
    current_ratio: f32,
    target_ratio: f32,
    glide_increment: f32,
    glide_samples: usize,
    loudness: f32,
}

impl PitchLoudnessController {
    pub fn new(
        native_note: f32,
        native_sample_rate: f32,
        output_sample_rate: f32,
        glide_samples: usize,
    ) -> Self {
        let rate_scale = native_sample_rate / output_sample_rate;
        Self {
            native_note,
            rate_scale,
            current_ratio: rate_scale,
            target_ratio: rate_scale,
            glide_increment: 0.0,
            glide_samples: glide_samples.max(1),
            loudness: 1.0,
        }
    }

    /// Sets the target note. With `glide` the rate ratio interpolates over
    /// the configured glide window; without it the new rate takes effect at
    /// the next rendered sample.
    pub fn set_pitch(&mut self, note: f32, glide: bool) {
        self.target_ratio = semitones_to_ratio(note - self.native_note) * self.rate_scale;
        if glide {
            self.glide_increment =
                (self.target_ratio - self.current_ratio) / (self.glide_samples as f32);
        } else {
            self.current_ratio = self.target_ratio;
            self.glide_increment = 0.0;
        }
    }

    /// Sets the scalar gain applied to the rendered output.
    pub fn set_loudness(&mut self, gain: f32) {
        self.loudness = gain;
    }

    pub fn loudness(&self) -> f32 {
        self.loudness
    }

    /// Playback-rate ratio at the last rendered sample.
    pub fn ratio(&self) -> f32 {
        self.current_ratio
    }

    /// Advances any in-progress glide by one sample and returns the
    /// instantaneous rate ratio.
    #[inline]
    pub fn next_ratio(&mut self) -> f32 {
        if self.glide_increment != 0.0 {
            self.current_ratio += self.glide_increment;
            let reached = if self.glide_increment > 0.0 {
                self.current_ratio >= self.target_ratio
            } else {
                self.current_ratio <= self.target_ratio
            };
            if reached {
                self.current_ratio = self.target_ratio;
                self.glide_increment = 0.0;
            }
        }
        self.current_ratio
    }
}
