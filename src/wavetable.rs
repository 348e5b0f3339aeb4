//! Looped playback of a pitched sample at an arbitrary rate.
//!
//! The wavetable is a decoded instrument recording used as the timbral
//! carrier of the voice. A fractional read cursor advances by an arbitrary
//! per-sample increment, so the target frequency does not have to be an
//! integer division of the native pitch; when the cursor crosses the loop
//! end it folds back into the sustain region with its fractional part
//! preserved, which keeps the output phase-continuous.

use alloc::vec::Vec;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::error::Error;
use crate::utils::interpolate_hermite;

/// Minimum sustain loop length in samples. Hermite interpolation reads a
/// 4-tap neighbourhood, so anything shorter cannot wrap cleanly.
const MIN_LOOP_LEN: usize = 4;

/// Peak amplitude below which a decoded recording is rejected as silent.
const SILENCE_THRESHOLD: f32 = 1.0e-5;

#[derive(Debug)]
pub struct Wavetable {
    samples: Vec<f32>,
    sample_rate: f32,
    native_note: f32,
    loop_start: usize,
    loop_end: usize,
    phase: f32,
}

impl Wavetable {
    /// Wraps a decoded sample sequence.
    ///
    /// `native_note` is the MIDI note of the recorded tone and anchors the
    /// playback-rate ratio computed by the pitch controller. `loop_points`
    /// is the `start..end` sustain region; when `None` the entire recording
    /// loops.
    pub fn new(
        samples: Vec<f32>,
        sample_rate: f32,
        native_note: f32,
        loop_points: Option<(usize, usize)>,
    ) -> Result<Self, Error> {
        if samples.is_empty() {
            return Err(Error::EmptyWavetable);
        }
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(Error::InvalidSampleRate(sample_rate));
        }

        let peak = samples.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()));
        if peak < SILENCE_THRESHOLD {
            return Err(Error::SilentWavetable);
        }

        let (loop_start, loop_end) = loop_points.unwrap_or((0, samples.len()));
        if loop_start + MIN_LOOP_LEN > loop_end || loop_end > samples.len() {
            return Err(Error::InvalidLoop {
                start: loop_start,
                end: loop_end,
            });
        }

        Ok(Self {
            samples,
            sample_rate,
            native_note,
            loop_start,
            loop_end,
            phase: 0.0,
        })
    }

    /// Rewinds the read cursor to the start of the recording.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advances the cursor by `increment` source samples and returns the
    /// Hermite-interpolated sample at the new position.
    #[inline]
    pub fn read(&mut self, increment: f32) -> f32 {
        let loop_len = (self.loop_end - self.loop_start) as f32;

        self.phase += increment;
        while self.phase >= self.loop_end as f32 {
            self.phase -= loop_len;
        }

        let index_integral = self.phase as usize;
        let index_fractional = self.phase - (index_integral as f32);

        let index = index_integral as isize;
        let xm1 = self.tap(index - 1);
        let x0 = self.tap(index);
        let x1 = self.tap(index + 1);
        let x2 = self.tap(index + 2);

        interpolate_hermite(xm1, x0, x1, x2, index_fractional)
    }

    /// Fetches one tap of the interpolation neighbourhood, folding indices
    /// past the loop end back into the sustain region.
    #[inline]
    fn tap(&self, index: isize) -> f32 {
        if index < 0 {
            return self.samples[0];
        }
        let mut index = index as usize;
        if index >= self.loop_end {
            index = self.loop_start + (index - self.loop_end) % (self.loop_end - self.loop_start);
        }
        self.samples[index]
    }

    /// Native sample rate of the recording in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// MIDI note of the recorded tone.
    pub fn native_note(&self) -> f32 {
        self.native_note
    }

    /// Length of the recording in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sustain region as a `start..end` pair.
    pub fn loop_points(&self) -> (usize, usize) {
        (self.loop_start, self.loop_end)
    }
}
