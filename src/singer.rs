//! The singing voice facade.
//!
//! [`Singer`] owns the wavetable, the allophone library and all mutable
//! synthesis state, and is the only object a caller touches. It assumes a
//! single-threaded cooperative model: the caller repeatedly requests
//! buffers, and all control calls happen on the same thread (or under
//! external synchronization). Teardown is `Drop`.

use crate::allophone::AllophoneLibrary;
use crate::control::PitchLoudnessController;
use crate::error::Error;
use crate::render::RenderEngine;
use crate::sequencer::{AllophoneSequencer, SequencerState};
use crate::wavetable::Wavetable;

/// Tunable time constants of the engine.
#[derive(Debug, Clone, Copy)]
pub struct SingerConfig {
    /// Length of the cross-fade between phoneme timbres in milliseconds.
    pub crossfade_ms: f32,
    /// Portamento time for glide pitch changes in milliseconds.
    pub glide_ms: f32,
}

impl Default for SingerConfig {
    fn default() -> Self {
        Self {
            crossfade_ms: 8.0,
            glide_ms: 60.0,
        }
    }
}

#[derive(Debug)]
pub struct Singer {
    wavetable: Wavetable,
    library: AllophoneLibrary,
    sequencer: AllophoneSequencer,
    control: PitchLoudnessController,
    engine: RenderEngine,
    sample_rate: f32,
    block_size: usize,
}

impl Singer {
    /// Creates a voice from a decoded wavetable and a built allophone
    /// library, rendering at `sample_rate` with a nominal buffer size of
    /// `block_size` frames.
    pub fn new(
        wavetable: Wavetable,
        library: AllophoneLibrary,
        sample_rate: f32,
        block_size: usize,
    ) -> Result<Self, Error> {
        Self::with_config(
            wavetable,
            library,
            sample_rate,
            block_size,
            SingerConfig::default(),
        )
    }

    pub fn with_config(
        wavetable: Wavetable,
        library: AllophoneLibrary,
        sample_rate: f32,
        block_size: usize,
        config: SingerConfig,
    ) -> Result<Self, Error> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        if block_size == 0 {
            return Err(Error::InvalidBlockSize);
        }

        let crossfade_samples = (config.crossfade_ms * 0.001 * sample_rate) as usize;
        let glide_samples = (config.glide_ms * 0.001 * sample_rate) as usize;

        let control = PitchLoudnessController::new(
            wavetable.native_note(),
            wavetable.sample_rate(),
            sample_rate,
            glide_samples,
        );

        Ok(Self {
            sequencer: AllophoneSequencer::new(sample_rate, crossfade_samples),
            control,
            engine: RenderEngine::new(sample_rate),
            wavetable,
            library,
            sample_rate,
            block_size,
        })
    }

    /// Replaces the current allophone immediately, discarding the pending
    /// queue. A sustain suffix (`"a-"`) holds the phoneme until the next
    /// trigger; without it the phoneme plays once and the voice goes idle.
    pub fn set_allophone(&mut self, token: &str) {
        self.sequencer.set_allophone(token, &self.library);
    }

    /// Splits `tokens` on `|` and appends the result to the pending queue.
    pub fn enqueue_allophones(&mut self, tokens: &str) {
        self.sequencer.enqueue(tokens);
    }

    /// Advances to the next vowel or held token, sounding intervening
    /// consonants transiently. A no-op when the queue is empty.
    pub fn trigger_next_vowel(&mut self) {
        self.sequencer.trigger_next_vowel(&self.library);
    }

    /// Advances by exactly one queued token. A no-op when the queue is
    /// empty.
    pub fn trigger_next_allophone(&mut self) {
        self.sequencer.trigger_next_allophone(&self.library);
    }

    /// Sets the target MIDI note, gliding there when `glide` is set.
    pub fn set_pitch(&mut self, note: f32, glide: bool) {
        self.control.set_pitch(note, glide);
    }

    /// Sets the scalar output gain, nominally 0.0..=1.0.
    pub fn set_loudness(&mut self, gain: f32) {
        self.control.set_loudness(gain);
    }

    /// Renders exactly `out.len()` samples into `out`, advancing all
    /// synthesis state by one buffer. Never fails: an idle voice renders
    /// silence.
    pub fn fill_buffer(&mut self, out: &mut [f32]) {
        self.engine.render(
            &mut self.wavetable,
            &mut self.sequencer,
            &mut self.control,
            &self.library,
            out,
        );
    }

    /// Number of tokens awaiting consumption.
    pub fn pending_count(&self) -> usize {
        self.sequencer.pending_count()
    }

    /// Current playback state of the sequencer.
    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Playback-rate ratio at the last rendered sample; 1.0 plays the
    /// wavetable at its native pitch (sample rates being equal).
    pub fn playback_rate(&self) -> f32 {
        self.control.ratio()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Nominal buffer size negotiated at creation.
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}
