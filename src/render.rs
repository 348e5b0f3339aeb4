//! Per-sample rendering pipeline.
//!
//! For each output sample: step the pitch glide, read the wavetable carrier
//! at the resulting rate, mix in noise excitation according to the active
//! voicing, shape the excitation through the formant resonator bank, gate
//! and scale by loudness. Work per sample is fixed and allocation-free, so
//! a buffer fill meets a real-time deadline.

use crate::allophone::{AllophoneLibrary, NUM_FORMANTS};
use crate::control::PitchLoudnessController;
use crate::sequencer::AllophoneSequencer;
use crate::utils::filter::{FilterMode, FrequencyApproximation, Svf};
use crate::utils::parameter_interpolator::ParameterInterpolator;
use crate::utils::random::NoiseSource;
use crate::utils::soft_clip;
use crate::wavetable::Wavetable;

/// Formant center frequencies are clamped to this fraction of the sample
/// rate; the dirty prewarp approximation degrades above it.
const MAX_FORMANT_F: f32 = 0.25;

/// Level of the noise excitation blended in for unvoiced allophones.
const NOISE_LEVEL: f32 = 0.5;

#[derive(Debug)]
pub struct RenderEngine {
    filters: [Svf; NUM_FORMANTS],
    noise: NoiseSource,
    loudness: f32,
    inv_sample_rate: f32,
}

impl RenderEngine {
    pub fn new(sample_rate: f32) -> Self {
        let mut filters: [Svf; NUM_FORMANTS] = Default::default();
        for filter in &mut filters {
            filter.init();
        }
        Self {
            filters,
            noise: NoiseSource::new(),
            loudness: 1.0,
            inv_sample_rate: 1.0 / sample_rate,
        }
    }

    /// Renders exactly `out.len()` samples, then gives the sequencer the
    /// chance to auto-advance past symbols whose natural duration elapsed
    /// within this buffer.
    pub fn render(
        &mut self,
        wavetable: &mut Wavetable,
        sequencer: &mut AllophoneSequencer,
        control: &mut PitchLoudnessController,
        library: &AllophoneLibrary,
        out: &mut [f32],
    ) {
        if out.is_empty() {
            return;
        }

        let mut loudness_modulation =
            ParameterInterpolator::new(&mut self.loudness, control.loudness(), out.len());

        for out_sample in out.iter_mut() {
            let ratio = control.next_ratio();
            let carrier = wavetable.read(ratio);
            let shaping = sequencer.next_shaping();

            let noise = self.noise.next_float();
            let excitation =
                carrier * shaping.voicing + noise * NOISE_LEVEL * (1.0 - shaping.voicing);

            let mut s = 0.0;
            for (filter, formant) in self.filters.iter_mut().zip(shaping.formants.iter()) {
                let f = (formant.frequency * self.inv_sample_rate).min(MAX_FORMANT_F);
                let resonance = (formant.frequency / formant.bandwidth.max(1.0)).clamp(0.5, 50.0);
                filter.set_f_q(f, resonance, FrequencyApproximation::Dirty);
                s += filter.process(excitation, FilterMode::BandPassNormalized)
                    * formant.amplitude;
            }

            *out_sample = soft_clip(s) * shaping.level * loudness_modulation.next();
        }

        sequencer.finish_block(out.len(), library);
    }
}
