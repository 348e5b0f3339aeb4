//! Zero-delay-feedback state variable filter.

// Based on MIT-licensed code (c) 2014 by Olivier Gillet (ol.gillet@gmail.com)

#[allow(unused_imports)]
use num_traits::float::Float;

#[derive(Debug, Clone, Copy)]
pub enum FilterMode {
    LowPass,
    BandPass,
    BandPassNormalized,
    HighPass,
}

#[derive(Debug, Clone, Copy)]
pub enum FrequencyApproximation {
    Exact,
    Dirty,
}

const M_PI_F: f32 = core::f32::consts::PI;
const M_PI_POW_2: f32 = M_PI_F * M_PI_F;
const M_PI_POW_3: f32 = M_PI_POW_2 * M_PI_F;

/// Prewarped frequency coefficient for the integrators.
#[inline]
pub fn tan_approx(f: f32, approximation: FrequencyApproximation) -> f32 {
    match approximation {
        FrequencyApproximation::Exact => {
            // Clip coefficient to about 100.
            let f = if f < 0.497 { f } else { 0.497 };
            (M_PI_F * f).tan()
        }
        FrequencyApproximation::Dirty => {
            // Optimized for frequencies below 8kHz.
            const A: f32 = 3.736e-01 * M_PI_POW_3;
            f * (M_PI_F + A * f * f)
        }
    }
}

#[derive(Debug, Default)]
pub struct Svf {
    g: f32,
    r: f32,
    h: f32,
    state_1: f32,
    state_2: f32,
}

impl Svf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self) {
        self.set_f_q(0.01, 100.0, FrequencyApproximation::Dirty);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.state_1 = 0.0;
        self.state_2 = 0.0;
    }

    /// Set frequency (normalized) and resonance from true units. The dirty
    /// approximation avoids the cost of tanf in per-sample updates.
    #[inline]
    pub fn set_f_q(&mut self, f: f32, resonance: f32, approximation: FrequencyApproximation) {
        self.g = tan_approx(f, approximation);
        self.r = 1.0 / resonance;
        self.h = 1.0 / (1.0 + self.r * self.g + self.g * self.g);
    }

    #[inline]
    pub fn process(&mut self, in_: f32, mode: FilterMode) -> f32 {
        let hp = (in_ - self.r * self.state_1 - self.g * self.state_1 - self.state_2) * self.h;
        let bp = self.g * hp + self.state_1;
        self.state_1 = self.g * hp + bp;
        let lp = self.g * bp + self.state_2;
        self.state_2 = self.g * bp + lp;

        match mode {
            FilterMode::LowPass => lp,
            FilterMode::BandPass => bp,
            FilterMode::BandPassNormalized => bp * self.r,
            FilterMode::HighPass => hp,
        }
    }
}
