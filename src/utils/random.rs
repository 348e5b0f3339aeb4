//! Fast pseudo random noise source for consonant excitation.

// Based on MIT-licensed code (c) 2012 by Olivier Gillet (ol.gillet@gmail.com)

/// Linear congruential generator with per-instance state, so rendering stays
/// deterministic and free of shared globals.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    state: u32,
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self { state: 0x21 }
    }
}

impl NoiseSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    #[inline]
    pub fn next_word(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// White noise sample in the range -1.0..1.0.
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        self.next_word() as f32 / 2147483648.0 - 1.0
    }
}
