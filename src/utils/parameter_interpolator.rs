//! Linear interpolation of parameters in rendering loops.

// Based on MIT-licensed code (c) 2015 by Olivier Gillet (ol.gillet@gmail.com)

/// Ramps a parameter from its previous value to a new target across one
/// block, writing the final value back to the state on drop.
#[derive(Debug)]
pub struct ParameterInterpolator<'a> {
    state: &'a mut f32,
    value: f32,
    increment: f32,
}

impl<'a> ParameterInterpolator<'a> {
    pub fn new(state: &'a mut f32, new_value: f32, size: usize) -> Self {
        let v = *state;
        Self {
            state,
            value: v,
            increment: if size == 0 {
                0.0
            } else {
                (new_value - v) / (size as f32)
            },
        }
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f32 {
        self.value += self.increment;
        self.value
    }
}

impl Drop for ParameterInterpolator<'_> {
    fn drop(&mut self) {
        *self.state = self.value;
    }
}
