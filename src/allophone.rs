//! Allophone definitions and the symbol-indexed library.
//!
//! An allophone is a discrete phonetic unit together with the formant data
//! used to color the wavetable carrier while it is active. The library maps
//! each symbol to its definition; it is built once from an external record
//! sequence (or from the built-in [`bank`](crate::bank)) and is read-only
//! afterwards.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Error;
use crate::utils::crossfade;

/// Number of formant resonators per allophone.
pub const NUM_FORMANTS: usize = 4;

/// One resonance of the vocal tract model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formant {
    /// Center frequency in Hz.
    pub frequency: f32,
    /// Linear amplitude of this resonance.
    pub amplitude: f32,
    /// -3 dB bandwidth in Hz.
    pub bandwidth: f32,
}

impl Formant {
    pub const fn new(frequency: f32, amplitude: f32, bandwidth: f32) -> Self {
        Self {
            frequency,
            amplitude,
            bandwidth,
        }
    }

    pub const fn silent() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Phonetic classification of a symbol.
///
/// Vowels are where the two-speed trigger protocol parks; consonants are
/// played transiently; rests are sung silence (the `" "` symbol of the
/// original allophone strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllophoneClass {
    Vowel,
    Consonant,
    Rest,
}

/// Synthesis parameters for one phonetic symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct AllophoneDefinition {
    /// One or more characters identifying the phoneme.
    pub symbol: String,
    pub class: AllophoneClass,
    pub formants: [Formant; NUM_FORMANTS],
    /// Balance between the pitched carrier (1.0) and noise excitation (0.0).
    pub voicing: f32,
    /// Natural duration in milliseconds when played without a hold.
    pub duration_ms: f32,
}

/// The blendable subset of an allophone definition, interpolated by the
/// sequencer during cross-fades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shaping {
    pub formants: [Formant; NUM_FORMANTS],
    pub voicing: f32,
    /// Output gate: 1.0 while a phoneme sounds, 0.0 for rests and idle.
    pub level: f32,
}

impl Shaping {
    pub const SILENT: Self = Self {
        formants: [Formant::silent(); NUM_FORMANTS],
        voicing: 1.0,
        level: 0.0,
    };

    pub fn from_definition(definition: &AllophoneDefinition) -> Self {
        Self {
            formants: definition.formants,
            voicing: definition.voicing,
            level: match definition.class {
                AllophoneClass::Rest => 0.0,
                _ => 1.0,
            },
        }
    }

    /// Linear blend between two parameter sets, `fade` going from 0.0 (all
    /// `a`) to 1.0 (all `b`).
    pub fn blend(a: &Self, b: &Self, fade: f32) -> Self {
        let mut formants = [Formant::silent(); NUM_FORMANTS];
        for (i, formant) in formants.iter_mut().enumerate() {
            formant.frequency = crossfade(a.formants[i].frequency, b.formants[i].frequency, fade);
            formant.amplitude = crossfade(a.formants[i].amplitude, b.formants[i].amplitude, fade);
            formant.bandwidth = crossfade(a.formants[i].bandwidth, b.formants[i].bandwidth, fade);
        }
        Self {
            formants,
            voicing: crossfade(a.voicing, b.voicing, fade),
            level: crossfade(a.level, b.level, fade),
        }
    }
}

/// Mapping from phoneme symbol to its definition.
#[derive(Debug)]
pub struct AllophoneLibrary {
    definitions: Vec<AllophoneDefinition>,
    index: BTreeMap<String, usize>,
}

impl AllophoneLibrary {
    /// Builds the library from an abstract record sequence, e.g. the
    /// built-in bank or the output of an external directory parser.
    pub fn from_records(
        records: impl IntoIterator<Item = AllophoneDefinition>,
    ) -> Result<Self, Error> {
        let mut definitions = Vec::new();
        let mut index = BTreeMap::new();

        for record in records {
            if index.contains_key(&record.symbol) {
                return Err(Error::DuplicateAllophone(record.symbol));
            }
            index.insert(record.symbol.clone(), definitions.len());
            definitions.push(record);
        }

        if definitions.is_empty() {
            return Err(Error::EmptyLibrary);
        }

        log::debug!("allophone library built with {} symbols", definitions.len());

        Ok(Self { definitions, index })
    }

    /// Looks up a symbol. Callers sequencing a token stream must treat the
    /// unknown-symbol error as recoverable and skip the token.
    pub fn lookup(&self, symbol: &str) -> Result<&AllophoneDefinition, Error> {
        self.index
            .get(symbol)
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| Error::UnknownAllophone(symbol.into()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over all definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AllophoneDefinition> {
        self.definitions.iter()
    }
}
