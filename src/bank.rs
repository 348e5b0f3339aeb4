//! Built-in tenor allophone bank.
//!
//! Formant data for a male singing voice, standing in for the allophone
//! recordings the original distribution shipped on disk. Vowel formants
//! follow published tenor measurements; consonants are approximations tuned
//! by ear, with reduced voicing for plosives and fricatives so they excite
//! the formant bank with noise instead of the pitched carrier.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::allophone::{AllophoneClass, AllophoneDefinition, Formant, NUM_FORMANTS};

struct BankEntry {
    symbol: &'static str,
    class: AllophoneClass,
    formants: [Formant; NUM_FORMANTS],
    voicing: f32,
    duration_ms: f32,
}

impl BankEntry {
    const fn vowel(symbol: &'static str, formants: [Formant; NUM_FORMANTS]) -> Self {
        Self {
            symbol,
            class: AllophoneClass::Vowel,
            formants,
            voicing: 1.0,
            duration_ms: 200.0,
        }
    }

    const fn consonant(
        symbol: &'static str,
        formants: [Formant; NUM_FORMANTS],
        voicing: f32,
        duration_ms: f32,
    ) -> Self {
        Self {
            symbol,
            class: AllophoneClass::Consonant,
            formants,
            voicing,
            duration_ms,
        }
    }
}

const TENOR: [BankEntry; 16] = [
    BankEntry::vowel(
        "a",
        [
            Formant::new(650.0, 1.0, 80.0),
            Formant::new(1080.0, 0.50, 90.0),
            Formant::new(2650.0, 0.35, 120.0),
            Formant::new(2900.0, 0.30, 130.0),
        ],
    ),
    BankEntry::vowel(
        "e",
        [
            Formant::new(400.0, 1.0, 70.0),
            Formant::new(1700.0, 0.55, 80.0),
            Formant::new(2600.0, 0.40, 100.0),
            Formant::new(3200.0, 0.30, 120.0),
        ],
    ),
    BankEntry::vowel(
        "i",
        [
            Formant::new(290.0, 1.0, 40.0),
            Formant::new(1870.0, 0.50, 90.0),
            Formant::new(2800.0, 0.40, 100.0),
            Formant::new(3250.0, 0.30, 120.0),
        ],
    ),
    BankEntry::vowel(
        "o",
        [
            Formant::new(400.0, 1.0, 40.0),
            Formant::new(800.0, 0.55, 80.0),
            Formant::new(2600.0, 0.25, 100.0),
            Formant::new(2800.0, 0.20, 120.0),
        ],
    ),
    BankEntry::vowel(
        "u",
        [
            Formant::new(350.0, 1.0, 40.0),
            Formant::new(600.0, 0.50, 80.0),
            Formant::new(2700.0, 0.15, 100.0),
            Formant::new(2900.0, 0.10, 120.0),
        ],
    ),
    BankEntry::consonant(
        "m",
        [
            Formant::new(250.0, 1.0, 60.0),
            Formant::new(1200.0, 0.25, 100.0),
            Formant::new(2400.0, 0.20, 120.0),
            Formant::new(2800.0, 0.10, 150.0),
        ],
        1.0,
        90.0,
    ),
    BankEntry::consonant(
        "n",
        [
            Formant::new(300.0, 1.0, 60.0),
            Formant::new(1450.0, 0.30, 100.0),
            Formant::new(2600.0, 0.20, 120.0),
            Formant::new(3000.0, 0.10, 150.0),
        ],
        1.0,
        80.0,
    ),
    BankEntry::consonant(
        "l",
        [
            Formant::new(380.0, 1.0, 60.0),
            Formant::new(1300.0, 0.45, 90.0),
            Formant::new(2700.0, 0.30, 110.0),
            Formant::new(3100.0, 0.15, 140.0),
        ],
        1.0,
        70.0,
    ),
    BankEntry::consonant(
        "r",
        [
            Formant::new(420.0, 1.0, 70.0),
            Formant::new(1300.0, 0.50, 90.0),
            Formant::new(1600.0, 0.40, 110.0),
            Formant::new(2700.0, 0.20, 140.0),
        ],
        1.0,
        70.0,
    ),
    BankEntry::consonant(
        "b",
        [
            Formant::new(360.0, 0.80, 60.0),
            Formant::new(1100.0, 0.30, 110.0),
            Formant::new(2300.0, 0.20, 130.0),
            Formant::new(2900.0, 0.10, 160.0),
        ],
        0.85,
        45.0,
    ),
    BankEntry::consonant(
        "d",
        [
            Formant::new(400.0, 0.80, 60.0),
            Formant::new(1700.0, 0.40, 110.0),
            Formant::new(2600.0, 0.25, 130.0),
            Formant::new(3100.0, 0.10, 160.0),
        ],
        0.80,
        40.0,
    ),
    BankEntry::consonant(
        "t",
        [
            Formant::new(1800.0, 0.40, 200.0),
            Formant::new(4000.0, 0.60, 400.0),
            Formant::new(5000.0, 0.40, 500.0),
            Formant::new(6000.0, 0.20, 600.0),
        ],
        0.15,
        35.0,
    ),
    BankEntry::consonant(
        "s",
        [
            Formant::new(5000.0, 0.70, 600.0),
            Formant::new(6500.0, 0.50, 700.0),
            Formant::new(7500.0, 0.30, 800.0),
            Formant::new(8500.0, 0.15, 900.0),
        ],
        0.05,
        80.0,
    ),
    BankEntry::consonant(
        "f",
        [
            Formant::new(1400.0, 0.40, 400.0),
            Formant::new(4500.0, 0.50, 600.0),
            Formant::new(6000.0, 0.30, 700.0),
            Formant::new(7500.0, 0.15, 800.0),
        ],
        0.10,
        70.0,
    ),
    BankEntry::consonant(
        "v",
        [
            Formant::new(350.0, 0.80, 80.0),
            Formant::new(1500.0, 0.35, 200.0),
            Formant::new(4000.0, 0.30, 500.0),
            Formant::new(6000.0, 0.15, 700.0),
        ],
        0.60,
        60.0,
    ),
    // Sung rest. Shaping level gates to silence while keeping the slot
    // sequenced like any other symbol.
    BankEntry {
        symbol: " ",
        class: AllophoneClass::Rest,
        formants: [Formant::silent(); NUM_FORMANTS],
        voicing: 1.0,
        duration_ms: 150.0,
    },
];

/// Definition records of the built-in tenor voice, in a form accepted by
/// [`AllophoneLibrary::from_records`](crate::AllophoneLibrary::from_records).
pub fn tenor_records() -> Vec<AllophoneDefinition> {
    TENOR
        .iter()
        .map(|entry| AllophoneDefinition {
            symbol: entry.symbol.to_string(),
            class: entry.class,
            formants: entry.formants,
            voicing: entry.voicing,
            duration_ms: entry.duration_ms,
        })
        .collect()
}
