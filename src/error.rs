//! Error types.

use alloc::string::String;

use thiserror::Error;

/// Errors reported while constructing a [`Singer`](crate::Singer) or one of
/// its parts, plus the recoverable unknown-symbol condition.
///
/// Rendering and sequencing never fail once construction has succeeded;
/// malformed input degrades to a skip or a no-op instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The decoded wavetable contains no samples.
    #[error("wavetable contains no samples")]
    EmptyWavetable,

    /// The decoded wavetable is silent.
    #[error("wavetable is silent")]
    SilentWavetable,

    /// Loop points do not describe a usable sustain region.
    #[error("invalid wavetable loop points {start}..{end}")]
    InvalidLoop { start: usize, end: usize },

    /// The allophone source yielded no definitions.
    #[error("allophone library is empty")]
    EmptyLibrary,

    /// The allophone source contains the same symbol twice.
    #[error("duplicate allophone symbol `{0}`")]
    DuplicateAllophone(String),

    /// Lookup of a symbol that is not part of the library.
    #[error("unknown allophone symbol `{0}`")]
    UnknownAllophone(String),

    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate {0}")]
    InvalidSampleRate(f32),

    /// Buffer size of zero frames.
    #[error("invalid buffer size")]
    InvalidBlockSize,
}
