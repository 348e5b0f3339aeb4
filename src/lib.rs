#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod allophone;
pub mod bank;
pub mod control;
pub mod error;
pub mod render;
pub mod sequencer;
pub mod singer;
pub mod utils;
pub mod wavetable;

pub use allophone::{AllophoneClass, AllophoneDefinition, AllophoneLibrary, Formant};
pub use error::Error;
pub use sequencer::SequencerState;
pub use singer::{Singer, SingerConfig};
pub use wavetable::Wavetable;
