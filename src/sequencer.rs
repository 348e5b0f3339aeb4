//! Allophone queue and playback state machine.
//!
//! The sequencer owns the pending-token queue and decides which allophone is
//! active at every sample. Callers drive it at note cadence through the two
//! trigger calls: [`trigger_next_allophone`](AllophoneSequencer::trigger_next_allophone)
//! advances by exactly one token, while
//! [`trigger_next_vowel`](AllophoneSequencer::trigger_next_vowel) advances
//! token by token until a vowel or hold is reached, sounding each
//! intervening consonant for its natural duration along the way.
//!
//! Every change of the active symbol starts a fixed-length cross-fade of the
//! shaping parameters; the blend is interpolated per sample and is what
//! keeps phoneme boundaries free of timbral clicks.

use alloc::collections::VecDeque;
use alloc::string::{String, ToString};

use crate::allophone::{AllophoneClass, AllophoneLibrary, Shaping};

/// Separator between tokens of an enqueued allophone string.
pub const TOKEN_SEPARATOR: char = '|';

/// Suffix marking a token to be held until the next trigger.
pub const SUSTAIN_MARKER: char = '-';

/// Playback states of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Queue consumed or nothing ever set; output gates to silence.
    Idle,
    /// Actively advancing through queued tokens.
    Playing,
    /// Parked at a held symbol, awaiting an external trigger.
    Holding,
}

/// What the ongoing advance is seeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerMode {
    AwaitingAny,
    AwaitingVowel,
}

/// One token of an enqueued allophone string. An empty symbol is a bare
/// sustain marker extending the current timbre.
#[derive(Debug, Clone, PartialEq)]
struct QueueEntry {
    symbol: String,
    hold: bool,
}

fn parse_token(token: &str) -> Option<QueueEntry> {
    if token.is_empty() {
        return None;
    }
    match token.strip_suffix(SUSTAIN_MARKER) {
        Some(symbol) => Some(QueueEntry {
            symbol: symbol.to_string(),
            hold: true,
        }),
        None => Some(QueueEntry {
            symbol: token.to_string(),
            hold: false,
        }),
    }
}

#[derive(Debug)]
pub struct AllophoneSequencer {
    queue: VecDeque<QueueEntry>,
    state: SequencerState,
    mode: TriggerMode,

    current: Shaping,
    previous: Shaping,
    xfade_total: usize,
    xfade_remaining: usize,

    /// Natural-duration countdown of the active symbol while Playing.
    remaining_samples: usize,
    /// Whether any allophone has ever been set.
    active: bool,

    sample_rate: f32,
}

impl AllophoneSequencer {
    pub fn new(sample_rate: f32, crossfade_samples: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            state: SequencerState::Idle,
            mode: TriggerMode::AwaitingAny,
            current: Shaping::SILENT,
            previous: Shaping::SILENT,
            xfade_total: crossfade_samples.max(1),
            xfade_remaining: 0,
            remaining_samples: 0,
            active: false,
            sample_rate,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Number of tokens awaiting consumption.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Progress of the ongoing cross-fade, 0.0 (all previous) to 1.0 (all
    /// current).
    pub fn crossfade_progress(&self) -> f32 {
        1.0 - self.xfade_remaining as f32 / self.xfade_total as f32
    }

    /// Splits a token string on [`TOKEN_SEPARATOR`] and appends the tokens
    /// to the pending queue. Valid in any state; never changes state.
    pub fn enqueue(&mut self, tokens: &str) {
        self.queue
            .extend(tokens.split(TOKEN_SEPARATOR).filter_map(parse_token));
    }

    /// Replaces the current target immediately, discarding the pending
    /// queue. A token with a sustain suffix holds; anything else plays once
    /// and falls back to Idle.
    pub fn set_allophone(&mut self, token: &str, library: &AllophoneLibrary) {
        self.queue.clear();
        self.mode = TriggerMode::AwaitingAny;
        if let Some(entry) = parse_token(token) {
            if !self.begin(&entry, library) {
                log::warn!("unknown allophone `{}`, going idle", entry.symbol);
                self.enter_idle();
            }
        }
        log::debug!("set allophone, now {:?}", self.state);
    }

    /// Advances until a vowel or a held token is reached, then holds there.
    /// Consonants on the way are played transiently for their natural
    /// duration. A no-op when the queue is empty.
    pub fn trigger_next_vowel(&mut self, library: &AllophoneLibrary) {
        if self.queue.is_empty() {
            return;
        }
        self.mode = TriggerMode::AwaitingVowel;
        let skipped = self.advance(library);
        if skipped > 0 {
            log::warn!("skipped {skipped} unknown tokens");
        }
        log::debug!("vowel trigger, now {:?}", self.state);
    }

    /// Dequeues exactly one token and begins rendering it. A no-op when the
    /// queue is empty.
    pub fn trigger_next_allophone(&mut self, library: &AllophoneLibrary) {
        if self.queue.is_empty() {
            return;
        }
        self.mode = TriggerMode::AwaitingAny;
        let skipped = self.advance(library);
        if skipped > 0 {
            log::warn!("skipped {skipped} unknown tokens");
        }
        log::debug!("allophone trigger, now {:?}", self.state);
    }

    /// Blended shaping parameters for the next output sample; advances the
    /// cross-fade by one step.
    #[inline]
    pub fn next_shaping(&mut self) -> Shaping {
        if self.xfade_remaining == 0 {
            return self.current;
        }
        self.xfade_remaining -= 1;
        let fade = self.crossfade_progress();
        Shaping::blend(&self.previous, &self.current, fade)
    }

    /// Accounts for `frames` rendered samples and auto-advances once the
    /// active symbol's natural duration has elapsed. Called by the render
    /// engine after each buffer.
    pub fn finish_block(&mut self, frames: usize, library: &AllophoneLibrary) {
        if self.state != SequencerState::Playing {
            return;
        }
        self.remaining_samples -= usize::min(self.remaining_samples, frames);
        if self.remaining_samples == 0 {
            self.advance(library);
        }
    }

    /// Dequeues until a token begins successfully and returns the number of
    /// unknown symbols dropped on the way (zero-duration pass-throughs); an
    /// exhausted queue falls back to Idle. Also runs from `finish_block`
    /// inside the render path, so it must not log or block.
    fn advance(&mut self, library: &AllophoneLibrary) -> usize {
        let mut skipped = 0;
        while let Some(entry) = self.queue.pop_front() {
            if self.begin(&entry, library) {
                return skipped;
            }
            skipped += 1;
        }
        self.enter_idle();
        skipped
    }

    /// Makes `entry` the active symbol and starts a cross-fade towards it.
    /// Returns false if the symbol is unknown.
    fn begin(&mut self, entry: &QueueEntry, library: &AllophoneLibrary) -> bool {
        if entry.symbol.is_empty() {
            // Bare sustain marker: extend the current timbre.
            self.state = SequencerState::Holding;
            return true;
        }

        let definition = match library.lookup(&entry.symbol) {
            Ok(definition) => definition,
            Err(_) => return false,
        };

        self.previous = self.shaping_now();
        self.current = Shaping::from_definition(definition);
        self.xfade_remaining = self.xfade_total;
        self.active = true;

        let parks = entry.hold
            || (self.mode == TriggerMode::AwaitingVowel
                && definition.class == AllophoneClass::Vowel);
        if parks {
            self.state = SequencerState::Holding;
        } else {
            self.state = SequencerState::Playing;
            self.remaining_samples =
                ((definition.duration_ms * 0.001 * self.sample_rate) as usize).max(1);
        }
        true
    }

    /// Gates the output to silence while keeping the last-known formants,
    /// so the release is a cross-fade rather than a hard cut.
    fn enter_idle(&mut self) {
        self.previous = self.shaping_now();
        self.current = Shaping {
            level: 0.0,
            ..self.current
        };
        self.xfade_remaining = self.xfade_total;
        self.state = SequencerState::Idle;
    }

    /// Blend at the current cross-fade position.
    fn shaping_now(&self) -> Shaping {
        if self.xfade_remaining == 0 {
            self.current
        } else {
            Shaping::blend(&self.previous, &self.current, self.crossfade_progress())
        }
    }
}
