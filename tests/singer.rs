//! Tests for the singer facade: buffer contract, phase continuity, pitch
//! and glide behavior, and the enqueued-song scenarios.

mod wav_writer;

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use singer_dsp::{bank, AllophoneLibrary, Error, SequencerState, Singer, Wavetable};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK_SIZE: usize = 256;

/// Period of the test carrier in samples. 168 samples at 44.1 kHz is
/// 262.5 Hz, labelled as MIDI note 60 for the pitch tests.
const CARRIER_PERIOD: usize = 168;
const CARRIER_HZ: f32 = SAMPLE_RATE / CARRIER_PERIOD as f32;

fn carrier_wavetable() -> Wavetable {
    let len = CARRIER_PERIOD * 100;
    let samples = (0..len)
        .map(|i| (i as f32 / CARRIER_PERIOD as f32 * core::f32::consts::TAU).sin())
        .collect();
    Wavetable::new(samples, SAMPLE_RATE, 60.0, None).unwrap()
}

fn library() -> AllophoneLibrary {
    AllophoneLibrary::from_records(bank::tenor_records()).unwrap()
}

fn singer() -> Singer {
    Singer::new(carrier_wavetable(), library(), SAMPLE_RATE, BLOCK_SIZE).unwrap()
}

/// Renders `frames` samples in block-sized chunks.
fn render(singer: &mut Singer, frames: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(frames);
    let mut block = [0.0; BLOCK_SIZE];
    while out.len() < frames {
        let n = usize::min(BLOCK_SIZE, frames - out.len());
        singer.fill_buffer(&mut block[..n]);
        out.extend_from_slice(&block[..n]);
    }
    out
}

/// Rising zero crossings per second, a crude fundamental estimate.
fn measure_frequency(samples: &[f32]) -> f32 {
    let mut crossings = 0;
    for pair in samples.windows(2) {
        if pair[0] < 0.0 && pair[1] >= 0.0 {
            crossings += 1;
        }
    }
    crossings as f32 * SAMPLE_RATE / samples.len() as f32
}

#[test]
fn construction_rejects_bad_parameters() {
    assert_eq!(
        Singer::new(carrier_wavetable(), library(), 0.0, BLOCK_SIZE).unwrap_err(),
        Error::InvalidSampleRate(0.0)
    );
    assert_eq!(
        Singer::new(carrier_wavetable(), library(), SAMPLE_RATE, 0).unwrap_err(),
        Error::InvalidBlockSize
    );
}

#[test]
fn construction_echoes_stream_parameters() {
    let singer = singer();
    assert_eq!(singer.sample_rate(), SAMPLE_RATE);
    assert_eq!(singer.block_size(), BLOCK_SIZE);
}

#[test]
fn fill_buffer_writes_exactly_the_requested_frames() {
    let mut singer = singer();
    for frames in [1, 7, BLOCK_SIZE, 1000] {
        // The sentinel must be overwritten in every slot; an idle voice
        // writes silence, not garbage and not nothing.
        let mut buffer = vec![7.0; frames];
        singer.fill_buffer(&mut buffer);
        assert_eq!(buffer.len(), frames);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }
}

#[test]
fn idle_engine_renders_silence() {
    let mut singer = singer();
    singer.set_pitch(60.0, false);
    singer.set_loudness(0.8);

    let out = render(&mut singer, 10 * BLOCK_SIZE);
    assert!(out.iter().all(|s| *s == 0.0));
    assert_eq!(singer.state(), SequencerState::Idle);
}

#[test]
fn held_vowel_renders_nonzero_audio() {
    let mut singer = singer();
    singer.set_allophone("a-");
    singer.set_pitch(60.0, false);

    let out = render(&mut singer, SAMPLE_RATE as usize / 2);
    let peak = out.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()));
    assert!(peak > 0.01, "held vowel is silent (peak {peak})");
    assert_eq!(singer.state(), SequencerState::Holding);

    wav_writer::write("singer/held_a.wav", SAMPLE_RATE, &out).ok();
}

#[test]
fn buffer_boundaries_are_phase_continuous() {
    // The same performance rendered in 256-sample blocks and in one large
    // buffer must be identical sample for sample.
    let mut blockwise = singer();
    blockwise.set_allophone("a-");
    blockwise.set_pitch(67.0, false);
    let a = render(&mut blockwise, 16 * BLOCK_SIZE);

    let mut oneshot = singer();
    oneshot.set_allophone("a-");
    oneshot.set_pitch(67.0, false);
    let mut b = vec![0.0; 16 * BLOCK_SIZE];
    oneshot.fill_buffer(&mut b);

    for (x, y) in a.iter().zip(b.iter()) {
        approx::assert_abs_diff_eq!(*x, *y, epsilon = 1.0e-6);
    }
}

#[test]
fn octave_up_doubles_the_fundamental() {
    let mut singer = singer();
    singer.set_allophone("a-");

    singer.set_pitch(60.0, false);
    render(&mut singer, 4410); // let the filters settle
    let low = measure_frequency(&render(&mut singer, SAMPLE_RATE as usize));

    singer.set_pitch(72.0, false);
    render(&mut singer, 4410);
    let high = measure_frequency(&render(&mut singer, SAMPLE_RATE as usize));

    approx::assert_relative_eq!(low, CARRIER_HZ, max_relative = 0.1);
    approx::assert_relative_eq!(high, 2.0 * CARRIER_HZ, max_relative = 0.1);
}

#[test]
fn discrete_pitch_change_has_no_ramp() {
    let mut singer = singer();
    singer.set_allophone("a-");
    singer.set_pitch(60.0, false);
    assert_eq!(singer.playback_rate(), 1.0);

    singer.set_pitch(72.0, false);
    assert_eq!(singer.playback_rate(), 2.0);
}

#[test]
fn glide_interpolates_monotonically_to_target() {
    let mut singer = singer();
    singer.set_allophone("a-");
    singer.set_pitch(60.0, false);
    render(&mut singer, BLOCK_SIZE);
    assert_eq!(singer.playback_rate(), 1.0);

    singer.set_pitch(72.0, true);
    // The jump is deferred to rendering.
    assert_eq!(singer.playback_rate(), 1.0);

    let mut last = singer.playback_rate();
    for _ in 0..32 {
        render(&mut singer, BLOCK_SIZE);
        let rate = singer.playback_rate();
        assert!(rate >= last, "glide went backwards: {last} -> {rate}");
        assert!(rate <= 2.0 + 1.0e-4, "glide overshot: {rate}");
        last = rate;
    }

    // 60 ms glide completes well within 32 blocks.
    approx::assert_abs_diff_eq!(last, 2.0, epsilon = 1.0e-4);
}

#[test]
fn pending_count_tracks_queue_consumption() {
    let mut singer = singer();
    singer.enqueue_allophones("a-|m|e-");
    assert_eq!(singer.pending_count(), 3);

    singer.trigger_next_allophone();
    assert_eq!(singer.pending_count(), 2);

    // Control changes never touch the queue.
    singer.set_pitch(64.0, true);
    singer.set_loudness(0.3);
    assert_eq!(singer.pending_count(), 2);
}

#[test]
fn triggers_on_empty_queue_leave_output_unchanged() {
    let mut reference = singer();
    reference.set_allophone("a-");
    reference.set_pitch(60.0, false);
    let expected = render(&mut reference, 8 * BLOCK_SIZE);

    let mut triggered = singer();
    triggered.set_allophone("a-");
    triggered.set_pitch(60.0, false);
    let mut actual = render(&mut triggered, 4 * BLOCK_SIZE);
    triggered.trigger_next_vowel();
    triggered.trigger_next_allophone();
    actual.extend(render(&mut triggered, 4 * BLOCK_SIZE));

    assert_eq!(triggered.state(), SequencerState::Holding);
    for (x, y) in expected.iter().zip(actual.iter()) {
        approx::assert_abs_diff_eq!(*x, *y, epsilon = 1.0e-6);
    }
}

#[test]
fn vowel_trigger_scenario_parks_on_first_vowel() {
    let mut singer = singer();
    singer.enqueue_allophones("a-|m|a-");
    singer.set_pitch(60.0, false);

    singer.trigger_next_vowel();
    assert_eq!(singer.state(), SequencerState::Holding);
    assert_eq!(singer.pending_count(), 2);

    // Holding renders the vowel indefinitely until the next trigger.
    let out = render(&mut singer, SAMPLE_RATE as usize);
    let peak = out.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()));
    assert!(peak > 0.01);
    assert_eq!(singer.state(), SequencerState::Holding);
}

#[test]
fn loudness_scales_output() {
    let mut loud = singer();
    loud.set_allophone("a-");
    loud.set_pitch(60.0, false);
    loud.set_loudness(1.0);
    render(&mut loud, 4410);
    let loud_out = render(&mut loud, 8820);

    let mut quiet = singer();
    quiet.set_allophone("a-");
    quiet.set_pitch(60.0, false);
    quiet.set_loudness(0.25);
    render(&mut quiet, 4410);
    let quiet_out = render(&mut quiet, 8820);

    let rms = |samples: &[f32]| {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    };
    approx::assert_relative_eq!(rms(&quiet_out), 0.25 * rms(&loud_out), max_relative = 0.01);
}

thread_local! {
    static IN_RENDER: Cell<bool> = Cell::new(false);
}
static RENDER_RECORDS: AtomicUsize = AtomicUsize::new(0);

/// Counts records emitted from within `fill_buffer` on this thread.
struct CountingLogger;

impl log::Log for CountingLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, _: &log::Record) {
        if IN_RENDER.with(Cell::get) {
            RENDER_RECORDS.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn flush(&self) {}
}

#[test]
fn fill_buffer_emits_no_log_records() {
    static LOGGER: CountingLogger = CountingLogger;
    log::set_logger(&LOGGER).ok();
    log::set_max_level(log::LevelFilter::Trace);

    // Both the auto-advance of "m" into the held "a" and the skip of the
    // unknown token happen inside the render path here; neither may reach
    // the logger.
    let mut singer = singer();
    singer.enqueue_allophones("m|zz|a-");
    singer.trigger_next_allophone();

    let mut buffer = [0.0; BLOCK_SIZE];
    for _ in 0..32 {
        IN_RENDER.with(|flag| flag.set(true));
        singer.fill_buffer(&mut buffer);
        IN_RENDER.with(|flag| flag.set(false));
    }

    assert_eq!(singer.state(), SequencerState::Holding);
    assert_eq!(RENDER_RECORDS.load(Ordering::Relaxed), 0);
}

#[test]
fn enqueued_song_is_consumed_by_vowel_triggers() {
    let mut singer = singer();
    let mut wav_data = Vec::new();

    singer.enqueue_allophones("a-|m|a-|r|i-|l|i-|m|i|a-| |b|e-|l|a-| -");
    singer.set_loudness(0.5);

    let mut pitch = 60.0;
    let buffers_per_allophone = (SAMPLE_RATE / 4.0) as usize / BLOCK_SIZE;
    let mut guard = 0;

    while singer.pending_count() > 0 {
        singer.set_pitch(pitch, true);
        pitch += 1.0;
        singer.trigger_next_vowel();
        wav_data.extend(render(&mut singer, buffers_per_allophone * BLOCK_SIZE));

        guard += 1;
        assert!(guard < 64, "queue not consumed");
    }

    let peak = wav_data.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()));
    assert!(peak > 0.01);

    wav_writer::write("singer/amarilli.wav", SAMPLE_RATE, &wav_data).ok();
}
