//! Sing a sustained "a" at middle C and report buffer peaks.

use singer_dsp::{bank, AllophoneLibrary, Singer, Wavetable};

const SAMPLE_RATE: f32 = 44100.0;
const BUFFER_SIZE: usize = 1024;

/// Cello-like carrier: a band-limited sawtooth around F2 (MIDI note 41),
/// standing in for a decoded instrument recording.
fn cello_wavetable() -> Wavetable {
    let period = 505;
    let len = period * 8;
    let samples = (0..len)
        .map(|i| {
            let phase = i as f32 / period as f32 * core::f32::consts::TAU;
            (1..=10).map(|h| (phase * h as f32).sin() / h as f32).sum::<f32>() * 0.3
        })
        .collect();
    Wavetable::new(samples, SAMPLE_RATE, 41.0, None).unwrap()
}

fn main() {
    simple_logger::SimpleLogger::new().init().ok();

    let library = AllophoneLibrary::from_records(bank::tenor_records()).unwrap();
    let mut singer = Singer::new(cello_wavetable(), library, SAMPLE_RATE, BUFFER_SIZE).unwrap();

    singer.set_allophone("a-"); // sing 'a' and sustain
    singer.set_pitch(60.0, true); // MIDI note middle C

    let mut buffer = [0.0; BUFFER_SIZE];
    for n in 0..16 {
        singer.fill_buffer(&mut buffer);
        // buffer now contains audio; do something with it here
        let peak = buffer.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()));
        println!("buffer {n:2}: peak {peak:.4}");
    }
}
