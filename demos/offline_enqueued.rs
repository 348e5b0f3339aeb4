//! Render an enqueued allophone song, advancing one vowel per second with
//! a rising legato pitch, and write the result to a WAV file.

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

    singer.enqueue_allophones("a-|m|a-|r|i-|l|i-|m|i|a-| |b|e-|l|a-| -");
    singer.set_loudness(0.5);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create("offline_enqueued.wav", spec).unwrap();

    let buffers_per_allophone = (SAMPLE_RATE / BUFFER_SIZE as f32).ceil() as usize;
    let mut pitch = 60.0; // MIDI note middle C
    let mut buffer = [0.0; BUFFER_SIZE];

    while singer.pending_count() > 0 {
        singer.set_pitch(pitch, true);
        pitch += 1.0;
        singer.trigger_next_vowel(); // go to the next hold symbol and wait

        for _ in 0..buffers_per_allophone {
            singer.fill_buffer(&mut buffer);
            for sample in &buffer {
                writer.write_sample(*sample).unwrap();
            }
        }
    }

    writer.finalize().unwrap();
    println!("wrote offline_enqueued.wav");
}
