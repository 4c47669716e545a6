/// Sound layer: procedural heist ambience and cues via rodio.
///
/// All buffers are generated as in-memory WAVs at init time. Effects
/// are fire-and-forget sinks; the background theme is one persistent
/// looping sink that F9 pauses and resumes.
///
/// Compile with `--no-default-features` to drop audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = 2.0 * std::f32::consts::PI;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        /// Looping background theme. Paused until the player asks.
        music: Sink,
        sfx_unlock: Arc<Vec<u8>>,
        sfx_deny: Arc<Vec<u8>>,
        sfx_reveal: Arc<Vec<u8>>,
        sfx_blip: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            let music = Sink::try_new(&handle).ok()?;
            let theme = make_wav(&gen_theme());
            if let Ok(src) = rodio::Decoder::new(Cursor::new(theme)) {
                music.append(src.repeat_infinite());
            }
            music.pause();
            music.set_volume(0.6);

            Some(SoundEngine {
                _stream: stream,
                handle,
                music,
                sfx_unlock: Arc::new(make_wav(&gen_unlock())),
                sfx_deny: Arc::new(make_wav(&gen_deny())),
                sfx_reveal: Arc::new(make_wav(&gen_reveal())),
                sfx_blip: Arc::new(make_wav(&gen_blip(660.0, 0.05, 0.2))),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn set_music(&self, on: bool) {
            if on { self.music.play() } else { self.music.pause() }
        }

        pub fn play_unlock(&self) { self.play(&self.sfx_unlock); }
        pub fn play_deny(&self) { self.play(&self.sfx_deny); }
        pub fn play_reveal(&self) { self.play(&self.sfx_reveal); }
        pub fn play_stage_blip(&self) { self.play(&self.sfx_blip); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Simple sine blip at given frequency and duration.
    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// One note with a soft attack and release, sine + weak 2nd harmonic.
    fn push_note(samples: &mut Vec<f32>, freq: f32, dur: f32, volume: f32) {
        let n = (SAMPLE_RATE as f32 * dur) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let pos = i as f32 / n as f32;
            let env = (pos * 8.0).min(1.0) * (1.0 - pos).powf(0.7);
            let wave = (t * freq * TAU).sin() * 0.8 + (t * freq * 2.0 * TAU).sin() * 0.2;
            samples.push(wave * env * volume);
        }
    }

    /// Background theme: a slow A-minor bass walk, eight bars that loop
    /// cleanly. Low volume so the console stays the star.
    fn gen_theme() -> Vec<f32> {
        let walk = [
            110.00_f32, 130.81, 164.81, 130.81, // A2 C3 E3 C3
            98.00, 123.47, 146.83, 123.47,      // G2 B2 D3 B2
        ];
        let mut samples = Vec::new();
        for &freq in &walk {
            push_note(&mut samples, freq, 0.42, 0.30);
        }
        samples
    }

    /// Vault unlocked: ascending minor arpeggio, then a held top note.
    fn gen_unlock() -> Vec<f32> {
        let notes = [440.0_f32, 523.25, 659.25]; // A4 C5 E5
        let mut samples = Vec::new();
        for &freq in &notes {
            push_note(&mut samples, freq, 0.09, 0.3);
        }
        push_note(&mut samples, 880.0, 0.25, 0.3); // A5
        samples
    }

    /// Wrong or invalid code: two short low buzzes.
    fn gen_deny() -> Vec<f32> {
        let mut samples = Vec::new();
        for _ in 0..2 {
            let n = (SAMPLE_RATE as f32 * 0.09) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                // Square-ish buzz (sine + 3rd harmonic)
                let wave = (t * 110.0 * TAU).sin() * 0.7 + (t * 330.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
            let gap = (SAMPLE_RATE as f32 * 0.05) as usize;
            samples.extend(std::iter::repeat(0.0).take(gap));
        }
        samples
    }

    /// Final message revealed: rising shimmer, two octaves of E.
    fn gen_reveal() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.5) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let pos = i as f32 / n as f32;
                let env = (pos * 10.0).min(1.0) * (1.0 - pos);
                let glide = 329.63 + pos * 329.63; // E4 sweeping toward E5
                ((t * glide * TAU).sin() * 0.6 + (t * glide * 2.0 * TAU).sin() * 0.4)
                    * env
                    * 0.28
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn set_music(&self, _on: bool) {}
    pub fn play_unlock(&self) {}
    pub fn play_deny(&self) {}
    pub fn play_reveal(&self) {}
    pub fn play_stage_blip(&self) {}
}
