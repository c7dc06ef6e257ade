use parking_lot::Mutex;
use tilefall_ports::cue::{CueError, CuePort, HitCue};
use tilefall_ports::types::Volume01;

/// Polyphonic triangle-wave synth for hit cues. Each cue holds for its duration and then
/// releases; `render` mixes every live voice into a stereo buffer.
pub struct SimpleSynth {
    inner: Mutex<Inner>,
}

#[derive(Clone, Copy, Debug)]
pub struct Envelope {
    pub attack_secs: f32,
    pub decay_secs: f32,
    pub sustain_level: f32,
    pub release_secs: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack_secs: 0.005,
            decay_secs: 0.1,
            sustain_level: 0.1,
            release_secs: 0.2,
        }
    }
}

#[derive(Debug)]
struct Inner {
    sample_rate_hz: f32,
    max_voices: usize,
    volume: f32,
    envelope: Envelope,
    voices: Vec<Voice>,
    note_counter: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
    Done,
}

#[derive(Clone, Debug)]
struct Voice {
    note: u8,
    freq: f32,
    phase: f32,
    level: f32,
    stage: Stage,
    hold_samples_left: u32,
    release_step: f32,
    age: u64,
}

impl SimpleSynth {
    pub fn new(sample_rate_hz: u32, max_voices: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sample_rate_hz: sample_rate_hz as f32,
                max_voices: max_voices.max(1),
                volume: 0.8,
                envelope: Envelope::default(),
                voices: Vec::new(),
                note_counter: 0,
            }),
        }
    }

    pub fn set_volume(&self, volume: Volume01) {
        let mut inner = self.inner.lock();
        inner.volume = volume.get();
    }

    pub fn set_envelope(&self, envelope: Envelope) {
        let mut inner = self.inner.lock();
        inner.envelope = envelope;
    }

    pub fn active_voices(&self) -> usize {
        self.inner.lock().voices.len()
    }

    pub fn sounding_notes(&self) -> Vec<u8> {
        self.inner.lock().voices.iter().map(|voice| voice.note).collect()
    }

    pub fn render(&self, frames: usize, out_l: &mut [f32], out_r: &mut [f32]) {
        let mut inner = self.inner.lock();
        inner.render(frames, out_l, out_r);
    }
}

impl Default for SimpleSynth {
    fn default() -> Self {
        Self::new(48_000, 32)
    }
}

impl Inner {
    fn samples(&self, secs: f32) -> f32 {
        (secs * self.sample_rate_hz).max(1.0)
    }

    fn note_on(&mut self, note: u8, duration_secs: f32) {
        self.note_counter = self.note_counter.wrapping_add(1);

        if self.voices.len() >= self.max_voices {
            if let Some((idx, _)) = self
                .voices
                .iter()
                .enumerate()
                .min_by_key(|(_, voice)| voice.age)
            {
                self.voices.swap_remove(idx);
            }
        }

        let freq = 440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0);
        self.voices.push(Voice {
            note,
            freq,
            phase: 0.0,
            level: 0.0,
            stage: Stage::Attack,
            hold_samples_left: (duration_secs * self.sample_rate_hz).round() as u32,
            release_step: 0.0,
            age: self.note_counter,
        });
    }

    fn render(&mut self, frames: usize, out_l: &mut [f32], out_r: &mut [f32]) {
        let frames = frames.min(out_l.len()).min(out_r.len());
        for value in out_l[..frames].iter_mut() {
            *value = 0.0;
        }
        for value in out_r[..frames].iter_mut() {
            *value = 0.0;
        }

        let attack_step = 1.0 / self.samples(self.envelope.attack_secs);
        let sustain = self.envelope.sustain_level.clamp(0.0, 1.0);
        let decay_step = (1.0 - sustain) / self.samples(self.envelope.decay_secs);
        let release_samples = self.samples(self.envelope.release_secs);
        let amplitude = 0.2 * self.volume;

        for voice in &mut self.voices {
            let phase_step = voice.freq / self.sample_rate_hz;
            for i in 0..frames {
                if voice.stage == Stage::Done {
                    break;
                }

                if voice.hold_samples_left == 0 && voice.stage != Stage::Release {
                    voice.stage = Stage::Release;
                    voice.release_step = voice.level / release_samples;
                } else {
                    voice.hold_samples_left = voice.hold_samples_left.saturating_sub(1);
                }

                match voice.stage {
                    Stage::Attack => {
                        voice.level += attack_step;
                        if voice.level >= 1.0 {
                            voice.level = 1.0;
                            voice.stage = Stage::Decay;
                        }
                    }
                    Stage::Decay => {
                        voice.level -= decay_step;
                        if voice.level <= sustain {
                            voice.level = sustain;
                            voice.stage = Stage::Sustain;
                        }
                    }
                    Stage::Sustain => {}
                    Stage::Release => {
                        voice.level -= voice.release_step;
                        if voice.level <= 0.0 {
                            voice.level = 0.0;
                            voice.stage = Stage::Done;
                        }
                    }
                    Stage::Done => {}
                }

                let triangle = 4.0 * (voice.phase - 0.5).abs() - 1.0;
                let sample = triangle * voice.level * amplitude;
                out_l[i] += sample;
                out_r[i] += sample;
                voice.phase += phase_step;
                if voice.phase >= 1.0 {
                    voice.phase -= 1.0;
                }
            }
        }

        self.voices.retain(|voice| voice.stage != Stage::Done);
    }
}

impl CuePort for SimpleSynth {
    fn play_cue(&self, cue: &HitCue) -> Result<(), CueError> {
        if !cue.duration_secs.is_finite() || cue.duration_secs < 0.0 {
            return Err(CueError::Rejected(format!(
                "{} has invalid duration {}",
                cue.label, cue.duration_secs
            )));
        }
        let mut inner = self.inner.lock();
        inner.note_on(cue.midi_note, cue.duration_secs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(midi_note: u8, duration_secs: f32) -> HitCue {
        HitCue {
            midi_note,
            label: format!("midi {midi_note}"),
            duration_secs,
        }
    }

    #[test]
    fn cue_sounds_then_releases() {
        let synth = SimpleSynth::new(1_000, 8);
        synth.play_cue(&cue(69, 0.1)).unwrap();

        let mut l = vec![0.0; 50];
        let mut r = vec![0.0; 50];
        synth.render(50, &mut l, &mut r);
        assert!(l.iter().any(|s| s.abs() > 0.0));
        assert_eq!(l, r);
        assert_eq!(synth.active_voices(), 1);

        // 100 held samples plus a 200 sample release
        let mut l = vec![0.0; 300];
        let mut r = vec![0.0; 300];
        synth.render(300, &mut l, &mut r);
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn oldest_voice_is_stolen() {
        let synth = SimpleSynth::new(1_000, 2);
        synth.play_cue(&cue(60, 1.0)).unwrap();
        synth.play_cue(&cue(64, 1.0)).unwrap();
        synth.play_cue(&cue(67, 1.0)).unwrap();

        let mut notes = synth.sounding_notes();
        notes.sort_unstable();
        assert_eq!(notes, vec![64, 67]);
    }

    #[test]
    fn shorter_release_frees_the_voice_sooner() {
        let synth = SimpleSynth::new(1_000, 8);
        synth.set_envelope(Envelope {
            release_secs: 0.01,
            ..Envelope::default()
        });
        synth.play_cue(&cue(72, 0.05)).unwrap();

        let mut l = vec![0.0; 80];
        let mut r = vec![0.0; 80];
        synth.render(80, &mut l, &mut r);
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn rejects_negative_duration() {
        let synth = SimpleSynth::default();
        assert!(matches!(
            synth.play_cue(&cue(60, -1.0)),
            Err(CueError::Rejected(_))
        ));
        assert_eq!(synth.active_voices(), 0);
    }
}
