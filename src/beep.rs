use sdl2::audio::{AudioCallback, AudioSpec};

// pitch of the buzzer, in Hz
const TONE: f32 = 440.0;
const VOLUME: f32 = 0.10;

/// Square wave generator for the buzzer.
pub struct Beep {
    phase_inc: f32,
    phase: f32,
}

impl From<AudioSpec> for Beep {
    fn from(spec: AudioSpec) -> Self {
        Beep {
            phase_inc: TONE / spec.freq as f32,
            phase: 0.0,
        }
    }
}

impl AudioCallback for Beep {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        out.fill_with(|| {
            let sample = if self.phase < 0.5 { VOLUME } else { -VOLUME };
            self.phase = (self.phase + self.phase_inc).fract();
            sample
        });
    }
}
