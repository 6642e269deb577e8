use beep::beep;
use std::error::Error;

pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }

    pub fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        beep(SIMPLEBEEP_PITCH)?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        beep(0)?;
        self.is_beeping = false;
        Ok(())
    }
}

#[derive(Default)]
pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// Turns the sound timer into start/stop edges: one `beep` when the timer
/// goes non-zero, one `stop` when it runs out, nothing on the ticks between.
pub struct Buzzer<S> {
    sound: S,
    active: bool,
}

impl<S: Sound> Buzzer<S> {
    pub fn new(sound: S) -> Self {
        Buzzer {
            sound,
            active: false,
        }
    }

    /// call once per timer tick with the current sound timer
    pub fn update(&mut self, sound_timer: u8) -> Result<(), Box<dyn Error>> {
        let should_sound = sound_timer > 0;
        if should_sound == self.active {
            return Ok(());
        }
        if should_sound {
            log::trace!("buzzer on");
            self.sound.beep()?;
        } else {
            log::trace!("buzzer off");
            self.sound.stop()?;
        }
        self.active = should_sound;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// silence the buzzer, e.g. when the host stops
    pub fn silence(&mut self) -> Result<(), Box<dyn Error>> {
        self.update(0)
    }

    pub fn into_inner(self) -> S {
        self.sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// counts calls instead of making noise
    #[derive(Default)]
    struct CountingSound {
        beeps: usize,
        stops: usize,
    }

    impl Sound for CountingSound {
        fn beep(&mut self) -> Result<(), Box<dyn Error>> {
            self.beeps += 1;
            Ok(())
        }
        fn stop(&mut self) -> Result<(), Box<dyn Error>> {
            self.stops += 1;
            Ok(())
        }
    }

    #[test]
    fn test_one_beep_per_activation() -> Result<(), Box<dyn Error>> {
        let mut b = Buzzer::new(CountingSound::default());
        for t in [0, 5, 4, 3, 2, 1, 0, 0, 2, 1, 0] {
            b.update(t)?;
        }
        let s = b.into_inner();
        assert_eq!(s.beeps, 2);
        assert_eq!(s.stops, 2);
        Ok(())
    }

    #[test]
    fn test_silence() -> Result<(), Box<dyn Error>> {
        let mut b = Buzzer::new(CountingSound::default());
        b.update(3)?;
        assert!(b.is_active());
        b.silence()?;
        assert!(!b.is_active());
        b.silence()?;
        assert_eq!(b.into_inner().stops, 1);
        Ok(())
    }

    #[test]
    fn test_mute_never_fails() -> Result<(), Box<dyn Error>> {
        let mut b = Buzzer::new(Mute::new());
        b.update(1)?;
        b.update(0)?;
        Ok(())
    }
}
