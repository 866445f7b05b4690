// Stand-in playback for machines without an audio output
use std::path::Path;
use std::sync::mpsc::Sender;

use super::playback::{Playback, PlaybackEvent, SourceEvent};

pub const NO_OUTPUT_DEVICE: &str = "no audio output device";

/// Never plays anything. Each load is answered with a load error, so the
/// player shows its notice and keeps its controls inert.
pub struct UnavailablePlayback {
    events: Sender<SourceEvent>,
}

impl UnavailablePlayback {
    pub fn new(events: Sender<SourceEvent>) -> Self {
        Self { events }
    }
}

impl Playback for UnavailablePlayback {
    fn load(&mut self, source: &Path, generation: u64) {
        log::debug!("[Transport] No output for {:?}", source);
        let event = PlaybackEvent::LoadError(NO_OUTPUT_DEVICE.to_string());
        if self.events.send(SourceEvent::new(generation, event)).is_err() {
            log::warn!("[Transport] Event channel closed");
        }
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn is_paused(&self) -> bool {
        true
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn set_current_time(&mut self, _seconds: f64) {}

    fn duration(&self) -> Option<f64> {
        None
    }

    fn set_playback_rate(&mut self, rate: f64) -> f64 {
        rate
    }

    fn set_loop(&mut self, _enabled: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_load_reports_missing_device() {
        let (tx, rx) = mpsc::channel();
        let mut playback = UnavailablePlayback::new(tx);
        playback.load(Path::new("lesson1.mp3"), 7);
        playback.play();

        let received = rx.try_recv().unwrap();
        assert_eq!(received.generation, 7);
        assert_eq!(
            received.event,
            PlaybackEvent::LoadError(NO_OUTPUT_DEVICE.to_string())
        );
        assert!(playback.is_paused());
        assert!(rx.try_recv().is_err());
    }
}
