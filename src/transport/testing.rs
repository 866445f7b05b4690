// In-memory playback capability for unit tests
use std::path::{Path, PathBuf};

use super::playback::Playback;

#[derive(Debug)]
pub struct FakePlayback {
    pub position: f64,
    pub duration: Option<f64>,
    pub paused: bool,
    pub rate: f64,
    pub looping: bool,
    pub loaded: Vec<PathBuf>,
    pub generation: u64,
    /// Fastest rate this fake honours, if capped
    pub max_rate: Option<f64>,
}

impl Default for FakePlayback {
    fn default() -> Self {
        Self {
            position: 0.0,
            duration: None,
            paused: true,
            rate: 1.0,
            looping: false,
            loaded: Vec::new(),
            generation: 0,
            max_rate: None,
        }
    }
}

impl Playback for FakePlayback {
    fn load(&mut self, source: &Path, generation: u64) {
        self.loaded.push(source.to_path_buf());
        self.generation = generation;
        self.position = 0.0;
        self.duration = None;
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_playback_rate(&mut self, rate: f64) -> f64 {
        self.rate = self.max_rate.map_or(rate, |max| rate.min(max));
        self.rate
    }

    fn set_loop(&mut self, enabled: bool) {
        self.looping = enabled;
    }
}
