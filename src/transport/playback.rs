// Playback capability
//
// The transport controller never decodes audio itself. It drives something
// that can: the native engine in `crate::audio`, or a fake in tests.
use std::path::Path;

/// A media element that can load one source and play it
pub trait Playback {
    /// Start loading a new source. Every event emitted for it carries
    /// `generation`; failures arrive later as [`PlaybackEvent::LoadError`].
    fn load(&mut self, source: &Path, generation: u64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// `None` until metadata is known
    fn duration(&self) -> Option<f64>;
    /// Returns the rate actually applied, which may be clamped
    fn set_playback_rate(&mut self, rate: f64) -> f64;
    fn set_loop(&mut self, enabled: bool);
}

impl<P: Playback + ?Sized> Playback for Box<P> {
    fn load(&mut self, source: &Path, generation: u64) {
        (**self).load(source, generation)
    }

    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        (**self).set_current_time(seconds)
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }

    fn set_playback_rate(&mut self, rate: f64) -> f64 {
        (**self).set_playback_rate(rate)
    }

    fn set_loop(&mut self, enabled: bool) {
        (**self).set_loop(enabled)
    }
}

/// Notifications a playback capability emits while running
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Position(f64),
    MetadataReady(Option<f64>),
    Ended,
    LoadError(String),
}

/// A playback event tagged with the load it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub generation: u64,
    pub event: PlaybackEvent,
}

impl SourceEvent {
    pub fn new(generation: u64, event: PlaybackEvent) -> Self {
        Self { generation, event }
    }
}

/// Treat NaN, infinite and non-positive durations as unknown
pub fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}
