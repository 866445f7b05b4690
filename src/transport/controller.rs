// Transport controller: play/pause, skipping, speed, looping and section repeat
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{PlayerError, Result};
use crate::format::{format_optional_time, format_rate, format_time};

use super::playback::{known_duration, Playback};

/// Everything the transport tracks for the lesson being listened to.
///
/// `section_repeat_active` implies both bounds are set and
/// `section_end > section_start`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    pub current_time: f64,
    pub duration: Option<f64>,
    pub playback_rate: f64,
    pub loop_enabled: bool,
    pub section_start: Option<f64>,
    pub section_end: Option<f64>,
    pub section_repeat_active: bool,
    pub media_unavailable: bool,
}

impl TransportState {
    pub fn new(playback_rate: f64) -> Self {
        Self {
            current_time: 0.0,
            duration: None,
            playback_rate,
            loop_enabled: false,
            section_start: None,
            section_end: None,
            section_repeat_active: false,
            media_unavailable: false,
        }
    }

    pub fn has_section(&self) -> bool {
        matches!((self.section_start, self.section_end), (Some(s), Some(e)) if e > s)
    }
}

/// Snapshot handed to the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportView {
    pub current_time: f64,
    pub current_label: String,
    pub duration: Option<f64>,
    pub duration_label: String,
    pub progress: f64,
    pub is_playing: bool,
    pub playback_rate: f64,
    pub rate_label: String,
    pub loop_enabled: bool,
    pub section_start: Option<f64>,
    pub section_end: Option<f64>,
    pub section_start_label: Option<String>,
    pub section_end_label: Option<String>,
    pub section_repeat_active: bool,
    pub media_unavailable: bool,
}

pub struct TransportController<P: Playback> {
    playback: P,
    state: TransportState,
    default_rate: f64,
    source: Option<PathBuf>,
    /// Bumped on every load and leave; events from older loads are stale
    generation: u64,
}

/// Rates must be finite and positive
pub fn check_rate(rate: f64) -> Result<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(PlayerError::InvalidPlaybackRate(rate))
    }
}

impl<P: Playback> TransportController<P> {
    pub fn new(playback: P, default_rate: f64) -> Self {
        Self {
            playback,
            state: TransportState::new(default_rate),
            default_rate,
            source: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an event stamped with `generation` belongs to the current load
    pub fn is_current(&self, generation: u64) -> bool {
        self.source.is_some() && generation == self.generation
    }

    /// Load a lesson's audio and reset all transport state
    pub fn load(&mut self, source: &Path) {
        log::info!("[Transport] Loading {:?}", source);
        self.playback.pause();
        self.generation += 1;
        self.state = TransportState::new(self.default_rate);
        self.playback.load(source, self.generation);
        self.state.playback_rate = self.playback.set_playback_rate(self.default_rate);
        self.playback.set_loop(false);
        self.source = Some(source.to_path_buf());
    }

    /// Pause and rewind, as when returning to the lesson list
    pub fn leave(&mut self) {
        if self.source.is_none() {
            return;
        }
        // Ticks already queued for this load would undo the rewind
        self.generation += 1;
        self.playback.pause();
        self.seek_to(0.0);
    }

    fn available(&self) -> bool {
        self.source.is_some() && !self.state.media_unavailable
    }

    pub fn is_playing(&self) -> bool {
        self.available() && !self.playback.is_paused()
    }

    pub fn duration(&self) -> Option<f64> {
        known_duration(self.state.duration).or_else(|| known_duration(self.playback.duration()))
    }

    /// Position as reported by the capability, falling back to the last tick
    fn position(&self) -> f64 {
        let t = self.playback.current_time();
        if t.is_finite() && t >= 0.0 {
            t
        } else {
            self.state.current_time
        }
    }

    fn seek_to(&mut self, seconds: f64) {
        self.playback.set_current_time(seconds);
        self.state.current_time = seconds;
    }

    pub fn play(&mut self) {
        if self.available() {
            self.playback.play();
        }
    }

    pub fn pause(&mut self) {
        if self.available() {
            self.playback.pause();
        }
    }

    /// Flip between playing and paused based on what the capability reports.
    /// Returns whether playback is now running.
    pub fn toggle(&mut self) -> bool {
        if !self.available() {
            return false;
        }
        if self.playback.is_paused() {
            self.playback.play();
        } else {
            self.playback.pause();
        }
        !self.playback.is_paused()
    }

    pub fn restart(&mut self) {
        if !self.available() {
            return;
        }
        self.seek_to(0.0);
        self.playback.play();
    }

    /// Move by `delta` seconds, clamped to `[0, duration]`
    pub fn seek_relative(&mut self, delta: f64) -> f64 {
        if !self.available() || !delta.is_finite() {
            return self.state.current_time;
        }
        let mut target = (self.position() + delta).max(0.0);
        if let Some(duration) = self.duration() {
            target = target.min(duration);
        }
        self.seek_to(target);
        target
    }

    /// Scrub to a fraction of the track. Ignored until the duration is known.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if !self.available() || !fraction.is_finite() {
            return;
        }
        if let Some(duration) = self.duration() {
            self.seek_to(fraction.clamp(0.0, 1.0) * duration);
        }
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<()> {
        check_rate(rate)?;
        if !self.available() {
            return Ok(());
        }
        let applied = self.playback.set_playback_rate(rate);
        if applied != rate {
            log::info!("[Transport] Rate {} limited to {}", rate, applied);
        }
        self.state.playback_rate = applied;
        Ok(())
    }

    pub fn set_loop(&mut self, enabled: bool) {
        if !self.available() {
            return;
        }
        self.state.loop_enabled = enabled;
        self.playback.set_loop(enabled);
    }

    pub fn toggle_loop(&mut self) -> bool {
        let enabled = !self.state.loop_enabled;
        self.set_loop(enabled);
        self.state.loop_enabled
    }

    /// Mark the current position as the section start.
    ///
    /// An existing end at or before the new start is dropped.
    pub fn mark_section_start(&mut self) -> Option<f64> {
        if !self.available() {
            return None;
        }
        let start = self.position();
        self.state.section_start = Some(start);
        if matches!(self.state.section_end, Some(end) if end <= start) {
            log::debug!("[Transport] Section end no longer after start, clearing it");
            self.state.section_end = None;
            self.state.section_repeat_active = false;
        }
        Some(start)
    }

    /// Mark the current position as the section end.
    ///
    /// Rejected with `InvalidSectionRange` when not strictly after the start;
    /// the previous end is left untouched.
    pub fn mark_section_end(&mut self) -> Result<Option<f64>> {
        if !self.available() {
            return Ok(None);
        }
        let end = self.position();
        if let Some(start) = self.state.section_start {
            if end <= start {
                return Err(PlayerError::InvalidSectionRange { start, end });
            }
        }
        self.state.section_end = Some(end);
        Ok(Some(end))
    }

    /// Turn section repeat on or off. Needs both bounds.
    /// Activating jumps to the section start and plays.
    pub fn toggle_section_repeat(&mut self) -> bool {
        if !self.available() {
            return self.state.section_repeat_active;
        }
        if self.state.section_repeat_active {
            self.state.section_repeat_active = false;
            return false;
        }
        let (Some(start), true) = (self.state.section_start, self.state.has_section()) else {
            return false;
        };
        self.state.section_repeat_active = true;
        self.seek_to(start);
        self.playback.play();
        log::debug!("[Transport] Section repeat on from {:.2}s", start);
        true
    }

    pub fn clear_section(&mut self) {
        self.state.section_start = None;
        self.state.section_end = None;
        self.state.section_repeat_active = false;
    }

    /// Position tick. Returns true when the section boundary sent playback
    /// back to the section start.
    pub fn on_position_update(&mut self, current_time: f64) -> bool {
        if !self.available() || !current_time.is_finite() {
            return false;
        }
        self.state.current_time = current_time.max(0.0);

        if !self.state.section_repeat_active {
            return false;
        }
        match (self.state.section_start, self.state.section_end) {
            (Some(start), Some(end)) if current_time >= end => {
                self.seek_to(start);
                true
            }
            _ => false,
        }
    }

    pub fn on_metadata(&mut self, duration: Option<f64>) {
        self.state.duration = known_duration(duration);
        log::debug!("[Transport] Duration {}", format_optional_time(self.state.duration));
    }

    pub fn on_playback_ended(&mut self) {
        if !self.available() {
            return;
        }
        if self.state.section_repeat_active {
            if let Some(start) = self.state.section_start {
                self.seek_to(start);
                self.playback.play();
            }
            return;
        }
        if self.state.loop_enabled {
            return;
        }
        self.playback.pause();
        self.seek_to(0.0);
    }

    /// The source failed to load. Controls stay inert until the next `load`.
    pub fn on_media_error(&mut self, message: &str) -> PlayerError {
        log::warn!("[Transport] Media error for {:?}: {}", self.source, message);
        self.playback.pause();
        self.state.media_unavailable = true;
        self.state.section_repeat_active = false;
        PlayerError::MediaLoad(message.to_string())
    }

    /// Fraction of the track played, 0 while the duration is unknown
    pub fn progress(&self) -> f64 {
        match self.duration() {
            Some(duration) => (self.state.current_time / duration).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    pub fn view(&self) -> TransportView {
        let state = &self.state;
        let duration = self.duration();
        TransportView {
            current_time: state.current_time,
            current_label: format_time(state.current_time),
            duration,
            duration_label: format_optional_time(duration),
            progress: self.progress(),
            is_playing: self.is_playing(),
            playback_rate: state.playback_rate,
            rate_label: format_rate(state.playback_rate),
            loop_enabled: state.loop_enabled,
            section_start: state.section_start,
            section_end: state.section_end,
            section_start_label: state.section_start.map(format_time),
            section_end_label: state.section_end.map(format_time),
            section_repeat_active: state.section_repeat_active,
            media_unavailable: state.media_unavailable,
        }
    }
}
