// Session controller
//
// Owns every piece of mutable state in the app. The UI calls in with user
// actions and playback events, then renders `view()`.
use serde::Serialize;

use crate::content::{ContentStore, Lesson, LessonId, LessonSummary};
use crate::error::{PlayerError, Result};
use crate::flashcards::{CardField, CardView, FlashcardController};
use crate::settings::AppSettings;
use crate::speech::{Narrator, SpeechSynth};
use crate::transport::{
    check_rate, Playback, PlaybackEvent, SourceEvent, TransportController, TransportView,
};

use super::keys::Key;
use super::mode::{Mode, Screen, Stage};

enum Phase {
    Loading,
    Ready(ContentStore),
    Failed(String),
}

/// Everything the UI needs to render one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub screen: Screen,
    pub mode: Mode,
    pub lessons: Vec<LessonSummary>,
    pub lesson: Option<Lesson>,
    pub transport: Option<TransportView>,
    pub card: Option<CardView>,
    pub vocabulary_empty: bool,
    pub rate_options: Vec<f64>,
    pub notice: Option<String>,
    pub load_error: Option<String>,
}

pub struct Session<P: Playback, S: SpeechSynth> {
    phase: Phase,
    mode: Mode,
    stage: Stage,
    lesson: Option<LessonId>,
    transport: TransportController<P>,
    flashcards: FlashcardController<S>,
    skip_seconds: f64,
    rate_options: Vec<f64>,
    notice: Option<String>,
}

impl<P: Playback, S: SpeechSynth> Session<P, S> {
    pub fn new(playback: P, synth: S, settings: &AppSettings) -> Self {
        Self {
            phase: Phase::Loading,
            mode: Mode::Unselected,
            stage: Stage::Browse,
            lesson: None,
            transport: TransportController::new(playback, settings.playback.default_rate),
            flashcards: FlashcardController::new(Narrator::new(synth, settings.speech.clone())),
            skip_seconds: settings.playback.skip_seconds,
            rate_options: settings.playback.rate_options.clone(),
            notice: None,
        }
    }

    /// Leave the loading phase. A failure is terminal.
    pub fn finish_loading(&mut self, content: Result<ContentStore>) {
        if !matches!(self.phase, Phase::Loading) {
            log::warn!("[Session] Content already settled, ignoring second load");
            return;
        }
        self.phase = match content {
            Ok(store) => Phase::Ready(store),
            Err(e) => {
                log::error!("[Session] {}", e);
                Phase::Failed(e.to_string())
            }
        };
    }

    pub fn content(&self) -> Result<&ContentStore> {
        match &self.phase {
            Phase::Ready(store) => Ok(store),
            _ => Err(PlayerError::SessionHalted),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_lesson(&self) -> Option<LessonId> {
        self.lesson
    }

    pub fn transport(&self) -> &TransportController<P> {
        &self.transport
    }

    pub fn flashcards(&self) -> &FlashcardController<S> {
        &self.flashcards
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn screen(&self) -> Screen {
        match self.phase {
            Phase::Loading => Screen::Loading,
            Phase::Failed(_) => Screen::LoadError,
            Phase::Ready(_) => Screen::for_mode(self.mode, self.stage),
        }
    }

    fn on_screen(&self, screen: Screen) -> bool {
        self.screen() == screen
    }

    /// Stop whatever the active view is doing before it is hidden
    fn leave_active(&mut self) {
        if self.stage != Stage::Active {
            return;
        }
        match self.mode {
            Mode::Listening => self.transport.leave(),
            Mode::Vocabulary => self.flashcards.stop_speaking(),
            Mode::Unselected => {}
        }
    }

    pub fn select_mode(&mut self, mode: Mode) -> Result<()> {
        self.content()?;
        self.leave_active();
        self.mode = mode;
        self.stage = Stage::Browse;
        self.lesson = None;
        self.notice = None;
        log::info!("[Session] Mode {:?}", mode);
        Ok(())
    }

    pub fn back_to_modes(&mut self) -> Result<()> {
        self.select_mode(Mode::Unselected)
    }

    pub fn back_to_browse(&mut self) -> Result<()> {
        self.content()?;
        self.leave_active();
        self.stage = Stage::Browse;
        self.lesson = None;
        self.notice = None;
        Ok(())
    }

    /// Enter a lesson in the current mode. Listening reloads the audio and
    /// resets the transport; vocabulary deals a fresh deck.
    pub fn open_lesson(&mut self, id: LessonId) -> Result<()> {
        let store = self.content()?;
        let lesson = store.lesson(id).ok_or(PlayerError::UnknownLesson(id))?;

        match self.mode {
            Mode::Unselected => return Err(PlayerError::NoModeSelected),
            Mode::Listening => {
                let audio = lesson.audio.clone();
                self.leave_active();
                self.transport.load(&audio);
            }
            Mode::Vocabulary => {
                let entries = store.vocabulary_for(id);
                self.leave_active();
                self.flashcards.load_set(entries);
            }
        }

        self.stage = Stage::Active;
        self.lesson = Some(id);
        self.notice = None;
        log::info!("[Session] Opened lesson {} in {:?}", id, self.mode);
        Ok(())
    }

    /// Keyboard shortcuts for the visible view. Returns whether the key was used.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match self.screen() {
            Screen::Player => match key {
                Key::Space => {
                    self.transport.toggle();
                }
                Key::ArrowLeft => {
                    self.transport.seek_relative(-self.skip_seconds);
                }
                Key::ArrowRight => {
                    self.transport.seek_relative(self.skip_seconds);
                }
                Key::Char('r' | 'R') => self.transport.restart(),
                Key::Char('l' | 'L') => {
                    self.transport.toggle_loop();
                }
                Key::Char(_) => return false,
            },
            Screen::Flashcards => match key {
                Key::Space => {
                    self.flashcards.flip();
                }
                Key::ArrowLeft => {
                    self.flashcards.previous();
                }
                Key::ArrowRight => {
                    self.flashcards.next();
                }
                Key::Char(_) => return false,
            },
            _ => return false,
        }
        true
    }

    // Transport actions, inert unless the player is showing

    pub fn toggle_playback(&mut self) -> bool {
        self.on_screen(Screen::Player) && self.transport.toggle()
    }

    pub fn restart(&mut self) {
        if self.on_screen(Screen::Player) {
            self.transport.restart();
        }
    }

    pub fn skip_back(&mut self) -> f64 {
        self.seek_relative(-self.skip_seconds)
    }

    pub fn skip_forward(&mut self) -> f64 {
        self.seek_relative(self.skip_seconds)
    }

    pub fn seek_relative(&mut self, delta: f64) -> f64 {
        if !self.on_screen(Screen::Player) {
            return self.transport.state().current_time;
        }
        self.transport.seek_relative(delta)
    }

    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if self.on_screen(Screen::Player) {
            self.transport.seek_to_fraction(fraction);
        }
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<()> {
        check_rate(rate)?;
        if !self.on_screen(Screen::Player) {
            return Ok(());
        }
        self.transport.set_rate(rate)
    }

    pub fn set_loop(&mut self, enabled: bool) {
        if self.on_screen(Screen::Player) {
            self.transport.set_loop(enabled);
        }
    }

    pub fn toggle_loop(&mut self) -> bool {
        if self.on_screen(Screen::Player) {
            self.transport.toggle_loop();
        }
        self.transport.state().loop_enabled
    }

    pub fn mark_section_start(&mut self) -> Option<f64> {
        if !self.on_screen(Screen::Player) {
            return None;
        }
        self.transport.mark_section_start()
    }

    /// A rejected end is reported and also left as the user notice
    pub fn mark_section_end(&mut self) -> Result<Option<f64>> {
        if !self.on_screen(Screen::Player) {
            return Ok(None);
        }
        match self.transport.mark_section_end() {
            Ok(end) => {
                self.notice = None;
                Ok(end)
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn toggle_section_repeat(&mut self) -> bool {
        if self.on_screen(Screen::Player) {
            self.transport.toggle_section_repeat();
        }
        self.transport.state().section_repeat_active
    }

    pub fn clear_section(&mut self) {
        if self.on_screen(Screen::Player) {
            self.transport.clear_section();
        }
    }

    // Flashcard actions, inert unless the deck is showing

    pub fn flip_card(&mut self) -> bool {
        self.on_screen(Screen::Flashcards) && self.flashcards.flip()
    }

    pub fn next_card(&mut self) -> bool {
        self.on_screen(Screen::Flashcards) && self.flashcards.next()
    }

    pub fn previous_card(&mut self) -> bool {
        self.on_screen(Screen::Flashcards) && self.flashcards.previous()
    }

    pub fn shuffle_cards(&mut self) {
        if self.on_screen(Screen::Flashcards) {
            self.flashcards.shuffle();
        }
    }

    pub fn speak_field(&mut self, field: CardField, rate: Option<f32>) -> bool {
        self.on_screen(Screen::Flashcards) && self.flashcards.speak_field(field, rate)
    }

    // Capability events

    pub fn on_position_update(&mut self, current_time: f64) {
        self.transport.on_position_update(current_time);
    }

    pub fn on_metadata(&mut self, duration: Option<f64>) {
        self.transport.on_metadata(duration);
    }

    pub fn on_playback_ended(&mut self) {
        self.transport.on_playback_ended();
    }

    pub fn on_media_error(&mut self, message: &str) {
        let error = self.transport.on_media_error(message);
        if self.on_screen(Screen::Player) {
            self.notice = Some(error.to_string());
        }
    }

    /// Route a capability event. Events from an earlier load, or queued
    /// before the player was left, are dropped. Returns whether it applied.
    pub fn apply_event(&mut self, stamped: SourceEvent) -> bool {
        if !self.transport.is_current(stamped.generation) {
            log::debug!(
                "[Session] Dropping stale {:?} from load {}",
                stamped.event,
                stamped.generation
            );
            return false;
        }
        match stamped.event {
            PlaybackEvent::Position(t) => self.on_position_update(t),
            PlaybackEvent::MetadataReady(duration) => self.on_metadata(duration),
            PlaybackEvent::Ended => self.on_playback_ended(),
            PlaybackEvent::LoadError(message) => self.on_media_error(&message),
        }
        true
    }

    pub fn on_voices_changed(&mut self) {
        self.flashcards.narrator_mut().on_voices_changed();
    }

    pub fn view(&self) -> SessionView {
        let screen = self.screen();
        let store = self.content().ok();
        let load_error = match &self.phase {
            Phase::Failed(message) => Some(message.clone()),
            _ => None,
        };

        SessionView {
            screen,
            mode: self.mode,
            lessons: store.map(ContentStore::summaries).unwrap_or_default(),
            lesson: store
                .zip(self.lesson)
                .and_then(|(store, id)| store.lesson(id).cloned()),
            transport: (screen == Screen::Player).then(|| self.transport.view()),
            card: (screen == Screen::Flashcards)
                .then(|| self.flashcards.view())
                .flatten(),
            vocabulary_empty: screen == Screen::Flashcards && self.flashcards.deck().is_empty(),
            rate_options: self.rate_options.clone(),
            notice: self.notice.clone(),
            load_error,
        }
    }
}
