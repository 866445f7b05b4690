// Narrator: single-slot speech with voice selection
use crate::settings::SpeechSettings;

use super::{SpeechSynth, Utterance, Voice};

/// Wraps a speech engine so that at most one utterance is active.
/// A new request always cancels the previous one.
pub struct Narrator<S: SpeechSynth> {
    synth: S,
    settings: SpeechSettings,
    voice: Option<Voice>,
}

impl<S: SpeechSynth> Narrator<S> {
    pub fn new(synth: S, settings: SpeechSettings) -> Self {
        let mut narrator = Self {
            synth,
            settings,
            voice: None,
        };
        narrator.on_voices_changed();
        narrator
    }

    pub fn synth(&self) -> &S {
        &self.synth
    }

    pub fn synth_mut(&mut self) -> &mut S {
        &mut self.synth
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    /// The engine reported a new voice list
    pub fn on_voices_changed(&mut self) {
        let voices = self.synth.voices();
        self.voice = select_voice(
            &voices,
            &self.settings.language,
            self.settings.voice_hint.as_deref(),
        )
        .cloned();
        log::debug!(
            "[Speech] {} voices available, using {:?}",
            voices.len(),
            self.voice.as_ref().map(|v| v.name.as_str())
        );
    }

    /// Speak `text`, replacing anything already being said.
    /// `rate` overrides the configured rate. Blank text is ignored.
    pub fn speak(&mut self, text: &str, rate: Option<f32>) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let rate = rate
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(self.settings.rate);

        self.synth.cancel_active();
        self.synth.speak(&Utterance {
            text: text.to_string(),
            voice: self.voice.as_ref().map(|v| v.name.clone()),
            lang: self
                .voice
                .as_ref()
                .map(|v| v.lang.clone())
                .unwrap_or_else(|| self.settings.language.clone()),
            rate,
            pitch: self.settings.pitch,
        });
        true
    }

    pub fn cancel(&mut self) {
        self.synth.cancel_active();
    }
}

/// Hint match first, then exact language, then same primary language
pub fn select_voice<'a>(voices: &'a [Voice], language: &str, hint: Option<&str>) -> Option<&'a Voice> {
    if let Some(hint) = hint.map(str::to_lowercase).filter(|h| !h.is_empty()) {
        if let Some(voice) = voices.iter().find(|v| v.name.to_lowercase().contains(&hint)) {
            return Some(voice);
        }
    }

    let normalize = |tag: &str| tag.replace('_', "-").to_lowercase();
    let wanted = normalize(language);
    if let Some(voice) = voices.iter().find(|v| normalize(&v.lang) == wanted) {
        return Some(voice);
    }

    let primary = wanted.split('-').next().unwrap_or_default().to_string();
    voices
        .iter()
        .find(|v| normalize(&v.lang).split('-').next() == Some(primary.as_str()))
}
