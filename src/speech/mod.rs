// Text-to-speech module
// The speech engine itself is external; `Narrator` decides what it says and when

pub mod narrator;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};

pub use narrator::Narrator;

/// A voice the engine offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String, // BCP 47 tag, e.g. "en-GB"
}

/// One request to the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub text: String,
    pub voice: Option<String>,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Speech synthesis capability
pub trait SpeechSynth {
    fn speak(&mut self, utterance: &Utterance);
    /// Stop whatever is currently being spoken
    fn cancel_active(&mut self);
    /// Voices may show up some time after startup
    fn voices(&self) -> Vec<Voice>;
}
