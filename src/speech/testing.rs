// Recording speech capability for unit tests
use super::{SpeechSynth, Utterance, Voice};

#[derive(Debug, Default)]
pub struct FakeSynth {
    pub spoken: Vec<Utterance>,
    pub cancels: usize,
    pub available: Vec<Voice>,
    /// Number of utterances in flight, never above one if the caller cancels first
    pub active: usize,
    pub max_active: usize,
}

impl SpeechSynth for FakeSynth {
    fn speak(&mut self, utterance: &Utterance) {
        self.active += 1;
        self.max_active = self.max_active.max(self.active);
        self.spoken.push(utterance.clone());
    }

    fn cancel_active(&mut self) {
        self.cancels += 1;
        self.active = 0;
    }

    fn voices(&self) -> Vec<Voice> {
        self.available.clone()
    }
}

pub fn voice(name: &str, lang: &str) -> Voice {
    Voice {
        name: name.to_string(),
        lang: lang.to_string(),
    }
}
