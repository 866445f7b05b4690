// Flashcard controller: deck navigation plus reading cards aloud
use serde::Deserialize;

use crate::content::VocabularyEntry;
use crate::speech::{Narrator, SpeechSynth};

use super::deck::{CardView, FlashcardDeck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardField {
    Term,
    Definition,
    Example,
}

pub struct FlashcardController<S: SpeechSynth> {
    deck: FlashcardDeck,
    narrator: Narrator<S>,
}

impl<S: SpeechSynth> FlashcardController<S> {
    pub fn new(narrator: Narrator<S>) -> Self {
        Self {
            deck: FlashcardDeck::default(),
            narrator,
        }
    }

    pub fn deck(&self) -> &FlashcardDeck {
        &self.deck
    }

    pub fn narrator(&self) -> &Narrator<S> {
        &self.narrator
    }

    pub fn narrator_mut(&mut self) -> &mut Narrator<S> {
        &mut self.narrator
    }

    /// Start a fresh session on `entries`. An empty set is allowed and
    /// shows the placeholder view.
    pub fn load_set(&mut self, entries: Vec<VocabularyEntry>) {
        self.narrator.cancel();
        if entries.is_empty() {
            log::info!("[Flashcards] Lesson has no vocabulary");
        }
        self.deck.load_set(entries);
    }

    pub fn flip(&mut self) -> bool {
        self.deck.flip()
    }

    pub fn next(&mut self) -> bool {
        self.deck.next()
    }

    pub fn previous(&mut self) -> bool {
        self.deck.previous()
    }

    pub fn shuffle(&mut self) {
        self.deck.shuffle();
    }

    /// Read one side of the current card aloud
    pub fn speak_field(&mut self, field: CardField, rate: Option<f32>) -> bool {
        let Some(card) = self.deck.current() else {
            return false;
        };
        let text = match field {
            CardField::Term => card.term.clone(),
            CardField::Definition => card.definition.clone(),
            CardField::Example => card.example.clone().unwrap_or_default(),
        };
        self.narrator.speak(&text, rate)
    }

    pub fn stop_speaking(&mut self) {
        self.narrator.cancel();
    }

    pub fn view(&self) -> Option<CardView> {
        self.deck.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SpeechSettings;
    use crate::speech::testing::FakeSynth;

    fn controller() -> FlashcardController<FakeSynth> {
        let mut controller =
            FlashcardController::new(Narrator::new(FakeSynth::default(), SpeechSettings::default()));
        controller.load_set(vec![
            VocabularyEntry {
                lesson_id: 1,
                term: "prescription".to_string(),
                definition: "a written order for medicine".to_string(),
                example: Some("Do you have a prescription?".to_string()),
            },
            VocabularyEntry {
                lesson_id: 1,
                term: "counter".to_string(),
                definition: "where you are served".to_string(),
                example: None,
            },
        ]);
        controller
    }

    #[test]
    fn test_speak_each_field() {
        let mut controller = controller();
        assert!(controller.speak_field(CardField::Term, None));
        assert!(controller.speak_field(CardField::Definition, Some(0.7)));
        assert!(controller.speak_field(CardField::Example, None));

        let spoken: Vec<_> = controller
            .narrator()
            .synth()
            .spoken
            .iter()
            .map(|u| u.text.as_str())
            .collect();
        assert_eq!(
            spoken,
            vec![
                "prescription",
                "a written order for medicine",
                "Do you have a prescription?"
            ]
        );
        assert_eq!(controller.narrator().synth().max_active, 1);
    }

    #[test]
    fn test_missing_example_is_silent() {
        let mut controller = controller();
        controller.next();
        assert!(!controller.speak_field(CardField::Example, None));
    }

    #[test]
    fn test_empty_set_shows_placeholder() {
        let mut controller = controller();
        controller.load_set(Vec::new());
        assert!(controller.view().is_none());
        assert!(!controller.speak_field(CardField::Term, None));
        assert!(!controller.next());
    }

    #[test]
    fn test_field_names() {
        let field: CardField = serde_json::from_str("\"definition\"").unwrap();
        assert_eq!(field, CardField::Definition);
    }
}
