// Flashcard deck navigation
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::content::VocabularyEntry;

/// Cards for one lesson, the card on screen and which side is up.
/// A card always comes up front first.
#[derive(Debug, Clone, Default)]
pub struct FlashcardDeck {
    cards: Vec<VocabularyEntry>,
    index: usize,
    flipped: bool,
}

/// What the flashcard view shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub term: String,
    pub definition: String,
    pub example: Option<String>,
    pub flipped: bool,
    pub index: usize,
    pub total: usize,
    pub position: String,
    pub is_first: bool,
    pub is_last: bool,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<VocabularyEntry>) -> Self {
        Self {
            cards,
            index: 0,
            flipped: false,
        }
    }

    /// Replace the cards and start over at the first one
    pub fn load_set(&mut self, cards: Vec<VocabularyEntry>) {
        self.cards = cards;
        self.index = 0;
        self.flipped = false;
    }

    pub fn cards(&self) -> &[VocabularyEntry] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn current(&self) -> Option<&VocabularyEntry> {
        self.cards.get(self.index)
    }

    pub fn flip(&mut self) -> bool {
        if !self.is_empty() {
            self.flipped = !self.flipped;
        }
        self.flipped
    }

    /// Returns false at the last card
    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.cards.len() {
            return false;
        }
        self.index += 1;
        self.flipped = false;
        true
    }

    /// Returns false at the first card
    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.flipped = false;
        true
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.index = 0;
        self.flipped = false;
    }

    pub fn view(&self) -> Option<CardView> {
        let card = self.current()?;
        Some(CardView {
            term: card.term.clone(),
            definition: card.definition.clone(),
            example: card.example.clone(),
            flipped: self.flipped,
            index: self.index,
            total: self.cards.len(),
            position: format!("{} / {}", self.index + 1, self.cards.len()),
            is_first: self.index == 0,
            is_last: self.index + 1 == self.cards.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(term: &str) -> VocabularyEntry {
        VocabularyEntry {
            lesson_id: 1,
            term: term.to_string(),
            definition: format!("meaning of {}", term),
            example: None,
        }
    }

    fn deck(n: usize) -> FlashcardDeck {
        FlashcardDeck::new((0..n).map(|i| entry(&format!("term{}", i))).collect())
    }

    #[test]
    fn test_next_clamps_at_last_card() {
        let mut deck = deck(3);
        assert!(deck.next());
        assert!(deck.next());
        assert!(!deck.next());
        assert_eq!(deck.index(), 2);
    }

    #[test]
    fn test_previous_at_first_card_is_noop() {
        let mut deck = deck(3);
        deck.flip();
        assert!(!deck.previous());
        assert_eq!(deck.index(), 0);
        assert!(deck.is_flipped());
    }

    #[test]
    fn test_moving_shows_front() {
        let mut deck = deck(3);
        deck.flip();
        deck.next();
        assert!(!deck.is_flipped());
        deck.flip();
        deck.previous();
        assert!(!deck.is_flipped());
    }

    #[test]
    fn test_flip_keeps_index() {
        let mut deck = deck(3);
        deck.next();
        assert!(deck.flip());
        assert!(!deck.flip());
        assert_eq!(deck.index(), 1);
    }

    #[test]
    fn test_shuffle_resets_and_keeps_cards() {
        let mut deck = deck(8);
        deck.next();
        deck.next();
        deck.flip();

        deck.shuffle_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(deck.index(), 0);
        assert!(!deck.is_flipped());

        let mut terms: Vec<_> = deck.cards().iter().map(|c| c.term.clone()).collect();
        terms.sort();
        let mut expected: Vec<_> = (0..8).map(|i| format!("term{}", i)).collect();
        expected.sort();
        assert_eq!(terms, expected);
    }

    #[test]
    fn test_load_set_resets() {
        let mut deck = deck(3);
        deck.next();
        deck.flip();
        deck.load_set(vec![entry("dose")]);
        assert_eq!(deck.index(), 0);
        assert!(!deck.is_flipped());
        assert_eq!(deck.current().unwrap().term, "dose");
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = FlashcardDeck::default();
        assert!(!deck.next());
        assert!(!deck.previous());
        assert!(!deck.flip());
        deck.shuffle();
        assert!(deck.current().is_none());
        assert!(deck.view().is_none());
    }

    #[test]
    fn test_view_position() {
        let mut deck = deck(5);
        deck.next();
        let view = deck.view().unwrap();
        assert_eq!(view.position, "2 / 5");
        assert_eq!(view.term, "term1");
        assert!(!view.is_first);
        assert!(!view.is_last);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Step {
            Next,
            Previous,
            Flip,
            Shuffle,
        }

        fn step() -> impl Strategy<Value = Step> {
            prop_oneof![
                Just(Step::Next),
                Just(Step::Previous),
                Just(Step::Flip),
                Just(Step::Shuffle),
            ]
        }

        fn sorted_terms(deck: &FlashcardDeck) -> Vec<String> {
            let mut terms: Vec<String> = deck.cards().iter().map(|c| c.term.clone()).collect();
            terms.sort();
            terms
        }

        proptest! {
            #[test]
            fn test_index_stays_on_a_card(
                len in 0usize..12,
                steps in prop::collection::vec(step(), 0..80),
                seed in any::<u64>(),
            ) {
                let mut deck = deck(len);
                let terms = sorted_terms(&deck);
                let mut rng = StdRng::seed_from_u64(seed);

                for step in steps {
                    let before = deck.index();
                    match step {
                        Step::Next => {
                            let moved = deck.next();
                            prop_assert_eq!(moved, len > 0 && before + 1 < len);
                            if moved {
                                prop_assert!(!deck.is_flipped());
                            }
                        }
                        Step::Previous => {
                            let moved = deck.previous();
                            prop_assert_eq!(moved, before > 0);
                            if moved {
                                prop_assert!(!deck.is_flipped());
                            }
                        }
                        Step::Flip => {
                            deck.flip();
                            prop_assert_eq!(deck.index(), before);
                        }
                        Step::Shuffle => {
                            deck.shuffle_with(&mut rng);
                            prop_assert_eq!(deck.index(), 0);
                            prop_assert!(!deck.is_flipped());
                            prop_assert_eq!(sorted_terms(&deck), terms.clone());
                        }
                    }

                    if len == 0 {
                        prop_assert_eq!(deck.index(), 0);
                        prop_assert!(deck.current().is_none());
                        prop_assert!(!deck.is_flipped());
                    } else {
                        prop_assert!(deck.index() < len);
                        prop_assert!(deck.current().is_some());
                    }
                }
            }
        }
    }
}
