// Vocabulary flashcards module

pub mod controller;
pub mod deck;

pub use controller::{CardField, FlashcardController};
pub use deck::{CardView, FlashcardDeck};
