// Session module
// Top-level controller owning content, transport and flashcards

pub mod controller;
pub mod keys;
pub mod mode;

pub use controller::{Session, SessionView};
pub use keys::Key;
pub use mode::{Mode, Screen, Stage};
