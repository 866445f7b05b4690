// Modes, stages and the screen they select
use serde::{Deserialize, Serialize};

/// Top-level study context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Unselected,
    Listening,
    Vocabulary,
}

/// Within a mode: choosing a lesson, or working through one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Browse,
    Active,
}

/// The one view that is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Loading,
    LoadError,
    ModeSelect,
    LessonBrowse,
    Player,
    VocabBrowse,
    Flashcards,
}

impl Screen {
    pub fn for_mode(mode: Mode, stage: Stage) -> Self {
        match (mode, stage) {
            (Mode::Unselected, _) => Screen::ModeSelect,
            (Mode::Listening, Stage::Browse) => Screen::LessonBrowse,
            (Mode::Listening, Stage::Active) => Screen::Player,
            (Mode::Vocabulary, Stage::Browse) => Screen::VocabBrowse,
            (Mode::Vocabulary, Stage::Active) => Screen::Flashcards,
        }
    }
}
