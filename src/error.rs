// Error types shared across the player
use std::path::PathBuf;

use thiserror::Error;

use crate::content::LessonId;

/// Failures while reading the lesson and vocabulary documents at startup
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("lesson id {0} appears more than once")]
    DuplicateLesson(LessonId),
}

#[derive(Debug, Error)]
pub enum PlayerError {
    /// Fatal: the session cannot start without content.
    #[error("error loading lessons: {0}")]
    ContentLoad(#[from] ContentError),

    /// Section end must be strictly after section start.
    #[error("section end {end:.2}s must be after section start {start:.2}s")]
    InvalidSectionRange { start: f64, end: f64 },

    #[error("error loading audio: {0}")]
    MediaLoad(String),

    #[error("playback rate must be a positive number, got {0}")]
    InvalidPlaybackRate(f64),

    #[error("no lesson with id {0}")]
    UnknownLesson(LessonId),

    #[error("choose listening or vocabulary first")]
    NoModeSelected,

    #[error("content is not available")]
    SessionHalted,

    #[error("settings error: {0}")]
    Settings(String),
}

pub type Result<T, E = PlayerError> = std::result::Result<T, E>;
