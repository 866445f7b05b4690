// JSON document shapes as they appear on disk
//
// Nothing outside the content module sees these types; `ContentStore`
// normalizes them into `Lesson` and `VocabularyEntry`.
use serde::Deserialize;

use super::models::{LessonId, Level};

#[derive(Debug, Deserialize)]
pub struct LessonsDocument {
    pub lessons: Vec<RawLesson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLesson {
    pub id: LessonId,
    pub title: String,
    pub level: Level,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub audio_file: Option<String>,
    /// Older content files carried vocabulary inline on the lesson
    #[serde(default)]
    pub vocabulary: Vec<LegacyVocabulary>,
}

/// Inline vocabulary was either a bare term or a structured object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyVocabulary {
    Term(String),
    Entry {
        term: String,
        #[serde(default)]
        definition: String,
        #[serde(default)]
        example: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub struct VocabularyDocument {
    pub vocabulary: Vec<RawVocabularyEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVocabularyEntry {
    pub lesson_id: LessonId,
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}
