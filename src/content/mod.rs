// Lesson content module
// Lessons and vocabulary are read once at startup and never mutated

pub mod documents;
pub mod models;
pub mod store;

pub use models::{Lesson, LessonId, LessonSummary, Level, VocabularyEntry};
pub use store::ContentStore;
