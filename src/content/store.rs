// Loaded lesson content
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ContentError;
use crate::settings::ContentSettings;

use super::documents::{LegacyVocabulary, LessonsDocument, RawLesson, VocabularyDocument};
use super::models::{Lesson, LessonId, LessonSummary, VocabularyEntry};

/// Immutable after construction
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    lessons: Vec<Lesson>,
    vocabulary: Vec<VocabularyEntry>,
}

impl ContentStore {
    /// Read both documents concurrently and build the store
    pub async fn load(settings: &ContentSettings) -> Result<Self, ContentError> {
        let (lessons_json, vocabulary_json) = tokio::try_join!(
            read_document(&settings.lessons_file),
            read_document(&settings.vocabulary_file),
        )?;

        let lessons: LessonsDocument = parse_document(&settings.lessons_file, &lessons_json)?;
        let vocabulary: VocabularyDocument =
            parse_document(&settings.vocabulary_file, &vocabulary_json)?;

        let store = Self::from_documents(lessons, vocabulary, &settings.audio_dir)?;
        log::info!(
            "[Content] Loaded {} lessons and {} vocabulary entries",
            store.lessons.len(),
            store.vocabulary.len()
        );
        Ok(store)
    }

    /// Build from in-memory JSON text
    pub fn from_json(
        lessons_json: &str,
        vocabulary_json: &str,
        audio_dir: &Path,
    ) -> Result<Self, ContentError> {
        let lessons = parse_document(Path::new("<lessons>"), lessons_json)?;
        let vocabulary = parse_document(Path::new("<vocabulary>"), vocabulary_json)?;
        Self::from_documents(lessons, vocabulary, audio_dir)
    }

    pub fn from_documents(
        lessons: LessonsDocument,
        vocabulary: VocabularyDocument,
        audio_dir: &Path,
    ) -> Result<Self, ContentError> {
        let mut seen = HashSet::new();
        for lesson in &lessons.lessons {
            if !seen.insert(lesson.id) {
                return Err(ContentError::DuplicateLesson(lesson.id));
            }
        }

        let mut entries: Vec<VocabularyEntry> = Vec::with_capacity(vocabulary.vocabulary.len());
        for raw in vocabulary.vocabulary {
            if !seen.contains(&raw.lesson_id) {
                log::warn!(
                    "[Content] Dropping vocabulary '{}' for unknown lesson {}",
                    raw.term,
                    raw.lesson_id
                );
                continue;
            }
            entries.push(VocabularyEntry {
                lesson_id: raw.lesson_id,
                term: raw.term,
                definition: raw.definition,
                example: non_empty(raw.example),
            });
        }

        let covered: HashSet<LessonId> = entries.iter().map(|e| e.lesson_id).collect();
        let mut store_lessons = Vec::with_capacity(lessons.lessons.len());
        for raw in lessons.lessons {
            let RawLesson { id, title, level, category, text, audio_file, vocabulary } = raw;

            if !vocabulary.is_empty() {
                if covered.contains(&id) {
                    log::debug!("[Content] Ignoring inline vocabulary for lesson {}", id);
                } else {
                    log::warn!("[Content] Lesson {} uses inline vocabulary, converting", id);
                    entries.extend(vocabulary.into_iter().map(|legacy| normalize_legacy(id, legacy)));
                }
            }

            store_lessons.push(Lesson {
                id,
                title,
                level,
                category,
                text,
                audio: audio_path(audio_dir, id, audio_file.as_deref()),
            });
        }

        Ok(Self {
            lessons: store_lessons,
            vocabulary: entries,
        })
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Entries for one lesson in document order
    pub fn vocabulary_for(&self, id: LessonId) -> Vec<VocabularyEntry> {
        self.vocabulary
            .iter()
            .filter(|e| e.lesson_id == id)
            .cloned()
            .collect()
    }

    pub fn vocabulary_count(&self, id: LessonId) -> usize {
        self.vocabulary.iter().filter(|e| e.lesson_id == id).count()
    }

    pub fn summaries(&self) -> Vec<LessonSummary> {
        self.lessons
            .iter()
            .map(|l| LessonSummary {
                id: l.id,
                title: l.title.clone(),
                level: l.level.clone(),
                category: l.category.clone(),
                vocabulary_count: self.vocabulary_count(l.id),
            })
            .collect()
    }
}

async fn read_document(path: &Path) -> Result<String, ContentError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_document<T: serde::de::DeserializeOwned>(path: &Path, json: &str) -> Result<T, ContentError> {
    serde_json::from_str(json).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `audioFile` if given, else `lesson{id}.mp3`, both under `audio_dir`
fn audio_path(audio_dir: &Path, id: LessonId, audio_file: Option<&str>) -> PathBuf {
    match audio_file.map(str::trim).filter(|f| !f.is_empty()) {
        Some(file) => audio_dir.join(file),
        None => audio_dir.join(format!("lesson{}.mp3", id)),
    }
}

fn normalize_legacy(lesson_id: LessonId, legacy: LegacyVocabulary) -> VocabularyEntry {
    match legacy {
        LegacyVocabulary::Term(term) => VocabularyEntry {
            lesson_id,
            term,
            definition: String::new(),
            example: None,
        },
        LegacyVocabulary::Entry { term, definition, example } => VocabularyEntry {
            lesson_id,
            term,
            definition,
            example: non_empty(example),
        },
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Level;

    const LESSONS: &str = r#"{
        "lessons": [
            { "id": 1, "title": "At the Pharmacy", "level": "beginner", "category": "Dialogue",
              "text": "Good morning." },
            { "id": 2, "title": "Dosage", "level": "Upper-Intermediate", "category": "Clinical",
              "text": "Take two tablets.", "audioFile": "dosage.mp3" }
        ]
    }"#;

    const VOCABULARY: &str = r#"{
        "vocabulary": [
            { "lessonId": 1, "term": "prescription", "definition": "a written order for medicine",
              "example": "Do you have a prescription?" },
            { "lessonId": 2, "term": "dose", "definition": "an amount of medicine", "example": "" },
            { "lessonId": 1, "term": "counter", "definition": "where you are served" },
            { "lessonId": 9, "term": "orphan", "definition": "no lesson" }
        ]
    }"#;

    fn store() -> ContentStore {
        ContentStore::from_json(LESSONS, VOCABULARY, Path::new("assets/audio")).unwrap()
    }

    #[test]
    fn test_lessons_in_document_order() {
        let store = store();
        let ids: Vec<_> = store.lessons().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.lesson(1).unwrap().level, Level::Beginner);
        assert_eq!(
            store.lesson(2).unwrap().level,
            Level::Other("Upper-Intermediate".to_string())
        );
        assert!(store.lesson(3).is_none());
    }

    #[test]
    fn test_audio_path_derived_or_explicit() {
        let store = store();
        assert_eq!(store.lesson(1).unwrap().audio, Path::new("assets/audio/lesson1.mp3"));
        assert_eq!(store.lesson(2).unwrap().audio, Path::new("assets/audio/dosage.mp3"));
    }

    #[test]
    fn test_vocabulary_grouped_by_lesson() {
        let store = store();
        let terms: Vec<_> = store.vocabulary_for(1).into_iter().map(|e| e.term).collect();
        assert_eq!(terms, vec!["prescription", "counter"]);
        assert_eq!(store.vocabulary_count(2), 1);
        assert_eq!(store.vocabulary_for(2)[0].example, None);
        assert_eq!(store.vocabulary_count(9), 0);
    }

    #[test]
    fn test_summaries_carry_counts() {
        let summaries = store().summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].vocabulary_count, 2);
        assert_eq!(summaries[1].title, "Dosage");
    }

    #[test]
    fn test_duplicate_lesson_rejected() {
        let lessons = r#"{ "lessons": [
            { "id": 1, "title": "a", "level": "beginner" },
            { "id": 1, "title": "b", "level": "beginner" }
        ] }"#;
        let err = ContentStore::from_json(lessons, r#"{ "vocabulary": [] }"#, Path::new(".")).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateLesson(1)));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = ContentStore::from_json("{ \"lessons\": 3 }", r#"{ "vocabulary": [] }"#, Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }

    #[test]
    fn test_inline_vocabulary_is_normalized() {
        let lessons = r#"{ "lessons": [
            { "id": 1, "title": "a", "level": "beginner",
              "vocabulary": ["pharmacist", { "term": "tablet", "definition": "a pill" }] },
            { "id": 2, "title": "b", "level": "beginner", "vocabulary": ["ignored"] }
        ] }"#;
        let vocabulary = r#"{ "vocabulary": [
            { "lessonId": 2, "term": "capsule", "definition": "a soluble case" }
        ] }"#;
        let store = ContentStore::from_json(lessons, vocabulary, Path::new(".")).unwrap();

        let first = store.vocabulary_for(1);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].term, "pharmacist");
        assert_eq!(first[0].definition, "");
        assert_eq!(first[1].definition, "a pill");

        let second: Vec<_> = store.vocabulary_for(2).into_iter().map(|e| e.term).collect();
        assert_eq!(second, vec!["capsule"]);
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let lessons_file = dir.path().join("scripts.json");
        let vocabulary_file = dir.path().join("vocabulary.json");
        std::fs::write(&lessons_file, LESSONS).unwrap();
        std::fs::write(&vocabulary_file, VOCABULARY).unwrap();

        let settings = ContentSettings {
            lessons_file,
            vocabulary_file,
            audio_dir: dir.path().join("audio"),
        };
        let store = ContentStore::load(&settings).await.unwrap();
        assert_eq!(store.lessons().len(), 2);
        assert_eq!(store.lesson(1).unwrap().audio, dir.path().join("audio/lesson1.mp3"));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ContentSettings {
            lessons_file: dir.path().join("missing.json"),
            vocabulary_file: dir.path().join("missing-too.json"),
            audio_dir: dir.path().to_path_buf(),
        };
        let err = ContentStore::load(&settings).await.unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }
}
