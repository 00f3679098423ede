//! Durable local mirror of the note collection.
//!
//! The cache is always derived from the canonical in-memory list, never an
//! independent source of truth once the store is live. It exists so the
//! application stays usable when the remote note service is unreachable, at
//! the cost of staleness.
use crate::note::{Note, NoteId};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub(crate) const NOTES_FILE: &str = "notes.json";
pub(crate) const SELECTED_NOTE_FILE: &str = "selected_note.json";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("io error")]
    IOError(#[from] std::io::Error),
    #[error("serde error")]
    SerdeError(#[from] serde_json::Error),
}

/// Tolerant deserialization target for cached notes.
///
/// Cached records may predate the current schema: the oldest shape carried a
/// single `text` field instead of `title`/`content`, and `tags`/`isEncrypted`
/// were added later. Loading normalizes all of them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    pinned: Option<bool>,
    #[serde(default)]
    is_encrypted: Option<bool>,
    #[serde(default)]
    encrypted_content: Option<String>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Note {
        let (title, content) = if let Some(text) = record.text {
            // legacy shape: a bare text body, no separate title
            ("Untitled".to_owned(), text)
        } else {
            (
                record.title.unwrap_or_default(),
                record.content.unwrap_or_default(),
            )
        };
        Note {
            id: NoteId::new(record.id),
            title,
            content,
            tags: record.tags.unwrap_or_default(),
            pinned: record.pinned.unwrap_or(false),
            is_encrypted: record.is_encrypted.unwrap_or(false),
            encrypted_content: record.encrypted_content,
            updated_at: record.updated_at,
            created_at: record.created_at.unwrap_or(record.updated_at),
        }
    }
}

/// File-backed cache: one JSON document for the collection, one for the
/// selected note. Clearing the selection removes its file.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        LocalCache {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn notes_path(&self) -> PathBuf {
        self.dir.join(NOTES_FILE)
    }

    fn selected_path(&self) -> PathBuf {
        self.dir.join(SELECTED_NOTE_FILE)
    }

    pub fn save_notes(&self, notes: &[Note]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let mut f = File::create(self.notes_path())?;
        f.write_all(&serde_json::to_vec(notes)?)?;
        Ok(())
    }

    pub fn load_notes(&self) -> Result<Vec<Note>, CacheError> {
        let contents = match fs::read_to_string(self.notes_path()) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let records: Vec<NoteRecord> = serde_json::from_str(&contents)?;
        Ok(records.into_iter().map(Note::from).collect())
    }

    pub fn save_selected(&self, selected: Option<&Note>) -> Result<(), CacheError> {
        match selected {
            Some(note) => {
                fs::create_dir_all(&self.dir)?;
                let mut f = File::create(self.selected_path())?;
                f.write_all(&serde_json::to_vec(note)?)?;
            }
            None => {
                if let Err(e) = fs::remove_file(self.selected_path()) {
                    if e.kind() != ErrorKind::NotFound {
                        return Err(e.into());
                    }
                }
            }
        }
        Ok(())
    }

    pub fn load_selected(&self) -> Result<Option<Note>, CacheError> {
        let contents = match fs::read_to_string(self.selected_path()) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: NoteRecord = serde_json::from_str(&contents)?;
        Ok(Some(record.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteDraft;
    use tempfile::tempdir;

    fn sample_note(id: &str, title: &str) -> Note {
        NoteDraft {
            title: title.to_owned(),
            content: format!("<p>{}</p>", title),
            ..Default::default()
        }
        .into_note(NoteId::new(id.into()))
    }

    #[test]
    fn notes_round_trip() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let notes = vec![sample_note("a", "First"), sample_note("b", "Second")];
        cache.save_notes(&notes).unwrap();
        assert_eq!(cache.load_notes().unwrap(), notes);
    }

    #[test]
    fn missing_files_load_as_empty() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("never-written"));
        assert!(cache.load_notes().unwrap().is_empty());
        assert_eq!(cache.load_selected().unwrap(), None);
    }

    #[test]
    fn selected_note_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let note = sample_note("a", "First");
        cache.save_selected(Some(&note)).unwrap();
        assert_eq!(cache.load_selected().unwrap(), Some(note));
        cache.save_selected(None).unwrap();
        assert_eq!(cache.load_selected().unwrap(), None);
        // clearing twice is fine
        cache.save_selected(None).unwrap();
    }

    #[test]
    fn legacy_records_are_normalized() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(
            dir.path().join(NOTES_FILE),
            r#"[
                {"id":"old","text":"<p>plain body</p>","updatedAt":"2020-05-01T10:00:00Z"},
                {"id":"mid","title":"Titled","content":"<p>c</p>","updatedAt":"2021-05-01T10:00:00Z"}
            ]"#,
        )
        .unwrap();

        let notes = cache.load_notes().unwrap();
        assert_eq!(notes.len(), 2);

        let old = &notes[0];
        assert_eq!(old.title, "Untitled");
        assert_eq!(old.content, "<p>plain body</p>");
        assert!(old.tags.is_empty());
        assert!(!old.is_encrypted);
        assert_eq!(old.created_at, old.updated_at);

        let mid = &notes[1];
        assert_eq!(mid.title, "Titled");
        assert!(!mid.pinned);
    }

    #[test]
    fn corrupt_collection_is_an_error() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        fs::write(dir.path().join(NOTES_FILE), "{ not json").unwrap();
        assert!(matches!(
            cache.load_notes(),
            Err(CacheError::SerdeError(_))
        ));
    }
}
