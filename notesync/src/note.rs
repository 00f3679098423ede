//! Core types of Notesync.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// ID of notes.
///
/// A [`NoteId`] is assigned by the remote note service on creation and is
/// stable for the note's lifetime. The client never reassigns it.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Hash)]
#[serde(into = "String", from = "String")]
pub struct NoteId {
    id: String,
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> String {
        id.id
    }
}

impl From<String> for NoteId {
    fn from(id: String) -> NoteId {
        NoteId::new(id)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> NoteId {
        NoteId::new(id.to_owned())
    }
}

impl NoteId {
    pub fn new(id: String) -> Self {
        NoteId { id }
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

/// A note as held in the canonical in-memory collection and on the wire.
///
/// Exactly one of the following holds at any time: `content` (and `title`)
/// are the authoritative plaintext, or `encrypted_content` is the
/// authoritative ciphertext and `content`/`title` hold decoy placeholders.
///
/// Wire and cache representation uses camelCase field names and RFC 3339
/// timestamps, parsed into [`DateTime<Utc>`] on ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_content: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add a tag, preserving insertion order. Tags form a set: adding a tag
    /// that is already present is a no-op and returns `false`.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_owned());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A new note as submitted by the client, before the remote service has
/// assigned an id and timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl NoteDraft {
    /// Materialize the draft with the given id, keeping its fields verbatim.
    ///
    /// Used on the degraded path where the remote service is unreachable and
    /// the note exists only locally. Title defaulting is the remote's job,
    /// so an empty draft title stays empty here.
    pub(crate) fn into_note(self, id: NoteId) -> Note {
        let now = Utc::now();
        Note {
            id,
            title: self.title,
            content: self.content,
            tags: self.tags,
            pinned: self.pinned,
            is_encrypted: false,
            encrypted_content: None,
            updated_at: now,
            created_at: now,
        }
    }
}

/// A partial update to an existing note.
///
/// `None` fields are left untouched. `encrypted_content` is doubly optional
/// so a patch can distinguish "leave alone" (outer `None`) from "clear"
/// (`Some(None)`, serialized as an explicit `null`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
    #[serde(
        default,
        with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub encrypted_content: Option<Option<String>>,
}

impl NotePatch {
    /// Merge the patch into `note`. The caller is responsible for refreshing
    /// `updated_at`.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(ref title) = self.title {
            note.title = title.clone();
        }
        if let Some(ref content) = self.content {
            note.content = content.clone();
        }
        if let Some(ref tags) = self.tags {
            note.tags = tags.clone();
        }
        if let Some(pinned) = self.pinned {
            note.pinned = pinned;
        }
        if let Some(is_encrypted) = self.is_encrypted {
            note.is_encrypted = is_encrypted;
        }
        if let Some(ref encrypted_content) = self.encrypted_content {
            note.encrypted_content = encrypted_content.clone();
        }
    }
}

/// Serde adapter distinguishing an absent key from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            // skip_serializing_if keeps the absent case off the wire
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> Note {
        NoteDraft {
            title: "Groceries".to_owned(),
            content: "<p>milk</p>".to_owned(),
            ..Default::default()
        }
        .into_note(NoteId::new("note-1".into()))
    }

    #[test]
    fn tags_are_a_set() {
        let mut note = sample_note();
        assert!(note.add_tag("shopping"));
        assert!(!note.add_tag("shopping"));
        assert_eq!(note.tags, vec!["shopping".to_owned()]);
    }

    #[test]
    fn tags_keep_insertion_order() {
        let mut note = sample_note();
        note.add_tag("b");
        note.add_tag("a");
        note.add_tag("c");
        assert_eq!(note.tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut note = sample_note();
        let patch = NotePatch {
            title: Some("Errands".to_owned()),
            ..Default::default()
        };
        patch.apply_to(&mut note);
        assert_eq!(note.title, "Errands");
        assert_eq!(note.content, "<p>milk</p>");
    }

    #[test]
    fn patch_clears_encrypted_content_with_explicit_null() {
        let mut note = sample_note();
        note.encrypted_content = Some("ciphertext".to_owned());
        let patch = NotePatch {
            encrypted_content: Some(None),
            ..Default::default()
        };
        patch.apply_to(&mut note);
        assert_eq!(note.encrypted_content, None);

        let untouched = NotePatch::default();
        note.encrypted_content = Some("ciphertext".to_owned());
        untouched.apply_to(&mut note);
        assert_eq!(note.encrypted_content.as_deref(), Some("ciphertext"));
    }

    #[test]
    fn patch_wire_shape() {
        let patch = NotePatch {
            title: Some("T".to_owned()),
            encrypted_content: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["encryptedContent"], serde_json::Value::Null);
        assert!(json.get("content").is_none());

        let absent: NotePatch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.encrypted_content, None);
        let cleared: NotePatch = serde_json::from_str(r#"{"encryptedContent":null}"#).unwrap();
        assert_eq!(cleared.encrypted_content, Some(None));
    }

    #[test]
    fn note_round_trips_camel_case() {
        let note = sample_note();
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("isEncrypted").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("encryptedContent").is_none());
        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }
}
