//! The client-side note store.
//!
//! Single authoritative in-memory registry of the user's notes and of the
//! selected note, with a durable cache fallback and race-safe update
//! application. All mutation operations are non-throwing: remote failures
//! are logged and absorbed into a local fallback path, so the UI stays
//! responsive when the note service is degraded.
use crate::cache::LocalCache;
use crate::crypto;
use crate::note::{Note, NoteDraft, NoteId, NotePatch};
use crate::remote::BoxedRemote;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;


/// Title placeholder written over an encrypted note. The real title is only
/// recoverable by decrypting; this loss is intentional.
pub const ENCRYPTED_TITLE_PLACEHOLDER: &str = "Encrypted Note";

/// Serialized form of the plaintext fields protected by note encryption.
#[derive(Debug, Serialize, Deserialize)]
struct EncryptedPayload {
    title: String,
    content: String,
}

#[derive(Debug, Default)]
struct StoreInner {
    notes: Vec<Note>,
    selected: Option<NoteId>,
    /// Last issued update sequence number per note. Plain owned state: the
    /// hazard is resolution ordering across suspension points, not shared
    /// memory, and the counter is only touched under the store lock.
    update_seq: HashMap<NoteId, u64>,
}

impl StoreInner {
    fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    fn find_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| &note.id == id)
    }

    /// Replace the canonical entry with the same id, if any.
    fn replace(&mut self, note: Note) {
        if let Some(slot) = self.find_mut(&note.id) {
            *slot = note;
        }
    }

    fn bump_seq(&mut self, id: &NoteId) -> u64 {
        let counter = self.update_seq.entry(id.clone()).or_insert(0);
        *counter += 1;
        *counter
    }

    fn latest_seq(&self, id: &NoteId) -> u64 {
        self.update_seq.get(id).copied().unwrap_or(0)
    }

    fn selected_note(&self) -> Option<Note> {
        self.selected
            .as_ref()
            .and_then(|id| self.find(id))
            .cloned()
    }
}

/// Owner of the canonical note collection and the selected-note reference.
///
/// The canonical list and the selection are owned exclusively by the store;
/// UI collaborators read and mutate them only through the operations here.
/// The local cache is written as a mirror after every canonical change and
/// is read back only at [`NoteStore::bootstrap`] time.
pub struct NoteStore {
    remote: BoxedRemote,
    cache: LocalCache,
    inner: RwLock<StoreInner>,
}

impl NoteStore {
    /// Load the note collection from the remote service, falling back to the
    /// local cache when the remote is unavailable.
    ///
    /// The cached copy may be stale, but it keeps the application usable
    /// offline. The persisted selection is restored by id; if it no longer
    /// resolves against the loaded collection it simply reads as empty.
    pub async fn bootstrap(remote: BoxedRemote, cache: LocalCache) -> Self {
        let notes = match remote.list().await {
            Ok(notes) => notes,
            Err(e) => {
                warn!(
                    "failed to load notes from the remote service, using the local cache: {}",
                    e
                );
                match cache.load_notes() {
                    Ok(notes) => notes,
                    Err(e) => {
                        warn!("failed to load cached notes: {}", e);
                        Vec::new()
                    }
                }
            }
        };
        let selected = match cache.load_selected() {
            Ok(selected) => selected.map(|note| note.id),
            Err(e) => {
                warn!("failed to load the cached selection: {}", e);
                None
            }
        };
        NoteStore {
            remote,
            cache,
            inner: RwLock::new(StoreInner {
                notes,
                selected,
                update_seq: HashMap::new(),
            }),
        }
    }

    /// Current canonical collection, in insertion order (newest first).
    /// Display order (pinned, then recency) is the UI layer's concern.
    pub async fn notes(&self) -> Vec<Note> {
        self.inner.read().await.notes.clone()
    }

    /// The note currently open in the editor, resolved to its in-store copy.
    pub async fn selected_note(&self) -> Option<Note> {
        self.inner.read().await.selected_note()
    }

    pub async fn set_selected_note(&self, id: Option<NoteId>) {
        let mut inner = self.inner.write().await;
        inner.selected = id;
        self.mirror_selected(&inner);
    }

    /// Create a note from a draft and prepend it to the collection.
    ///
    /// On success the server-assigned copy is returned so the caller can
    /// select it. If the remote is unreachable the draft is kept locally
    /// under a locally minted id until a future sync.
    pub async fn add(&self, draft: NoteDraft) -> Note {
        let note = match self.remote.create(draft.clone()).await {
            Ok(note) => note,
            Err(e) => {
                warn!("remote create failed, keeping the new note locally: {}", e);
                draft.into_note(NoteId::new(Uuid::new_v4().to_string()))
            }
        };
        let mut inner = self.inner.write().await;
        assert!(inner.find(&note.id).is_none());
        inner.notes.insert(0, note.clone());
        self.mirror(&inner);
        note
    }

    /// Merge a partial update into a note.
    ///
    /// Callers issue this on a debounce timer while the user types, so
    /// overlapping calls for the same note are expected. The store
    /// guarantees that the result of the most-recently-issued call is never
    /// overwritten by an earlier-issued call that resolves later: each call
    /// captures a per-note sequence number before awaiting the remote, and
    /// a resolution that has been superseded is discarded entirely.
    pub async fn update(&self, id: &NoteId, patch: NotePatch) {
        let (seq, current) = {
            let mut inner = self.inner.write().await;
            (inner.bump_seq(id), inner.find(id).cloned())
        };

        let result = self.remote.update(id, patch.clone()).await;

        let mut inner = self.inner.write().await;
        if inner.latest_seq(id) != seq {
            debug!("discarding superseded update for note `{}`", id);
            return;
        }
        let updated = match result {
            Ok(note) => note,
            Err(e) => {
                warn!("remote update failed, applying the edit locally: {}", e);
                match current {
                    Some(mut note) => {
                        patch.apply_to(&mut note);
                        note.touch();
                        note
                    }
                    None => return,
                }
            }
        };
        inner.replace(updated);
        self.mirror(&inner);
    }

    /// Remove a note. Deletion is best-effort: the note leaves the visible
    /// collection even when the remote call fails, since redisplaying a note
    /// the user asked to delete is worse than a dangling remote record. A
    /// deleted note that was selected clears the selection.
    pub async fn delete(&self, id: &NoteId) {
        {
            let mut inner = self.inner.write().await;
            inner.notes.retain(|note| &note.id != id);
            if inner.selected.as_ref() == Some(id) {
                inner.selected = None;
            }
            inner.update_seq.remove(id);
            self.mirror(&inner);
        }
        if let Err(e) = self.remote.delete(id).await {
            warn!("remote delete failed, note was removed locally anyway: {}", e);
        }
    }

    /// Flip a note's pinned flag, taking the server's authoritative copy on
    /// success and flipping locally on failure.
    pub async fn toggle_pin(&self, id: &NoteId) {
        match self.remote.toggle_pin(id).await {
            Ok(note) => {
                let mut inner = self.inner.write().await;
                inner.replace(note);
                self.mirror(&inner);
            }
            Err(e) => {
                warn!("remote pin toggle failed, flipping locally: {}", e);
                let mut inner = self.inner.write().await;
                if let Some(note) = inner.find_mut(id) {
                    note.pinned = !note.pinned;
                }
                self.mirror(&inner);
            }
        }
    }

    /// Add a tag to a note. Tags form a set: duplicate adds are no-ops.
    pub async fn add_tag(&self, id: &NoteId, tag: &str) {
        match self.remote.add_tag(id, tag).await {
            Ok(note) => {
                let mut inner = self.inner.write().await;
                inner.replace(note);
                self.mirror(&inner);
            }
            Err(e) => {
                warn!("remote tag add failed, merging locally: {}", e);
                let mut inner = self.inner.write().await;
                if let Some(note) = inner.find_mut(id) {
                    note.add_tag(tag);
                }
                self.mirror(&inner);
            }
        }
    }

    /// Remove a tag from a note.
    pub async fn remove_tag(&self, id: &NoteId, tag: &str) {
        match self.remote.remove_tag(id, tag).await {
            Ok(note) => {
                let mut inner = self.inner.write().await;
                inner.replace(note);
                self.mirror(&inner);
            }
            Err(e) => {
                warn!("remote tag removal failed, removing locally: {}", e);
                let mut inner = self.inner.write().await;
                if let Some(note) = inner.find_mut(id) {
                    note.remove_tag(tag);
                }
                self.mirror(&inner);
            }
        }
    }

    /// Encrypt a note's title and content under `password`.
    ///
    /// The plaintext pair is serialized, sealed, and the note is rewritten
    /// with the ciphertext, a blank content and the fixed title placeholder.
    /// The original title is not recoverable without decrypting.
    pub async fn encrypt_note_content(&self, id: &NoteId, password: &str) {
        let payload = {
            let inner = self.inner.read().await;
            match inner.find(id) {
                Some(note) if note.is_encrypted => {
                    debug!("note `{}` is already encrypted", id);
                    return;
                }
                Some(note) => EncryptedPayload {
                    title: note.title.clone(),
                    content: note.content.clone(),
                },
                None => return,
            }
        };
        let serialized = match serde_json::to_string(&payload) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!("failed to serialize note `{}` for encryption: {}", id, e);
                return;
            }
        };
        let ciphertext = match crypto::encrypt(&serialized, password) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                warn!("failed to encrypt note `{}`: {}", id, e);
                return;
            }
        };
        self.update(
            id,
            NotePatch {
                title: Some(ENCRYPTED_TITLE_PLACEHOLDER.to_owned()),
                content: Some(String::new()),
                is_encrypted: Some(true),
                encrypted_content: Some(Some(ciphertext)),
                ..Default::default()
            },
        )
        .await;
    }

    /// Attempt to decrypt a note with `password`.
    ///
    /// Returns `false` without mutating any state when the note is not
    /// encrypted, the password is wrong, the ciphertext is corrupt, or the
    /// recovered payload does not parse. User-facing messaging is the
    /// caller's responsibility.
    pub async fn decrypt_note_content(&self, id: &NoteId, password: &str) -> bool {
        let ciphertext = {
            let inner = self.inner.read().await;
            match inner.find(id) {
                Some(note) if note.is_encrypted => match &note.encrypted_content {
                    Some(ciphertext) => ciphertext.clone(),
                    None => return false,
                },
                _ => return false,
            }
        };
        let serialized = match crypto::decrypt(&ciphertext, password) {
            Ok(serialized) => serialized,
            Err(e) => {
                debug!("failed to decrypt note `{}`: {}", id, e);
                return false;
            }
        };
        let payload: EncryptedPayload = match serde_json::from_str(&serialized) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("decrypted payload of note `{}` cannot be parsed: {}", id, e);
                return false;
            }
        };
        self.update(
            id,
            NotePatch {
                title: Some(payload.title),
                content: Some(payload.content),
                is_encrypted: Some(false),
                encrypted_content: Some(None),
                ..Default::default()
            },
        )
        .await;
        true
    }

    fn mirror(&self, inner: &StoreInner) {
        self.mirror_notes(inner);
        self.mirror_selected(inner);
    }

    fn mirror_notes(&self, inner: &StoreInner) {
        if let Err(e) = self.cache.save_notes(&inner.notes) {
            warn!("failed to mirror notes to the local cache: {}", e);
        }
    }

    fn mirror_selected(&self, inner: &StoreInner) {
        if let Err(e) = self.cache.save_selected(inner.selected_note().as_ref()) {
            warn!("failed to mirror the selection to the local cache: {}", e);
        }
    }
}
