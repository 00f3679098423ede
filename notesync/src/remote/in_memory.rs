//! In-memory implementation of the remote note service.
use crate::errors::RemoteError;
use crate::note::{Note, NoteDraft, NoteId, NotePatch};
use crate::remote::RemoteNoteService;
use chrono::Utc;
use futures::future::BoxFuture;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct InMemoryRemoteInner {
    notes: HashMap<NoteId, Note>,
}

impl InMemoryRemoteInner {
    /// Generate a new [`NoteId`].
    ///
    /// We use the UUID V4 scheme.
    fn get_new_noteid(&self) -> NoteId {
        NoteId::new(Uuid::new_v4().to_string())
    }

    fn get(&self, id: &NoteId) -> Result<Note, RemoteError> {
        self.notes
            .get(id)
            .cloned()
            .ok_or_else(|| RemoteError::NoteNotExist(id.clone()))
    }

    fn get_mut(&mut self, id: &NoteId) -> Result<&mut Note, RemoteError> {
        self.notes
            .get_mut(id)
            .ok_or_else(|| RemoteError::NoteNotExist(id.clone()))
    }

    fn list(&self) -> Vec<Note> {
        let mut notes: Vec<Note> = self.notes.values().cloned().collect();
        // pinned first, then most recently updated
        notes.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then(b.updated_at.cmp(&a.updated_at))
        });
        notes
    }

    fn create(&mut self, draft: NoteDraft) -> Note {
        let id = self.get_new_noteid();
        let now = Utc::now();
        let note = Note {
            id: id.clone(),
            title: if draft.title.is_empty() {
                "Untitled".to_owned()
            } else {
                draft.title
            },
            content: draft.content,
            tags: draft.tags,
            pinned: draft.pinned,
            is_encrypted: false,
            encrypted_content: None,
            updated_at: now,
            created_at: now,
        };
        assert!(!self.notes.contains_key(&id));
        self.notes.insert(id, note.clone());
        note
    }

    fn update(&mut self, id: &NoteId, patch: NotePatch) -> Result<Note, RemoteError> {
        let note = self.get_mut(id)?;
        patch.apply_to(note);
        note.touch();
        Ok(note.clone())
    }

    fn delete(&mut self, id: &NoteId) -> Result<(), RemoteError> {
        self.notes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::NoteNotExist(id.clone()))
    }

    fn toggle_pin(&mut self, id: &NoteId) -> Result<Note, RemoteError> {
        let note = self.get_mut(id)?;
        note.pinned = !note.pinned;
        note.touch();
        Ok(note.clone())
    }

    fn add_tag(&mut self, id: &NoteId, tag: &str) -> Result<Note, RemoteError> {
        let note = self.get_mut(id)?;
        if note.add_tag(tag) {
            note.touch();
        }
        Ok(note.clone())
    }

    fn remove_tag(&mut self, id: &NoteId, tag: &str) -> Result<Note, RemoteError> {
        let note = self.get_mut(id)?;
        note.remove_tag(tag);
        note.touch();
        Ok(note.clone())
    }
}

/// In-memory note service.
///
/// This is mostly designed for development and tests, because there is no
/// persistence layer.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    inner: RwLock<InMemoryRemoteInner>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Default::default()
    }
}

impl RemoteNoteService for InMemoryRemote {
    fn list(&self) -> BoxFuture<Result<Vec<Note>, RemoteError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(inner.list())
        })
    }

    fn create(&self, draft: NoteDraft) -> BoxFuture<Result<Note, RemoteError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            Ok(inner.create(draft))
        })
    }

    fn get<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            inner.get(id)
        })
    }

    fn update<'a>(
        &'a self,
        id: &'a NoteId,
        patch: NotePatch,
    ) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.update(id, patch)
        })
    }

    fn delete<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.delete(id)
        })
    }

    fn toggle_pin<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.toggle_pin(id)
        })
    }

    fn add_tag<'a>(
        &'a self,
        id: &'a NoteId,
        tag: &'a str,
    ) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.add_tag(id, tag)
        })
    }

    fn remove_tag<'a>(
        &'a self,
        id: &'a NoteId,
        tag: &'a str,
    ) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.remove_tag(id, tag)
        })
    }
}
