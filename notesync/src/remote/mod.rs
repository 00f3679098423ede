//! Clients of the remote note service.
use crate::errors::RemoteError;
use crate::note::{Note, NoteDraft, NoteId, NotePatch};
use futures::future::BoxFuture;

mod http;
mod in_memory;
#[cfg(test)]
mod tests;
pub mod util;

pub use http::HttpRemote;
pub use in_memory::InMemoryRemote;

pub type BoxedRemote = Box<dyn RemoteNoteService + Send + Sync>;

/// An abstraction over the remote note service.
///
/// The service owns note identity: it assigns ids and timestamps on
/// creation and returns the authoritative copy of a note after every
/// mutation. Timestamps arrive serialized and are parsed into a comparable
/// temporal type before they reach the canonical list.
pub trait RemoteNoteService {
    /// Fetch the full note collection of the current user, pinned notes
    /// first, most recently updated first within each group.
    fn list(&self) -> BoxFuture<Result<Vec<Note>, RemoteError>>;
    /// Create a note from a draft.
    ///
    /// The service assigns the id and both timestamps, and substitutes
    /// "Untitled" for an empty draft title.
    fn create(&self, draft: NoteDraft) -> BoxFuture<Result<Note, RemoteError>>;
    /// Fetch a single note.
    fn get<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<Note, RemoteError>>;
    /// Merge a partial update into a note and refresh its update timestamp.
    fn update<'a>(
        &'a self,
        id: &'a NoteId,
        patch: NotePatch,
    ) -> BoxFuture<'a, Result<Note, RemoteError>>;
    /// Delete a note.
    fn delete<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<(), RemoteError>>;
    /// Flip a note's pinned flag.
    fn toggle_pin<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<Note, RemoteError>>;
    /// Add a tag to a note. Adding a tag that is already present is a no-op.
    fn add_tag<'a>(
        &'a self,
        id: &'a NoteId,
        tag: &'a str,
    ) -> BoxFuture<'a, Result<Note, RemoteError>>;
    /// Remove a tag from a note.
    fn remove_tag<'a>(
        &'a self,
        id: &'a NoteId,
        tag: &'a str,
    ) -> BoxFuture<'a, Result<Note, RemoteError>>;
}
