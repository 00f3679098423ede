//! Notesync: client-side note state and synchronization.
pub mod cache;
pub mod crypto;
pub mod debounce;
pub mod errors;
pub mod note;
pub mod remote;
pub mod session;
pub mod store;

pub use cache::LocalCache;
pub use note::{Note, NoteDraft, NoteId, NotePatch};
pub use remote::{BoxedRemote, HttpRemote, InMemoryRemote, RemoteNoteService};
pub use session::EditorSession;
pub use store::NoteStore;
