//! Editor-session binding between text fields and the note store.
use crate::debounce::FieldDebouncer;
use crate::note::NotePatch;
use crate::store::NoteStore;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Owns the per-field debounce handles for the note open in the editor.
///
/// Each editable field has its own timer, scoped to this session rather
/// than process-wide: keystrokes reset the field's timer, and the store's
/// `update` is issued once per burst of typing. Switching notes should go
/// through [`EditorSession::cancel_pending`] so a stale edit is not flushed
/// into the newly selected note's quiet period.
pub struct EditorSession {
    store: Arc<NoteStore>,
    quiet_period: Duration,
    title: FieldDebouncer,
    content: FieldDebouncer,
}

impl EditorSession {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self::with_quiet_period(store, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(store: Arc<NoteStore>, quiet_period: Duration) -> Self {
        EditorSession {
            store,
            quiet_period,
            title: FieldDebouncer::new(),
            content: FieldDebouncer::new(),
        }
    }

    /// Called on every keystroke in the title field.
    pub async fn title_input(&mut self, text: String) {
        let note = match self.store.selected_note().await {
            Some(note) => note,
            None => return,
        };
        let store = Arc::clone(&self.store);
        self.title.submit(self.quiet_period, async move {
            store
                .update(
                    &note.id,
                    NotePatch {
                        title: Some(text),
                        ..Default::default()
                    },
                )
                .await;
        });
    }

    /// Called on every input event in the content editor.
    pub async fn content_input(&mut self, html: String) {
        let note = match self.store.selected_note().await {
            Some(note) => note,
            None => return,
        };
        let store = Arc::clone(&self.store);
        self.content.submit(self.quiet_period, async move {
            store
                .update(
                    &note.id,
                    NotePatch {
                        content: Some(html),
                        ..Default::default()
                    },
                )
                .await;
        });
    }

    /// Drop pending edits, e.g. when switching notes.
    pub fn cancel_pending(&mut self) {
        self.title.cancel();
        self.content.cancel();
    }
}
