use crate::errors::RemoteError;
use crate::note::{NoteDraft, NotePatch};
use crate::remote::RemoteNoteService;
use std::time::Duration;

fn draft(title: &str, content: &str) -> NoteDraft {
    NoteDraft {
        title: title.to_owned(),
        content: content.to_owned(),
        ..Default::default()
    }
}

pub(super) async fn create_assigns_unique_ids(remote: impl RemoteNoteService) {
    let a = remote.create(draft("Foo", "")).await.unwrap();
    let b = remote.create(draft("Bar", "")).await.unwrap();
    assert_ne!(a.id, b.id);
    assert!(!a.id.as_ref().is_empty());
}

pub(super) async fn create_defaults_empty_title(remote: impl RemoteNoteService) {
    let note = remote.create(draft("", "<p>body</p>")).await.unwrap();
    assert_eq!(note.title, "Untitled");
    assert_eq!(note.content, "<p>body</p>");
}

pub(super) async fn create_keeps_draft_fields(remote: impl RemoteNoteService) {
    let note = remote
        .create(NoteDraft {
            title: "Foo".to_owned(),
            content: "<p>body</p>".to_owned(),
            tags: vec!["work".to_owned()],
            pinned: true,
        })
        .await
        .unwrap();
    assert_eq!(note.title, "Foo");
    assert_eq!(note.tags, vec!["work"]);
    assert!(note.pinned);
    assert!(!note.is_encrypted);
    assert_eq!(note.encrypted_content, None);
    assert_eq!(note.created_at, note.updated_at);
}

pub(super) async fn update_merges_fields(remote: impl RemoteNoteService) {
    let note = remote.create(draft("Foo", "<p>body</p>")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = remote
        .update(
            &note.id,
            NotePatch {
                title: Some("Foo1".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Foo1");
    assert_eq!(updated.content, "<p>body</p>");
    assert!(updated.updated_at > note.updated_at);
    assert_eq!(updated.created_at, note.created_at);

    let fetched = remote.get(&note.id).await.unwrap();
    assert_eq!(fetched, updated);
}

pub(super) async fn update_missing_note(remote: impl RemoteNoteService) {
    let result = remote
        .update(
            &"no-such-note".into(),
            NotePatch {
                title: Some("Foo".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(RemoteError::NoteNotExist(_))));
}

pub(super) async fn delete_removes(remote: impl RemoteNoteService) {
    let note = remote.create(draft("Foo", "")).await.unwrap();
    remote.delete(&note.id).await.unwrap();
    assert!(matches!(
        remote.get(&note.id).await,
        Err(RemoteError::NoteNotExist(_))
    ));
    assert!(matches!(
        remote.delete(&note.id).await,
        Err(RemoteError::NoteNotExist(_))
    ));
}

pub(super) async fn toggle_pin_flips(remote: impl RemoteNoteService) {
    let note = remote.create(draft("Foo", "")).await.unwrap();
    assert!(!note.pinned);
    let pinned = remote.toggle_pin(&note.id).await.unwrap();
    assert!(pinned.pinned);
    let unpinned = remote.toggle_pin(&note.id).await.unwrap();
    assert!(!unpinned.pinned);
}

pub(super) async fn add_tag_dedups(remote: impl RemoteNoteService) {
    let note = remote.create(draft("Foo", "")).await.unwrap();
    let tagged = remote.add_tag(&note.id, "work").await.unwrap();
    assert_eq!(tagged.tags, vec!["work"]);
    let tagged_again = remote.add_tag(&note.id, "work").await.unwrap();
    assert_eq!(tagged_again.tags, vec!["work"]);
    let two = remote.add_tag(&note.id, "urgent").await.unwrap();
    assert_eq!(two.tags, vec!["work", "urgent"]);
}

pub(super) async fn remove_tag_clears(remote: impl RemoteNoteService) {
    let note = remote.create(draft("Foo", "")).await.unwrap();
    remote.add_tag(&note.id, "work").await.unwrap();
    remote.add_tag(&note.id, "urgent").await.unwrap();
    let trimmed = remote.remove_tag(&note.id, "work").await.unwrap();
    assert_eq!(trimmed.tags, vec!["urgent"]);
}

pub(super) async fn list_orders_pinned_then_recency(remote: impl RemoteNoteService) {
    let oldest = remote.create(draft("Oldest", "")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    remote.create(draft("Middle", "")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    remote.create(draft("Newest", "")).await.unwrap();

    // pinning bumps the oldest note to the front
    remote.toggle_pin(&oldest.id).await.unwrap();
    let listed = remote.list().await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Oldest", "Newest", "Middle"]);
}
