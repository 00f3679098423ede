use crate::note::NoteDraft;
use crate::remote::BoxedRemote;

pub async fn populate_sample_notes(remote: &BoxedRemote) {
    remote
        .create(NoteDraft {
            title: "Welcome".to_owned(),
            content: "<p>This note lives on the reference server.</p>".to_owned(),
            tags: vec!["getting-started".to_owned()],
            pinned: true,
        })
        .await
        .unwrap();
    remote
        .create(NoteDraft {
            title: "".to_owned(),
            content: "<p>An untitled scratch note.</p>".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap();
    remote
        .create(NoteDraft {
            title: "Shopping list".to_owned(),
            content: "<ul><li>milk</li><li>coffee</li></ul>".to_owned(),
            tags: vec!["errands".to_owned(), "home".to_owned()],
            ..Default::default()
        })
        .await
        .unwrap();
}
