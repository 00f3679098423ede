//! HTTP client of the remote note service.
use crate::errors::RemoteError;
use crate::note::{Note, NoteDraft, NoteId, NotePatch};
use crate::remote::RemoteNoteService;
use futures::future::BoxFuture;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Response envelope used by the note service API.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TagPostData<'a> {
    tag: &'a str,
}

/// [`RemoteNoteService`] backed by the note service REST API.
///
/// `base_url` points at the API root, e.g. `http://localhost:8000/api`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        HttpRemote {
            client: Client::new(),
            base_url,
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: &NoteId) -> String {
        format!("{}/notes/{}", self.base_url, id)
    }

    async fn deserialize_envelope<T: DeserializeOwned>(
        response: Response,
        id: Option<&NoteId>,
    ) -> Result<T, RemoteError> {
        if response.status() == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(RemoteError::NoteNotExist(id.clone()));
            }
        }
        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await?;
        if !status.is_success() || !envelope.success {
            return Err(RemoteError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| format!("request failed with status {}", status)),
            ));
        }
        envelope
            .data
            .ok_or_else(|| RemoteError::Rejected("response carried no data".to_owned()))
    }

    /// Like [`Self::deserialize_envelope`], for operations that return no data.
    async fn check_envelope(response: Response, id: Option<&NoteId>) -> Result<(), RemoteError> {
        if response.status() == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(RemoteError::NoteNotExist(id.clone()));
            }
        }
        let status = response.status();
        let envelope: ApiResponse<serde_json::Value> = response.json().await?;
        if !status.is_success() || !envelope.success {
            return Err(RemoteError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| format!("request failed with status {}", status)),
            ));
        }
        Ok(())
    }
}

impl RemoteNoteService for HttpRemote {
    fn list(&self) -> BoxFuture<Result<Vec<Note>, RemoteError>> {
        Box::pin(async move {
            let response = self.client.get(self.notes_url()).send().await?;
            Self::deserialize_envelope(response, None).await
        })
    }

    fn create(&self, draft: NoteDraft) -> BoxFuture<Result<Note, RemoteError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.notes_url())
                .json(&draft)
                .send()
                .await?;
            Self::deserialize_envelope(response, None).await
        })
    }

    fn get<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let response = self.client.get(self.note_url(id)).send().await?;
            Self::deserialize_envelope(response, Some(id)).await
        })
    }

    fn update<'a>(
        &'a self,
        id: &'a NoteId,
        patch: NotePatch,
    ) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let response = self
                .client
                .patch(self.note_url(id))
                .json(&patch)
                .send()
                .await?;
            Self::deserialize_envelope(response, Some(id)).await
        })
    }

    fn delete<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let response = self.client.delete(self.note_url(id)).send().await?;
            Self::check_envelope(response, Some(id)).await
        })
    }

    fn toggle_pin<'a>(&'a self, id: &'a NoteId) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let response = self
                .client
                .patch(format!("{}/pin", self.note_url(id)))
                .send()
                .await?;
            Self::deserialize_envelope(response, Some(id)).await
        })
    }

    fn add_tag<'a>(
        &'a self,
        id: &'a NoteId,
        tag: &'a str,
    ) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(format!("{}/tags", self.note_url(id)))
                .json(&TagPostData { tag })
                .send()
                .await?;
            Self::deserialize_envelope(response, Some(id)).await
        })
    }

    fn remove_tag<'a>(
        &'a self,
        id: &'a NoteId,
        tag: &'a str,
    ) -> BoxFuture<'a, Result<Note, RemoteError>> {
        Box::pin(async move {
            let response = self
                .client
                .delete(format!("{}/tags", self.note_url(id)))
                .query(&[("tag", tag)])
                .send()
                .await?;
            Self::deserialize_envelope(response, Some(id)).await
        })
    }
}
