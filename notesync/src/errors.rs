use thiserror::Error;

use crate::NoteId;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("note `{0}` doesn't exist")]
    NoteNotExist(NoteId),
    #[error("remote service rejected the request: {0}")]
    Rejected(String),
    #[error("remote service unreachable: {0}")]
    Unreachable(String),
    #[error("http error")]
    HttpError(#[from] reqwest::Error),
    #[error("io error")]
    IOError(#[from] std::io::Error),
    #[error("serde error")]
    SerdeError(#[from] serde_json::Error),
}
