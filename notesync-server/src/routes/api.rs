use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use notesync::errors::RemoteError;
use notesync::remote::BoxedRemote;
use notesync::{NoteDraft, NoteId, NotePatch};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every API operation.
#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
}

fn success_empty() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::<()> {
        success: true,
        data: None,
        error: None,
    })
}

fn failure(e: &RemoteError) -> ApiResponse<()> {
    ApiResponse {
        success: false,
        data: None,
        error: Some(e.to_string()),
    }
}

fn remote_error_handler(e: &RemoteError) -> HttpResponse {
    match e {
        RemoteError::NoteNotExist(_) => HttpResponse::NotFound().json(failure(e)),
        RemoteError::Rejected(_) => HttpResponse::BadRequest().json(failure(e)),
        RemoteError::SerdeError(_) => HttpResponse::BadRequest().json(failure(e)),
        RemoteError::Unreachable(_)
        | RemoteError::HttpError(_)
        | RemoteError::IOError(_) => {
            error!("note backend internal error {:?}", e);
            HttpResponse::InternalServerError().json(failure(e))
        }
    }
}

#[get("/notes")]
#[instrument(skip(remote))]
async fn list_notes(remote: web::Data<BoxedRemote>) -> impl Responder {
    match remote.list().await {
        Ok(notes) => success(notes),
        Err(e) => remote_error_handler(&e),
    }
}

#[post("/notes")]
#[instrument(skip(remote, draft))]
async fn create_note(
    remote: web::Data<BoxedRemote>,
    draft: web::Json<NoteDraft>,
) -> impl Responder {
    match remote.create(draft.into_inner()).await {
        Ok(note) => success(note),
        Err(e) => remote_error_handler(&e),
    }
}

#[get("/notes/{note_id}")]
#[instrument(
    skip(remote, params),
    fields(
        note_id = %params.0
    )
)]
async fn get_note(
    remote: web::Data<BoxedRemote>,
    params: web::Path<(String,)>,
) -> impl Responder {
    let (note_id,) = params.into_inner();
    let id = NoteId::from(note_id);
    match remote.get(&id).await {
        Ok(note) => success(note),
        Err(e) => remote_error_handler(&e),
    }
}

#[patch("/notes/{note_id}")]
#[instrument(
    skip(remote, params, patch),
    fields(
        note_id = %params.0
    )
)]
async fn update_note(
    remote: web::Data<BoxedRemote>,
    params: web::Path<(String,)>,
    patch: web::Json<NotePatch>,
) -> impl Responder {
    let (note_id,) = params.into_inner();
    let id = NoteId::from(note_id);
    match remote.update(&id, patch.into_inner()).await {
        Ok(note) => success(note),
        Err(e) => remote_error_handler(&e),
    }
}

#[delete("/notes/{note_id}")]
#[instrument(
    skip(remote, params),
    fields(
        note_id = %params.0
    )
)]
async fn delete_note(
    remote: web::Data<BoxedRemote>,
    params: web::Path<(String,)>,
) -> impl Responder {
    let (note_id,) = params.into_inner();
    let id = NoteId::from(note_id);
    match remote.delete(&id).await {
        Ok(_) => success_empty(),
        Err(e) => remote_error_handler(&e),
    }
}

#[patch("/notes/{note_id}/pin")]
#[instrument(
    skip(remote, params),
    fields(
        note_id = %params.0
    )
)]
async fn toggle_pin(
    remote: web::Data<BoxedRemote>,
    params: web::Path<(String,)>,
) -> impl Responder {
    let (note_id,) = params.into_inner();
    let id = NoteId::from(note_id);
    match remote.toggle_pin(&id).await {
        Ok(note) => success(note),
        Err(e) => remote_error_handler(&e),
    }
}

#[derive(Deserialize)]
struct TagPostData {
    tag: String,
}

#[post("/notes/{note_id}/tags")]
#[instrument(
    skip(remote, params, body),
    fields(
        note_id = %params.0
    )
)]
async fn add_tag(
    remote: web::Data<BoxedRemote>,
    params: web::Path<(String,)>,
    body: web::Json<TagPostData>,
) -> impl Responder {
    let (note_id,) = params.into_inner();
    let id = NoteId::from(note_id);
    match remote.add_tag(&id, &body.tag).await {
        Ok(note) => success(note),
        Err(e) => remote_error_handler(&e),
    }
}

#[derive(Deserialize)]
struct TagQuery {
    tag: String,
}

#[delete("/notes/{note_id}/tags")]
#[instrument(
    skip(remote, params, query),
    fields(
        note_id = %params.0
    )
)]
async fn remove_tag(
    remote: web::Data<BoxedRemote>,
    params: web::Path<(String,)>,
    query: web::Query<TagQuery>,
) -> impl Responder {
    let (note_id,) = params.into_inner();
    let id = NoteId::from(note_id);
    match remote.remove_tag(&id, &query.tag).await {
        Ok(note) => success(note),
        Err(e) => remote_error_handler(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_notes)
        .service(create_note)
        .service(get_note)
        .service(update_note)
        .service(delete_note)
        .service(toggle_pin)
        .service(add_tag)
        .service(remove_tag);
}
