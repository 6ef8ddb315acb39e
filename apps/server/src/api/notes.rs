use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::{error::ApiResult, main_lib::AppState};
use marketlens_core::notes::{NewNote, Note, NoteUpdate};

async fn get_notes(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Note>>> {
    let notes = state.note_service.get_notes(&symbol)?;
    Ok(Json(notes))
}

async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(new_note): Json<NewNote>,
) -> ApiResult<Json<Note>> {
    let note = state.note_service.create_note(new_note).await?;
    Ok(Json(note))
}

async fn update_note(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<NoteUpdate>,
) -> ApiResult<Json<Note>> {
    let note = state.note_service.update_note(id, update).await?;
    Ok(Json(note))
}

async fn delete_note(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let _ = state.note_service.delete_note(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", post(create_note))
        .route("/notes/{id}", put(update_note).delete(delete_note))
        .route("/symbols/{symbol}/notes", get(get_notes))
}
