//! JSON API
//!
//! Selection and management endpoints under `/v1`:
//!
//! - `POST /v1/select/group`, `POST /v1/select/profile`: select for a label set
//! - `GET /v1/profiles`, `GET|PUT|DELETE /v1/profiles/{id}`
//! - `GET /v1/groups`, `GET|PUT|DELETE /v1/groups/{id}`
//! - `GET|PUT|DELETE /v1/{ignition|cloud|generic}/{id}`: raw config blobs
//!
//! Documents are validated before they are stored. Errors are returned as
//! `{"error": ..., "message": ...}` with a matching status code.

use crate::error::ServerError;
use crate::observer::MatchOutcome;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use boot_model::{Group, LabelSet, ModelError, Profile};
use boot_store::BlobKind;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Body of the select endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub labels: LabelSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectGroupResponse {
    pub group: Group,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectProfileResponse {
    pub profile: Profile,
}

/// Routes of the `/v1` API, relative to the API root.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/select/group", post(select_group))
        .route("/select/profile", post(select_profile))
        .route("/profiles", get(list_profiles))
        .route(
            "/profiles/{id}",
            get(get_profile).put(put_profile).delete(delete_profile),
        )
        .route("/groups", get(list_groups))
        .route(
            "/groups/{id}",
            get(get_group).put(put_group).delete(delete_group),
        )
        .route(
            "/{kind}/{id}",
            get(get_blob).put(put_blob).delete(delete_blob),
        )
}

async fn select_group(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectGroupResponse>, ServerError> {
    let endpoint = "select_group";
    match state.selector.select_group(&request.labels).await {
        Ok(group) => {
            state
                .observer
                .observe(endpoint, &request.labels, MatchOutcome::Matched(&group));
            Ok(Json(SelectGroupResponse { group }))
        }
        Err(err) => {
            state
                .observer
                .observe(endpoint, &request.labels, MatchOutcome::Failed(&err));
            Err(err.into())
        }
    }
}

async fn select_profile(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectProfileResponse>, ServerError> {
    let endpoint = "select_profile";
    let selection = state.select(endpoint, &request.labels).await?;
    state.report(endpoint, &request.labels, &selection, None);
    Ok(Json(SelectProfileResponse {
        profile: selection.profile,
    }))
}

async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, ServerError> {
    Ok(Json(state.store().list_profiles().await?))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ServerError> {
    Ok(Json(state.store().get_profile(&id).await?))
}

async fn put_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ServerError> {
    let mut profile = Profile::parse(&body).map_err(bad_request)?;
    check_document_id(&id, &mut profile.id)?;
    profile.validate().map_err(bad_request)?;
    state.store().put_profile(profile).await?;
    info!("Stored profile {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.store().delete_profile(&id).await?;
    info!("Deleted profile {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<Group>>, ServerError> {
    Ok(Json(state.store().list_groups().await?))
}

async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Group>, ServerError> {
    Ok(Json(state.store().get_group(&id).await?))
}

async fn put_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ServerError> {
    let mut group = Group::parse(&body).map_err(bad_request)?;
    check_document_id(&id, &mut group.id)?;
    group.validate().map_err(bad_request)?;
    state.store().put_group(group).await?;
    info!("Stored group {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.store().delete_group(&id).await?;
    info!("Deleted group {}", id);
    Ok(StatusCode::NO_CONTENT)
}

fn bad_request(err: ModelError) -> ServerError {
    ServerError::BadRequest(err.to_string())
}

/// Fills a missing document id from the path and rejects a conflicting one.
fn check_document_id(path_id: &str, document_id: &mut String) -> Result<(), ServerError> {
    if document_id.is_empty() {
        *document_id = path_id.to_string();
    } else if document_id != path_id {
        return Err(ServerError::BadRequest(format!(
            "document id {document_id:?} does not match path id {path_id:?}"
        )));
    }
    Ok(())
}

fn blob_kind(kind: &str) -> Result<BlobKind, ServerError> {
    kind.parse().map_err(ServerError::NotFound)
}

async fn get_blob(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Response, ServerError> {
    let kind = blob_kind(&kind)?;
    let data = state.store().get_blob(kind, &id).await?;
    Ok(data.into_response())
}

async fn put_blob(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<StatusCode, ServerError> {
    let kind = blob_kind(&kind)?;
    state.store().put_blob(kind, &id, body.to_vec()).await?;
    info!("Stored {} config {}", kind, id);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_blob(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    let kind = blob_kind(&kind)?;
    state.store().delete_blob(kind, &id).await?;
    info!("Deleted {} config {}", kind, id);
    Ok(StatusCode::NO_CONTENT)
}
