//! Boot endpoints
//!
//! Serves the boot scripts and configs machines fetch while network booting.
//! Labels are read from the query string, so iPXE's inspect script and GRUB2
//! configs can report them with plain URL templating.

use crate::error::ServerError;
use crate::state::AppState;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use boot_core::{CoreError, IPXE_INSPECT_SCRIPT};
use boot_model::LabelSet;
use boot_store::{BlobKind, StoreError};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Routes for boot scripts, configs, health and metrics.
pub fn boot_router() -> Router<AppState> {
    Router::new()
        .route("/boot.ipxe", get(inspect))
        .route("/boot.ipxe.0", get(inspect))
        .route("/ipxe", get(ipxe))
        .route("/grub", get(grub))
        .route("/ignition", get(ignition))
        .route("/cloud", get(cloud))
        .route("/generic", get(generic))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
}

fn labels(query: Vec<(String, String)>) -> LabelSet {
    LabelSet::from_query_pairs(query)
}

fn script(body: String) -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

/// Serves the static script that makes iPXE report its labels.
async fn inspect() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], IPXE_INSPECT_SCRIPT).into_response()
}

/// Serves the iPXE boot or chain script for the requesting machine.
async fn ipxe(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    let labels = labels(query);
    let body = state.render("ipxe", &labels, state.ipxe.as_ref()).await?;
    Ok(script(body))
}

/// Serves the GRUB2 config for the requesting machine.
async fn grub(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    let labels = labels(query);
    let body = state.render("grub", &labels, state.grub.as_ref()).await?;
    Ok(script(body))
}

async fn ignition(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    blob(&state, BlobKind::Ignition, labels(query)).await
}

async fn cloud(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    blob(&state, BlobKind::Cloud, labels(query)).await
}

async fn generic(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    blob(&state, BlobKind::Generic, labels(query)).await
}

/// Serves the config blob of `kind` referenced by the machine's profile.
async fn blob(state: &AppState, kind: BlobKind, labels: LabelSet) -> Result<Response, ServerError> {
    let endpoint = kind.as_str();
    let selection = state.select(endpoint, &labels).await?;

    let Some(id) = kind.reference(&selection.profile) else {
        state.report(endpoint, &labels, &selection, None);
        return Err(ServerError::NotFound(format!(
            "profile {} has no {kind} config",
            selection.profile.id
        )));
    };

    match state.store().get_blob(kind, id).await {
        Ok(data) => {
            state.report(endpoint, &labels, &selection, None);
            Ok((StatusCode::OK, [(CONTENT_TYPE, content_type(kind))], data).into_response())
        }
        Err(StoreError::NotFound { .. }) => {
            state.report(endpoint, &labels, &selection, None);
            Err(ServerError::NotFound(format!("{kind} config not found: {id}")))
        }
        Err(err) => {
            let err = CoreError::from(err);
            state.report(endpoint, &labels, &selection, Some(&err));
            Err(err.into())
        }
    }
}

fn content_type(kind: BlobKind) -> &'static str {
    match kind {
        BlobKind::Ignition => "application/json",
        BlobKind::Cloud | BlobKind::Generic => TEXT_PLAIN,
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<AppState>) -> Result<Response, ServerError> {
    let body = state.metrics.render()?;
    Ok((StatusCode::OK, [(CONTENT_TYPE, state.metrics.content_type())], body).into_response())
}
