//! # API REST
//!
//! REST API implementation for MedSimplify.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for request and response types. Building the [`Router`] is separate from
//! serving it, so the workspace binary decides the address and tests can drive it in-process.

#![warn(rust_2018_idioms)]

mod response;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use api_shared::{
    GlossaryEntryRes, GlossaryRes, HealthRes, HealthService, MatchDto, SegmentDto, SegmentKind,
    SessionRes, SimplifyImageReq, SimplifyReq, SimplifyRes, TermDto,
};
use medsimplify_core::{NonEmptyText, SessionGlossary, SessionRegistry, SimplifierService, TermKey};
use medsimplify_provider::{Acquisition, ImagePayload, TermAcquirer};

type ApiError = (StatusCode, &'static str);

/// Application state for the REST API server
///
/// Shared by all request handlers: the term acquirer (remote provider plus offline fallback)
/// and the registry of live sessions with their glossaries.
#[derive(Clone)]
pub struct AppState {
    acquirer: Arc<TermAcquirer>,
    sessions: Arc<SessionRegistry>,
    simplifier: SimplifierService,
}

impl AppState {
    pub fn new(acquirer: TermAcquirer) -> Self {
        Self::with_sessions(acquirer, SessionRegistry::new())
    }

    pub fn with_sessions(acquirer: TermAcquirer, sessions: SessionRegistry) -> Self {
        Self {
            acquirer: Arc::new(acquirer),
            sessions: Arc::new(sessions),
            simplifier: SimplifierService::new(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        simplify,
        simplify_image,
        create_session,
        end_session,
        list_glossary,
        save_term,
        unsave_term,
        toggle_term,
    ),
    components(schemas(
        HealthRes,
        SimplifyReq,
        SimplifyImageReq,
        SimplifyRes,
        MatchDto,
        SegmentDto,
        SegmentKind,
        TermDto,
        SessionRes,
        GlossaryRes,
        GlossaryEntryRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI at `/swagger-ui` and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/simplify", post(simplify))
        .route("/simplify/image", post(simplify_image))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", delete(end_session))
        .route("/sessions/:id/glossary", get(list_glossary))
        .route(
            "/sessions/:id/glossary/:term",
            put(save_term).delete(unsave_term),
        )
        .route("/sessions/:id/glossary/:term/toggle", post(toggle_term))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/simplify",
    request_body = SimplifyReq,
    responses(
        (status = 200, description = "Annotated and substituted views of the text", body = SimplifyRes),
        (status = 400, description = "Empty text or invalid session id"),
        (status = 404, description = "Session not found")
    )
)]
/// Simplify pasted text
///
/// Terms come from the remote provider when it is configured and reachable, otherwise from the
/// local dictionary; `provenance` says which.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the text is empty or whitespace only, or
/// - `session_id` is not a UUID.
///
/// Returns `404 Not Found` if `session_id` names no live session.
#[axum::debug_handler]
async fn simplify(
    State(state): State<AppState>,
    Json(req): Json<SimplifyReq>,
) -> Result<Json<SimplifyRes>, ApiError> {
    if let Err(e) = NonEmptyText::new(&req.text) {
        tracing::error!("Invalid simplify request: {:?}", e);
        return Err((StatusCode::BAD_REQUEST, "Text must not be empty"));
    }
    let glossary = optional_glossary(&state, req.session_id.as_deref())?;

    let acquisition = state.acquirer.acquire_text(&req.text).await;
    Ok(Json(render(&state, acquisition, glossary.as_deref())))
}

#[utoipa::path(
    post,
    path = "/simplify/image",
    request_body = SimplifyImageReq,
    responses(
        (status = 200, description = "Annotated and substituted views of the document text", body = SimplifyRes),
        (status = 400, description = "Invalid image or session id"),
        (status = 404, description = "Session not found")
    )
)]
/// Simplify the text of a document image
///
/// The image is validated before any provider call.
#[axum::debug_handler]
async fn simplify_image(
    State(state): State<AppState>,
    Json(req): Json<SimplifyImageReq>,
) -> Result<Json<SimplifyRes>, ApiError> {
    let image = match ImagePayload::parse(&req.image) {
        Ok(image) => image,
        Err(e) => {
            tracing::error!("Invalid image payload: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "Invalid image payload"));
        }
    };
    tracing::debug!(
        "received {} byte image ({})",
        image.byte_len(),
        image.mime_type().unwrap_or("unknown type")
    );
    let glossary = optional_glossary(&state, req.session_id.as_deref())?;

    let acquisition = state.acquirer.acquire_image(&image).await;
    Ok(Json(render(&state, acquisition, glossary.as_deref())))
}

#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session started", body = SessionRes)
    )
)]
/// Start a session with an empty glossary
#[axum::debug_handler]
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionRes>) {
    let id = state.sessions.start();
    (
        StatusCode::CREATED,
        Json(SessionRes {
            session_id: id.to_string(),
        }),
    )
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 204, description = "Session ended and its glossary discarded"),
        (status = 400, description = "Invalid session id"),
        (status = 404, description = "Session not found")
    )
)]
/// End a session
#[axum::debug_handler]
async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    match state.sessions.end(id) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            tracing::error!("End session error: {:?}", e);
            Err((StatusCode::NOT_FOUND, "Session not found"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/glossary",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Saved terms, sorted", body = GlossaryRes),
        (status = 400, description = "Invalid session id"),
        (status = 404, description = "Session not found")
    )
)]
/// List the terms saved in a session
#[axum::debug_handler]
async fn list_glossary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GlossaryRes>, ApiError> {
    let id = parse_session_id(&id)?;
    let glossary = session_glossary(&state, id)?;
    Ok(Json(GlossaryRes {
        session_id: id.to_string(),
        terms: glossary.keys().into_iter().map(|key| key.to_string()).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/glossary/{term}",
    params(
        ("id" = String, Path, description = "Session identifier"),
        ("term" = String, Path, description = "Term to save, any casing")
    ),
    responses(
        (status = 200, description = "Term saved", body = GlossaryEntryRes),
        (status = 400, description = "Invalid session id or empty term"),
        (status = 404, description = "Session not found")
    )
)]
/// Save a term to the session glossary
#[axum::debug_handler]
async fn save_term(
    State(state): State<AppState>,
    Path((id, term)): Path<(String, String)>,
) -> Result<Json<GlossaryEntryRes>, ApiError> {
    update_glossary(&state, &id, &term, |glossary, key| {
        glossary.save(key.as_str());
        true
    })
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}/glossary/{term}",
    params(
        ("id" = String, Path, description = "Session identifier"),
        ("term" = String, Path, description = "Term to remove, any casing")
    ),
    responses(
        (status = 200, description = "Term removed", body = GlossaryEntryRes),
        (status = 400, description = "Invalid session id or empty term"),
        (status = 404, description = "Session not found")
    )
)]
/// Remove a term from the session glossary
#[axum::debug_handler]
async fn unsave_term(
    State(state): State<AppState>,
    Path((id, term)): Path<(String, String)>,
) -> Result<Json<GlossaryEntryRes>, ApiError> {
    update_glossary(&state, &id, &term, |glossary, key| {
        glossary.unsave(key.as_str());
        false
    })
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/glossary/{term}/toggle",
    params(
        ("id" = String, Path, description = "Session identifier"),
        ("term" = String, Path, description = "Term to toggle, any casing")
    ),
    responses(
        (status = 200, description = "New saved state of the term", body = GlossaryEntryRes),
        (status = 400, description = "Invalid session id or empty term"),
        (status = 404, description = "Session not found")
    )
)]
/// Toggle a term in the session glossary
#[axum::debug_handler]
async fn toggle_term(
    State(state): State<AppState>,
    Path((id, term)): Path<(String, String)>,
) -> Result<Json<GlossaryEntryRes>, ApiError> {
    update_glossary(&state, &id, &term, |glossary, key| {
        glossary.toggle(key.as_str())
    })
}

fn render(
    state: &AppState,
    acquisition: Acquisition,
    glossary: Option<&SessionGlossary>,
) -> SimplifyRes {
    let content = state
        .simplifier
        .simplify(acquisition.content.source_text, acquisition.content.terms);
    response::simplify_res(&content, &acquisition.provenance, glossary)
}

fn update_glossary(
    state: &AppState,
    id: &str,
    term: &str,
    apply: impl FnOnce(&SessionGlossary, &TermKey) -> bool,
) -> Result<Json<GlossaryEntryRes>, ApiError> {
    let id = parse_session_id(id)?;
    let key = TermKey::new(term);
    if key.as_str().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Term must not be empty"));
    }
    let glossary = session_glossary(state, id)?;
    let saved = apply(&glossary, &key);
    Ok(Json(GlossaryEntryRes {
        term_key: key.to_string(),
        saved,
    }))
}

fn parse_session_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| {
        tracing::error!("Invalid session UUID: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid session UUID")
    })
}

fn session_glossary(state: &AppState, id: Uuid) -> Result<Arc<SessionGlossary>, ApiError> {
    state.sessions.glossary(id).map_err(|e| {
        tracing::error!("Session lookup error: {:?}", e);
        (StatusCode::NOT_FOUND, "Session not found")
    })
}

fn optional_glossary(
    state: &AppState,
    id: Option<&str>,
) -> Result<Option<Arc<SessionGlossary>>, ApiError> {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Ok(Some(session_glossary(state, parse_session_id(id)?)?)),
        None => Ok(None),
    }
}
