//! Axum route handlers for the Rodin gateway API.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rodin_bridge::{
    render_addon, render_import_script, BlenderVersion, ScriptOptions, ADDON_FILE_NAME,
    IMPORT_SCRIPT_FILE_NAME,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::{codec::BodyCodec, error::GatewayError, guard, state::AppState};

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub credential_configured: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddonBody {
    #[serde(default)]
    pub blender_version: BlenderVersion,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router with the given state.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/generate", post(generate))
        .route("/bridge/import-script", post(import_script))
        .route("/bridge/addon", post(addon))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe; also reports whether a key is configured.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_owned(),
            credential_configured: state.config.api_key.is_some(),
        }),
    )
}

/// `POST /generate` — forward a generation request to the Rodin API.
///
/// JSON bodies go to `/rodin/generate`, multipart bodies to `/api/v2/rodin`.
/// A 2xx upstream JSON body is returned unchanged with status 200.
///
/// # Errors
/// - [`GatewayError::NotConfigured`] if no API key was configured at boot.
/// - [`GatewayError::InvalidBody`] if the content type is unsupported or the
///   body cannot be decoded.
/// - [`GatewayError::InvalidRequest`] if validation is enabled and fails.
/// - [`GatewayError::Transport`] if the outbound call fails.
/// - [`GatewayError::Upstream`] carrying the upstream status on non-2xx.
/// - [`GatewayError::InvalidUpstreamBody`] if a 2xx body is not JSON.
pub async fn generate(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Value>, GatewayError> {
    let request_id = Uuid::new_v4();
    forward_generation(&state, request)
        .instrument(tracing::info_span!("generate", %request_id))
        .await
}

async fn forward_generation(
    state: &AppState,
    request: Request,
) -> Result<Json<Value>, GatewayError> {
    let key = guard::require_credential(&state.config)?;

    let codec = BodyCodec::from_headers(request.headers()).ok_or_else(|| {
        let content_type = request.headers().get(header::CONTENT_TYPE).cloned();
        tracing::error!(?content_type, "unsupported content type for generation request");
        GatewayError::InvalidBody("unsupported content type".to_owned())
    })?;

    let body = codec
        .decode(request)
        .await
        .inspect_err(|e| tracing::error!(error = %e, ?codec, "failed to decode request body"))?;

    if state.config.validate_requests {
        crate::codec::validate(&body)
            .inspect_err(|e| tracing::warn!(error = %e, "generation request rejected"))?;
    }

    let endpoint = body.endpoint();
    let response = state
        .upstream
        .forward(key, body)
        .await
        .inspect_err(|e| tracing::error!(error = %e, %endpoint, "upstream call failed"))?;

    if !response.is_success() {
        let text = response.text();
        tracing::error!(
            status = response.status,
            body = log_excerpt(&text),
            %endpoint,
            "Rodin API error"
        );
        return Err(GatewayError::Upstream {
            status: response.status,
            details: state.config.expose_upstream_details.then_some(text),
        });
    }

    let data: Value = serde_json::from_slice(&response.body).map_err(|e| {
        tracing::error!(error = %e, %endpoint, "upstream success body is not JSON");
        GatewayError::InvalidUpstreamBody(e.to_string())
    })?;

    tracing::info!(%endpoint, status = response.status, "generation request relayed");
    Ok(Json(data))
}

/// `POST /bridge/import-script` — render a Blender import script.
///
/// # Errors
/// Returns [`GatewayError::InvalidRequest`] if the body is not valid JSON
/// options or the import scale is out of range.
pub async fn import_script(
    payload: Result<Json<ScriptOptions>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(options) = payload.map_err(|r| {
        tracing::warn!(error = %r.body_text(), "invalid import-script options");
        GatewayError::InvalidRequest(r.body_text())
    })?;
    let script = render_import_script(&options)
        .inspect_err(|e| tracing::warn!(error = %e, "import script rejected"))?;
    Ok(python_attachment(IMPORT_SCRIPT_FILE_NAME, script))
}

/// `POST /bridge/addon` — render the installable Blender addon.
///
/// # Errors
/// Returns [`GatewayError::InvalidRequest`] if the body is not valid JSON or
/// names an unsupported Blender version.
pub async fn addon(
    payload: Result<Json<AddonBody>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = payload.map_err(|r| {
        tracing::warn!(error = %r.body_text(), "invalid addon options");
        GatewayError::InvalidRequest(r.body_text())
    })?;
    Ok(python_attachment(ADDON_FILE_NAME, render_addon(body.blender_version)))
}

/// Longest slice of an upstream error body written to the log.
const LOG_EXCERPT_BYTES: usize = 512;

/// Cut `text` to at most [`LOG_EXCERPT_BYTES`] on a char boundary.
fn log_excerpt(text: &str) -> &str {
    if text.len() <= LOG_EXCERPT_BYTES {
        return text;
    }
    let mut end = LOG_EXCERPT_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn python_attachment(file_name: &str, source: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/x-python; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        source,
    )
        .into_response()
}
