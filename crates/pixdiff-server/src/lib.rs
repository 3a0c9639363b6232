//! pixdiff-server - HTTP surface of the diff pipeline
//!
//! A small axum application with two routes:
//!
//! - `GET /` - service banner
//! - `POST /v1/diff` - run a diff and return the published overlay URLs
//!
//! The pipeline itself is blocking, so each request runs it under
//! `spawn_blocking`. Collaborators are boxed trait objects, which keeps
//! the router testable against in-memory fakes.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pixdiff_diff::{
    ArtifactPublisher, DEFAULT_NAME_PREFIX, DEFAULT_OPACITY, DiffError, DiffOutcome, DiffRequest,
    Differ, ImageFetcher,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, warn};

/// Fetcher trait object used by the server.
pub type BoxedFetcher = Box<dyn ImageFetcher + Send + Sync>;

/// Publisher trait object used by the server.
pub type BoxedPublisher = Box<dyn ArtifactPublisher + Send + Sync>;

/// Shared application state: the orchestrator plus server-level
/// configuration.
pub struct AppState {
    differ: Differ<BoxedFetcher, BoxedPublisher>,
    work_dir: Option<PathBuf>,
}

impl AppState {
    /// Assemble the state from collaborators and an optional work
    /// directory for on-disk debug artifacts.
    pub fn new(
        fetcher: BoxedFetcher,
        publisher: BoxedPublisher,
        work_dir: Option<PathBuf>,
    ) -> Self {
        AppState {
            differ: Differ::new(fetcher, publisher),
            work_dir,
        }
    }
}

/// Request body of `POST /v1/diff`.
///
/// Only the two image URLs are required; every other field falls back
/// to the pipeline defaults.
#[derive(Debug, Deserialize)]
pub struct DiffBody {
    /// URL of the before image
    pub before_image_url: String,
    /// URL of the after image
    pub after_image_url: String,
    /// Key prefix within the object store
    #[serde(default)]
    pub bucket_prefix: String,
    /// Prefix for artifact names
    #[serde(default = "default_name_prefix")]
    pub prefix: String,
    /// Overlay opacity
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Score threshold below which no overlays are produced
    #[serde(default)]
    pub threshold: f64,
}

fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}

fn default_opacity() -> f32 {
    DEFAULT_OPACITY
}

/// Response body of a successful diff.
#[derive(Debug, Serialize)]
pub struct DiffReply {
    /// `"changed"` or `"unchanged"`
    pub status: &'static str,
    /// The computed RMS difference score
    pub score: f64,
    /// Locator of the added overlay, present when changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_url: Option<String>,
    /// Locator of the removed overlay, present when changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_url: Option<String>,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorReply {
    /// Human-readable failure description
    pub error: String,
}

/// Build the router over the given state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/v1/diff", post(diff))
        .fallback(not_found)
        .with_state(state)
}

async fn index() -> &'static str {
    "pixdiff image differ"
}

async fn not_found() -> (StatusCode, Json<ErrorReply>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorReply {
            error: "not found".to_string(),
        }),
    )
}

async fn diff(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DiffBody>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorReply {
                    error: format!("invalid request body: {rejection}"),
                }),
            )
                .into_response();
        }
    };

    let mut request = DiffRequest::new(body.before_image_url, body.after_image_url);
    request.work_dir = state.work_dir.clone();
    request.publish_prefix = body.bucket_prefix;
    request.name_prefix = body.prefix;
    request.opacity = body.opacity;
    request.threshold = body.threshold;

    let outcome =
        tokio::task::spawn_blocking(move || state.differ.diff(&request)).await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(join_error) => {
            error!(%join_error, "diff task panicked");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorReply {
                    error: "internal error".to_string(),
                }),
            )
                .into_response();
        }
    };

    match outcome {
        Ok(DiffOutcome::NoDifference { score }) => (
            StatusCode::OK,
            Json(DiffReply {
                status: "unchanged",
                score,
                added_url: None,
                removed_url: None,
            }),
        )
            .into_response(),
        Ok(DiffOutcome::Changed {
            score,
            added,
            removed,
        }) => (
            StatusCode::OK,
            Json(DiffReply {
                status: "changed",
                score,
                added_url: Some(added.locator),
                removed_url: Some(removed.locator),
            }),
        )
            .into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// Map pipeline failures onto HTTP statuses.
fn error_response(err: DiffError) -> (StatusCode, Json<ErrorReply>) {
    let status = match &err {
        DiffError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DiffError::DimensionMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DiffError::Fetch(_) | DiffError::Publish { .. } => StatusCode::BAD_GATEWAY,
        DiffError::Core(_) | DiffError::Artifact(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(%err, %status, "diff request failed");
    (
        status,
        Json(ErrorReply {
            error: err.to_string(),
        }),
    )
}
