use crate::errors::AppError;
use crate::models::{labels, LabelsResponse};
use crate::session::{run_pipeline, DashboardSession};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, Redirect},
    Json,
};
use serde::Deserialize;
use tokio::task;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub name: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(render_index(session.as_ref()))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSession>, AppError> {
    let session = state.session.lock().await;
    session
        .clone()
        .map(Json)
        .ok_or_else(|| AppError::not_found("no dashboard loaded"))
}

pub async fn get_labels() -> Json<LabelsResponse> {
    Json(labels())
}

pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DashboardSession>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    // Held across the run so uploads replace the session one at a time.
    let mut current = state.session.lock().await;
    let name = params.name.clone();
    let outcome = task::spawn_blocking(move || run_pipeline(&name, &content_type, &body))
        .await
        .map_err(AppError::internal)?;
    let session = match outcome {
        Ok(session) => session,
        Err(err) => {
            warn!(file = %params.name, "upload rejected: {err}");
            return Err(err.into());
        }
    };

    info!(
        file = %session.file_name,
        entries = session.entry_count,
        "dashboard rebuilt"
    );
    *current = Some(session.clone());
    Ok(Json(session))
}

pub async fn reset(State(state): State<AppState>) -> StatusCode {
    dispose_session(&state).await;
    StatusCode::NO_CONTENT
}

pub async fn reset_form(State(state): State<AppState>) -> Redirect {
    dispose_session(&state).await;
    Redirect::to("/")
}

async fn dispose_session(state: &AppState) {
    let previous = state.session.lock().await.take();
    if let Some(session) = previous {
        info!(file = %session.file_name, "dashboard reset");
    }
}
