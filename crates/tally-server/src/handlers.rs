//! Request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use serde_json::{Value, json};
use tally_analyze::AnalysisResult;
use tally_fs::{StagedFile, StagingOptions};

use crate::error::{ApiError, ApiResult};
use crate::pipeline;
use crate::state::AppState;

/// POST /analyze
///
/// Streams the configured multipart field to a staging file, then runs the
/// pipeline on it. Other fields are skipped.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let mut multipart = multipart?;
    let field_name = state.config.field_name.as_str();
    let temp_root = state.config.temp_root();

    let staged = loop {
        let Some(field) = multipart.next_field().await? else {
            return Err(ApiError::UploadMissing(field_name.to_owned()));
        };
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().unwrap_or("<unnamed>").to_owned();
        tracing::info!(filename = %filename, "receiving archive");
        break StagedFile::stage_stream(&temp_root, field, StagingOptions::new())
            .await
            .map_err(ApiError::Staging)?;
    };

    let result = pipeline::run(&state, staged).await?;
    tracing::info!(records = result.len(), "analysis complete");
    Ok(Json(result))
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
