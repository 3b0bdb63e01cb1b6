//! Extraction, analysis and decoding for one staged upload.

use std::path::Path;

use tally_analyze::{AnalysisResult, Analyzer};
use tally_fs::{StagedFile, Workspace};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Run everything after staging.
///
/// Takes ownership of the staged file so both it and the workspace are
/// released here, whichever stage fails.
pub async fn run(state: &AppState, staged: StagedFile) -> ApiResult<AnalysisResult> {
    let workspace = Workspace::allocate(&state.config.temp_root()).map_err(ApiError::Staging)?;
    let options = state.config.extract;

    tracing::info!(
        archive = %staged.path().display(),
        bytes = staged.len(),
        workspace = %workspace.path().display(),
        "extracting archive"
    );

    // The blocking task owns both guards while it writes, so a dropped
    // request cannot remove the workspace underneath the extraction.
    let (staged, workspace, extracted) = tokio::task::spawn_blocking(move || {
        let extracted = tally_archive::extract_file(staged.path(), workspace.path(), &options);
        (staged, workspace, extracted)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))?;

    if let Err(e) = staged.release() {
        tracing::warn!(error = %e, "failed to remove staged archive");
    }
    let report = extracted?;
    tracing::info!(
        entries = report.entry_count,
        bytes = report.total_bytes,
        "archive extracted"
    );

    let outcome = analyze(state.analyzer.as_ref(), workspace.path()).await;

    if let Err(e) = workspace.release() {
        tracing::warn!(error = %e, "failed to remove workspace");
    }
    outcome
}

async fn analyze(analyzer: &dyn Analyzer, root: &Path) -> ApiResult<AnalysisResult> {
    let raw = analyzer.analyze(root).await?;
    let result = tally_analyze::decode(&raw)?;
    Ok(result)
}
