//! API error types.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Archive entry that failed the path-confinement check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Output captured from a failed tool run, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<String>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("field '{0}' not found")]
    UploadMissing(String),

    #[error("invalid multipart body: {0}")]
    Multipart(String),

    #[error("failed to stage upload: {0}")]
    Staging(#[source] tally_fs::Error),

    #[error("invalid file path in archive: {entry}")]
    PathEscape { entry: String },

    #[error("failed to extract archive: {0}")]
    Extraction(#[source] tally_archive::Error),

    #[error("failed to run analysis tool: {source}")]
    ToolExecution {
        source: tally_analyze::Error,
        output: Option<String>,
    },

    #[error("failed to decode analysis output: {0}")]
    Decode(#[source] tally_analyze::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UploadMissing(_) => "upload_missing",
            Self::Multipart(_) => "bad_request",
            Self::Staging(_) => "staging_failed",
            Self::PathEscape { .. } => "path_escape",
            Self::Extraction(_) => "extraction_failed",
            Self::ToolExecution { .. } => "tool_failed",
            Self::Decode(_) => "decode_failed",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UploadMissing(_) | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tally_archive::Error> for ApiError {
    fn from(e: tally_archive::Error) -> Self {
        match e {
            // Only the entry name leaves the server; the resolved path would
            // reveal the workspace location.
            tally_archive::Error::PathEscape { entry, .. } => Self::PathEscape { entry },
            other => Self::Extraction(other),
        }
    }
}

impl From<tally_analyze::Error> for ApiError {
    fn from(e: tally_analyze::Error) -> Self {
        if e.is_tool_failure() {
            let output = e
                .captured_output()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
            Self::ToolExecution { source: e, output }
        } else {
            Self::Decode(e)
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Multipart(e.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::Multipart(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "analysis request failed");
        } else {
            tracing::info!(code = self.code(), error = %self, "rejected analysis request");
        }

        let (path, tool_output) = match &self {
            Self::PathEscape { entry } => (Some(entry.clone()), None),
            Self::ToolExecution { output, .. } => (None, output.clone()),
            _ => (None, None),
        };
        let body = ErrorResponse {
            error: self.to_string(),
            path,
            tool_output,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn path_escape_keeps_only_entry_name() {
        let err = ApiError::from(tally_archive::Error::PathEscape {
            entry: "../../etc/passwd".to_owned(),
            resolved: PathBuf::from("/tmp/analysis-secret/../../etc/passwd"),
        });
        assert!(matches!(&err, ApiError::PathEscape { entry } if entry == "../../etc/passwd"));
        assert!(!err.to_string().contains("analysis-secret"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn tool_failure_carries_output() {
        let err = ApiError::from(tally_analyze::Error::Failed {
            program: "scc".to_owned(),
            code: Some(1),
            output: b"unknown flag".to_vec(),
        });
        match err {
            ApiError::ToolExecution { output, .. } => {
                assert_eq!(output.as_deref(), Some("unknown flag"))
            }
            other => panic!("expected tool failure, got {other:?}"),
        }
    }

    #[test]
    fn decode_failures_map_to_decode() {
        let err = ApiError::from(tally_analyze::Error::EmptyOutput);
        assert_eq!(err.code(), "decode_failed");
    }

    #[test]
    fn missing_upload_is_bad_request() {
        let err = ApiError::UploadMissing("project_zip".to_owned());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "field 'project_zip' not found");
    }
}
