//! Server test utilities.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tally_analyze::{Analyzer, RawOutput};
use tally_server::{AppState, ServerConfig, create_router};
use tempfile::TempDir;
use tower::ServiceExt;

use super::fixtures::{BOUNDARY, snapshot};

/// What the stub tool does when invoked.
#[allow(dead_code)]
pub enum StubBehavior {
    /// Exit 0 printing this on stdout.
    Print(String),
    /// Exit non-zero with this combined output.
    Fail(String),
}

/// A workspace as the stub saw it while "running".
#[derive(Clone, Debug)]
pub struct SeenWorkspace {
    pub path: PathBuf,
    pub files: BTreeMap<String, Vec<u8>>,
}

/// Analyzer standing in for the external tool.
pub struct StubAnalyzer {
    behavior: StubBehavior,
    seen: Mutex<Vec<SeenWorkspace>>,
}

#[allow(dead_code)]
impl StubAnalyzer {
    pub fn printing(output: impl Into<String>) -> Self {
        Self::new(StubBehavior::Print(output.into()))
    }

    pub fn failing(output: impl Into<String>) -> Self {
        Self::new(StubBehavior::Fail(output.into()))
    }

    fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<SeenWorkspace> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for StubAnalyzer {
    async fn analyze(&self, target: &Path) -> tally_analyze::Result<RawOutput> {
        self.seen.lock().unwrap().push(SeenWorkspace {
            path: target.to_path_buf(),
            files: snapshot(target),
        });
        match &self.behavior {
            StubBehavior::Print(output) => Ok(RawOutput::from_stdout(output.as_bytes())),
            StubBehavior::Fail(output) => Err(tally_analyze::Error::Failed {
                program: "stub".to_owned(),
                code: Some(2),
                output: output.clone().into_bytes(),
            }),
        }
    }
}

/// A router wired to a stub analyzer and a private temp root.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub analyzer: Arc<StubAnalyzer>,
    temp_root: PathBuf,
    temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    pub fn new(analyzer: StubAnalyzer) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let temp_root = temp_dir.path().join("scratch");
        std::fs::create_dir(&temp_root).expect("Failed to create temp root");

        let config = ServerConfig {
            temp_dir: Some(temp_root.clone()),
            ..ServerConfig::default()
        };
        let analyzer = Arc::new(analyzer);
        let state = AppState::new(config, analyzer.clone());

        Self {
            router: create_router(state),
            analyzer,
            temp_root,
            temp_dir,
        }
    }

    /// Directory staged uploads and workspaces are created in.
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Parent of the temp root, where escaping entries would land.
    pub fn outside(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Anything still present under the temp root.
    pub fn leftovers(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.temp_root)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    /// POST a multipart body to /analyze.
    pub async fn post_multipart(&self, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}
