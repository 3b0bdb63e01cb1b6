//! HTTP surface for archive analysis.
//!
//! A request walks through four stages, each short-circuiting the rest on
//! failure:
//! - stage the uploaded archive to a temp file
//! - unpack it into a fresh workspace
//! - run the analysis tool on the workspace
//! - decode the tool's JSON output
//!
//! The staged file and the workspace are removed on every exit path.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use config::{Cli, ServerConfig, ToolConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
