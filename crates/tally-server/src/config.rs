//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tally_analyze::CommandAnalyzer;
use tally_archive::ExtractOptions;

/// Default request body limit (256 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 256 * 1024 * 1024;

/// Default multipart field carrying the archive.
pub const DEFAULT_FIELD: &str = "project_zip";

/// Runtime configuration, independent of how it was supplied.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind: SocketAddr,
    /// Multipart field that must carry the archive.
    pub field_name: String,
    /// Directory for staged uploads and workspaces. System temp when unset.
    pub temp_dir: Option<PathBuf>,
    /// Maximum accepted request body in bytes.
    pub body_limit: usize,
    pub extract: ExtractOptions,
    pub tool: ToolConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            field_name: DEFAULT_FIELD.to_owned(),
            temp_dir: None,
            body_limit: DEFAULT_BODY_LIMIT,
            extract: ExtractOptions::default(),
            tool: ToolConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Directory new staged files and workspaces are created in.
    pub fn temp_root(&self) -> PathBuf {
        tally_fs::temp_root(self.temp_dir.as_deref())
    }
}

/// External analysis tool invocation.
#[derive(Clone, Debug)]
pub struct ToolConfig {
    pub program: String,
    /// Arguments placed before the workspace path.
    pub args: Vec<String>,
    /// No timeout when unset.
    pub timeout: Option<Duration>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "scc".to_owned(),
            args: vec!["--format=json".to_owned()],
            timeout: None,
        }
    }
}

impl ToolConfig {
    pub fn analyzer(&self) -> CommandAnalyzer {
        let analyzer = CommandAnalyzer::new(&self.program).args(&self.args);
        match self.timeout {
            Some(timeout) => analyzer.with_timeout(timeout),
            None => analyzer,
        }
    }
}

/// tallyd - analyze uploaded source archives
#[derive(Parser, Debug)]
#[command(name = "tallyd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "TALLY_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Multipart field carrying the archive
    #[arg(long, env = "TALLY_FIELD", default_value = DEFAULT_FIELD)]
    pub field: String,

    /// Directory for staged uploads and workspaces (defaults to the system temp dir)
    #[arg(long, env = "TALLY_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Maximum request body size in bytes
    #[arg(long, env = "TALLY_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Analysis tool to run
    #[arg(long, env = "TALLY_TOOL", default_value = "scc")]
    pub tool: String,

    /// Argument passed to the tool before the workspace path (repeatable)
    #[arg(
        long = "tool-arg",
        env = "TALLY_TOOL_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "--format=json"
    )]
    pub tool_args: Vec<String>,

    /// Kill the tool after this many seconds
    #[arg(long, env = "TALLY_TOOL_TIMEOUT_SECS")]
    pub tool_timeout_secs: Option<u64>,

    /// Reject archives with more entries than this
    #[arg(long, env = "TALLY_MAX_ENTRIES")]
    pub max_entries: Option<usize>,

    /// Reject archives that unpack to more bytes than this
    #[arg(long, env = "TALLY_MAX_UNPACKED_BYTES")]
    pub max_unpacked_bytes: Option<u64>,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        let mut extract = ExtractOptions::default();
        if let Some(max) = self.max_entries {
            extract = extract.max_entries(max);
        }
        if let Some(max) = self.max_unpacked_bytes {
            extract = extract.max_unpacked_bytes(max);
        }

        ServerConfig {
            bind: self.bind,
            field_name: self.field,
            temp_dir: self.temp_dir,
            body_limit: self.body_limit,
            extract,
            tool: ToolConfig {
                program: self.tool,
                args: self.tool_args,
                timeout: self.tool_timeout_secs.map(Duration::from_secs),
            },
        }
    }
}
