use std::io;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to launch '{program}': {source}")]
    Spawn { program: String, source: io::Error },

    #[error("'{program}' exited unsuccessfully (code {code:?})")]
    Failed {
        program: String,
        code: Option<i32>,
        output: Vec<u8>,
    },

    #[error("'{program}' did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    #[error("tool produced no output")]
    EmptyOutput,

    #[error("tool output is not a JSON array of records: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Whether the tool itself failed, as opposed to its output being unusable.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::Failed { .. } | Self::TimedOut { .. })
    }

    /// Output captured from a tool that exited unsuccessfully.
    pub fn captured_output(&self) -> Option<&[u8]> {
        match self {
            Self::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
