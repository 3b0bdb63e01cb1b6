use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Output captured from a tool run that exited successfully.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RawOutput {
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self { stdout, stderr }
    }

    pub fn from_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self::new(stdout.into(), Vec::new())
    }

    /// Both streams as one buffer, stdout first.
    pub fn combined(&self) -> Cow<'_, [u8]> {
        if self.stderr.is_empty() {
            Cow::Borrowed(&self.stdout)
        } else {
            let mut buf = Vec::with_capacity(self.stdout.len() + self.stderr.len());
            buf.extend_from_slice(&self.stdout);
            buf.extend_from_slice(&self.stderr);
            Cow::Owned(buf)
        }
    }
}

/// Runs an analysis against a directory.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze `target`, returning the tool's output on success.
    ///
    /// A tool that cannot be launched, exits non-zero or is cancelled fails
    /// with an error for which [`Error::is_tool_failure`] holds.
    async fn analyze(&self, target: &Path) -> Result<RawOutput>;
}

/// An [`Analyzer`] backed by an external program.
///
/// The program runs as `program [args...] <target>`.
#[derive(Clone, Debug)]
pub struct CommandAnalyzer {
    program: String,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl CommandAnalyzer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// `scc --format=json <target>`.
    pub fn scc() -> Self {
        Self::new("scc").arg("--format=json")
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Kill the tool if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn command(&self, target: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(target)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for CommandAnalyzer {
    fn default() -> Self {
        Self::scc()
    }
}

#[async_trait]
impl Analyzer for CommandAnalyzer {
    async fn analyze(&self, target: &Path) -> Result<RawOutput> {
        let mut cmd = self.command(target);
        tracing::info!(program = %self.program, target = %target.display(), "running analysis tool");

        let output = match self.timeout {
            // Dropping the output future on expiry kills the child.
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| Error::TimedOut {
                    program: self.program.clone(),
                    timeout,
                })?,
            None => cmd.output().await,
        }
        .map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let raw = RawOutput::new(output.stdout, output.stderr);
        if !output.status.success() {
            tracing::warn!(
                program = %self.program,
                status = %output.status,
                output = %String::from_utf8_lossy(&raw.combined()),
                "analysis tool failed"
            );
            return Err(Error::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                output: raw.combined().into_owned(),
            });
        }

        tracing::debug!(program = %self.program, bytes = raw.stdout.len(), "analysis tool finished");
        Ok(raw)
    }
}
