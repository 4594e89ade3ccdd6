//! External command execution
//!
//! Package manager probes, installs, and build commands all go through the
//! [`CommandRunner`] trait so the migration pipeline can be exercised without
//! a real shell.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::ProcessError;

/// Description of a command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    shell_line: Option<String>,
}

impl CommandSpec {
    /// Run `program` directly, without a shell
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            shell_line: None,
        }
    }

    /// Run a full command line through the platform shell
    pub fn shell(command_line: impl Into<String>) -> Self {
        let line = command_line.into();
        let (program, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        Self {
            program: program.to_string(),
            args: vec![flag.to_string(), line.clone()],
            current_dir: None,
            shell_line: Some(line),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Human-readable command line, as a user would type it
    pub fn command_line(&self) -> String {
        match self.shell_line {
            Some(ref line) => line.clone(),
            None if self.args.is_empty() => self.program.clone(),
            None => format!("{} {}", self.program, self.args.join(" ")),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
    /// Whether the process exited successfully
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful exit with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed exit with the given code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Runs external commands and captures their output.
///
/// A non-zero exit is reported through [`CommandOutput::success`]; `Err` is
/// reserved for commands that could not be started or did not finish.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError>;
}

/// Runs commands on the host with `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every command by `timeout` (`None` waits indefinitely).
    ///
    /// On expiry only the direct child is killed. Processes it spawned, such
    /// as those started by a shell build command, are left running.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    #[instrument(skip(self), fields(command = %spec))]
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = spec.current_dir {
            cmd.current_dir(dir);
        }

        let pending = cmd.output();
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| ProcessError::Timeout {
                    command: spec.command_line(),
                    seconds: limit.as_secs_f64(),
                })?,
            None => pending.await,
        };

        let output = result.map_err(|e| ProcessError::SpawnFailed {
            command: spec.command_line(),
            reason: e.to_string(),
        })?;

        debug!(status = ?output.status.code(), "command finished");

        Ok(CommandOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedRunner;

#[cfg(any(test, feature = "test-util"))]
mod scripted {
    use std::sync::Mutex;

    use super::*;

    enum Reply {
        Output(CommandOutput),
        SpawnFailure,
    }

    /// Scripted [`CommandRunner`] that records every invocation.
    ///
    /// Replies are matched by command-line prefix in registration order;
    /// unmatched commands succeed with empty output.
    #[derive(Default)]
    pub struct ScriptedRunner {
        rules: Vec<(String, Reply)>,
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reply with `output` to commands starting with `prefix`
        pub fn on(mut self, prefix: impl Into<String>, output: CommandOutput) -> Self {
            self.rules.push((prefix.into(), Reply::Output(output)));
            self
        }

        /// Fail to spawn commands starting with `prefix`, as if not installed
        pub fn missing(mut self, prefix: impl Into<String>) -> Self {
            self.rules.push((prefix.into(), Reply::SpawnFailure));
            self
        }

        /// Every command run so far
        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }

        /// Command lines run so far
        pub fn command_lines(&self) -> Vec<String> {
            self.calls().iter().map(CommandSpec::command_line).collect()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
            self.calls
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(spec.clone());

            let line = spec.command_line();
            match self.rules.iter().find(|(prefix, _)| line.starts_with(prefix.as_str())) {
                Some((_, Reply::Output(output))) => Ok(output.clone()),
                Some((_, Reply::SpawnFailure)) => Err(ProcessError::SpawnFailed {
                    command: line,
                    reason: "No such file or directory (os error 2)".to_string(),
                }),
                None => Ok(CommandOutput::ok("")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let spec = CommandSpec::new("pnpm").args(["add", "wrangler@latest"]);
        assert_eq!(spec.command_line(), "pnpm add wrangler@latest");
        assert_eq!(spec.to_string(), "pnpm add wrangler@latest");

        let shell = CommandSpec::shell("bun run build").current_dir("/tmp/site");
        assert_eq!(shell.command_line(), "bun run build");
        assert_eq!(shell.get_args().last().map(String::as_str), Some("bun run build"));
        assert_eq!(shell.get_current_dir(), Some(Path::new("/tmp/site")));
    }

    #[test]
    fn test_combined_output() {
        let output = CommandOutput {
            exit_code: Some(1),
            success: false,
            stdout: "building\n".to_string(),
            stderr: "error: boom\n".to_string(),
        };
        assert_eq!(output.combined(), "building\nerror: boom\n");
    }

    #[tokio::test]
    async fn test_scripted_runner_matches_prefix_and_records() {
        let runner = ScriptedRunner::new()
            .on("npm --version", CommandOutput::ok("10.2.0\n"))
            .missing("bun");

        let out = runner.run(&CommandSpec::new("npm").arg("--version")).await.unwrap();
        assert_eq!(out.stdout, "10.2.0\n");

        let err = runner.run(&CommandSpec::new("bun").arg("--version")).await;
        assert!(matches!(err, Err(ProcessError::SpawnFailed { .. })));

        let default = runner.run(&CommandSpec::shell("make")).await.unwrap();
        assert!(default.success);

        assert_eq!(
            runner.command_lines(),
            vec!["npm --version", "bun --version", "make"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_both_streams() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let spec = CommandSpec::shell("echo out; echo err 1>&2; exit 3").current_dir(temp.path());

        let output = runner.run(&spec).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.combined(), "out\nerr\n");
    }

    #[tokio::test]
    async fn test_system_runner_missing_program() {
        let runner = SystemRunner::new();
        let spec = CommandSpec::new("autofix-definitely-not-installed").arg("--version");

        let err = runner.run(&spec).await.unwrap_err();
        assert!(matches!(err, ProcessError::SpawnFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_timeout() {
        let runner = SystemRunner::new().with_timeout(Some(Duration::from_millis(100)));
        let err = runner.run(&CommandSpec::shell("sleep 5")).await.unwrap_err();
        assert!(matches!(err, ProcessError::Timeout { .. }));
        assert_eq!(err.to_string(), "Command 'sleep 5' timed out after 0.1s");
    }
}
