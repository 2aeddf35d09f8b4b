//! Engine process launching.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use gdmovie_common::error::{ExportError, ExportResult};
use gdmovie_export::{ArgumentVector, EngineVersion};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;

/// Starts the engine with a prepared argument vector and waits for it.
#[async_trait::async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Run the engine in `working_dir` and return its exit code.
    ///
    /// With `keep_open`, the engine's console output stays attached to the
    /// terminal and the launcher waits for acknowledgement after exit.
    async fn launch(
        &self,
        args: &ArgumentVector,
        working_dir: &Path,
        keep_open: bool,
    ) -> ExportResult<i32>;

    /// Engine version, when the launcher can determine it.
    async fn engine_version(&self) -> Option<EngineVersion> {
        None
    }

    /// Launcher name, for logs.
    fn name(&self) -> &str;
}

type AcknowledgementInput = Box<dyn AsyncRead + Send + Unpin>;

/// Launches a Godot executable.
pub struct EngineLauncher {
    binary: PathBuf,
    acknowledgement: Option<Mutex<AcknowledgementInput>>,
}

impl EngineLauncher {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            acknowledgement: None,
        }
    }

    /// Read the keep-open acknowledgement from `input` instead of stdin.
    pub fn with_acknowledgement_input(mut self, input: impl AsyncRead + Send + Unpin + 'static) -> Self {
        self.acknowledgement = Some(Mutex::new(Box::new(input)));
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Full path of the executable, searching `PATH` for bare names.
    pub fn resolve(&self) -> ExportResult<PathBuf> {
        which::which(&self.binary).map_err(|e| {
            ExportError::launch(format!("{} not found: {e}", self.binary.display()))
        })
    }

    /// Check if the engine executable can be found.
    pub fn is_available(&self) -> bool {
        self.resolve().is_ok()
    }

    /// Ask the engine for its version (`--version`).
    pub async fn query_version(&self) -> ExportResult<EngineVersion> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ExportError::launch(format!("Failed to run {} --version: {e}", self.binary.display()))
            })?;

        if !output.status.success() {
            return Err(ExportError::launch(format!(
                "{} --version failed (status {})",
                self.binary.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = stdout.trim().parse::<EngineVersion>()?;
        tracing::debug!(version = %version, "Engine reported its version");
        Ok(version)
    }
}

#[async_trait::async_trait]
impl ProcessLauncher for EngineLauncher {
    async fn launch(
        &self,
        args: &ArgumentVector,
        working_dir: &Path,
        keep_open: bool,
    ) -> ExportResult<i32> {
        tracing::debug!(
            binary = %self.binary.display(),
            args = %args,
            cwd = %working_dir.display(),
            "Launching engine"
        );

        let mut cmd = Command::new(&self.binary);
        cmd.args(args).current_dir(working_dir);
        if keep_open {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        } else {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }

        let mut child = cmd.spawn().map_err(|e| {
            ExportError::launch(format!("Failed to start {}: {e}", self.binary.display()))
        })?;

        tracing::info!(pid = ?child.id(), keep_open, "Engine process started");

        // Drain both pipes concurrently so the engine never blocks on a full pipe.
        let stdout_task = child
            .stdout
            .take()
            .map(|out| tokio::spawn(forward_lines(BufReader::new(out), "stdout")));
        let stderr_task = child
            .stderr
            .take()
            .map(|err| tokio::spawn(forward_lines(BufReader::new(err), "stderr")));

        let status = child
            .wait()
            .await
            .map_err(|e| ExportError::launch(format!("Failed to wait on engine: {e}")))?;

        for task in [stdout_task, stderr_task].into_iter().flatten() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Engine output reader failed");
            }
        }

        let code = exit_code(status)?;
        tracing::info!(code, "Engine process exited");

        if keep_open {
            eprintln!("Engine exited. Press Enter to close.");
            match &self.acknowledgement {
                Some(input) => {
                    let mut input = input.lock().await;
                    wait_for_acknowledgement(BufReader::new(&mut *input)).await;
                }
                None => wait_for_acknowledgement(BufReader::new(tokio::io::stdin())).await,
            }
        }

        Ok(code)
    }

    async fn engine_version(&self) -> Option<EngineVersion> {
        match self.query_version().await {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::debug!(error = %e, "Engine version unavailable");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "godot"
    }
}

async fn forward_lines<R>(reader: R, stream: &'static str)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => tracing::debug!(stream, "{line}"),
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(stream, error = %err, "Failed reading engine output");
                break;
            }
        }
    }
}

fn exit_code(status: ExitStatus) -> ExportResult<i32> {
    if let Some(code) = status.code() {
        return Ok(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(ExportError::launch(format!(
                "Engine terminated by signal {signal}"
            )));
        }
    }

    Err(ExportError::launch(format!(
        "Engine exited without a status code ({status})"
    )))
}

/// Block until a line (or end of input) arrives on `input`.
async fn wait_for_acknowledgement<R>(mut input: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if let Err(err) = input.read_line(&mut line).await {
        tracing::debug!(error = %err, "Could not read acknowledgement");
    }
}
