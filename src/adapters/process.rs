use crate::domain::model::TrainingOutcome;
use crate::domain::ports::TrainingLauncher;
use crate::utils::error::{MlopsError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const STDERR_TAIL_BYTES: usize = 2048;

/// Runs the training pipeline as a child process and reports its exit status.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
            timeout: None,
        }
    }

    /// Build from an argv-style list: the first element is the program.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or_else(|| MlopsError::MissingConfigError {
            field: "training.command".to_string(),
        })?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn tail(bytes: &[u8]) -> String {
    let start = bytes.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(&bytes[start..]).trim().to_string()
}

#[async_trait]
impl TrainingLauncher for CommandLauncher {
    async fn launch(&self) -> Result<TrainingOutcome> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::info!("🚀 Launching training command: {}", self.display());
        let output_future = command.output();

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    return Ok(TrainingOutcome::Failed {
                        exit_code: None,
                        detail: format!("timed out after {:?}", limit),
                    });
                }
            },
            None => output_future.await,
        }
        .map_err(|e| MlopsError::CommandError {
            command: self.display(),
            reason: e.to_string(),
        })?;

        if output.status.success() {
            tracing::debug!("Training command finished: {}", output.status);
            Ok(TrainingOutcome::Succeeded)
        } else {
            Ok(TrainingOutcome::Failed {
                exit_code: output.status.code(),
                detail: tail(&output.stderr),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandLauncher {
        CommandLauncher::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn test_successful_command() {
        assert_eq!(sh("exit 0").launch().await.unwrap(), TrainingOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_failed_command_reports_status_and_stderr() {
        let outcome = sh("echo boom >&2; exit 3").launch().await.unwrap();
        assert_eq!(
            outcome,
            TrainingOutcome::Failed {
                exit_code: Some(3),
                detail: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_timeout() {
        let outcome = sh("sleep 5")
            .with_timeout(Some(Duration::from_millis(100)))
            .launch()
            .await
            .unwrap();
        assert!(matches!(outcome, TrainingOutcome::Failed { exit_code: None, .. }));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let launcher = CommandLauncher::new("/definitely/not/a/program", vec![]);
        assert!(matches!(
            launcher.launch().await,
            Err(MlopsError::CommandError { .. })
        ));
    }

    #[test]
    fn test_from_argv() {
        assert!(CommandLauncher::from_argv(&[]).is_err());
        let launcher =
            CommandLauncher::from_argv(&["wine-mlops".to_string(), "train".to_string()]).unwrap();
        assert_eq!(launcher.display(), "wine-mlops train");
    }
}
