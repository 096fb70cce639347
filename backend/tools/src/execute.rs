use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use taskpilot_core::CodeRunner;

use crate::file::Workspace;

/// Runs Python files from the workspace with the configured interpreter.
///
/// No sandboxing: the script runs with the privileges of this process.
pub struct PythonRunner {
    workspace: Workspace,
    interpreter: String,
}

impl PythonRunner {
    pub fn new(workspace: Workspace, interpreter: impl Into<String>) -> Self {
        Self {
            workspace,
            interpreter: interpreter.into(),
        }
    }
}

#[async_trait]
impl CodeRunner for PythonRunner {
    async fn run_python(&self, file: &str) -> Result<String> {
        if !file.ends_with(".py") {
            return Ok("Error: Invalid file type. Only .py files are allowed.".to_string());
        }
        let path = self.workspace.resolve(file)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(format!("Error: File '{file}' does not exist."));
        }

        info!(file, interpreter = %self.interpreter, "Executing python file");
        let output = Command::new(&self.interpreter)
            .arg(&path)
            .current_dir(self.workspace.root())
            .output()
            .await
            .with_context(|| format!("Failed to start {}", self.interpreter))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(combined)
    }
}
