//! File operations confined to the agent workspace directory.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Root directory all file and code-execution commands are confined to.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the workspace directory if it does not exist yet.
    pub async fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create workspace {}", self.root.display()))
    }

    /// Map a relative path onto the workspace, rejecting anything that would escape it.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let relative = relative.trim();
        if relative.is_empty() {
            bail!("Empty file path");
        }
        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        bail!("Path '{relative}' escapes the workspace");
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    bail!("Absolute path '{relative}' is outside the workspace");
                }
            }
        }
        if depth == 0 {
            bail!("Path '{relative}' does not name a file");
        }
        Ok(resolved)
    }

    pub async fn read(&self, file: &str) -> Result<String> {
        let path = self.resolve(file)?;
        fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {file}"))
    }

    pub async fn write(&self, file: &str, text: &str) -> Result<()> {
        let path = self.resolve(file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        debug!(file, bytes = text.len(), "Writing workspace file");
        fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write {file}"))
    }

    pub async fn append(&self, file: &str, text: &str) -> Result<()> {
        let path = self.resolve(file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut handle = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open {file}"))?;
        handle.write_all(text.as_bytes()).await?;
        handle.flush().await?;
        Ok(())
    }

    pub async fn delete(&self, file: &str) -> Result<()> {
        let path = self.resolve(file)?;
        fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to delete {file}"))
    }

    pub async fn exists(&self, file: &str) -> Result<bool> {
        let path = self.resolve(file)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
