//! QR label printing.
//!
//! Printing is a side channel: it reads nothing from the store and a failure
//! here never touches stored data.

use std::process::Stdio;
use std::sync::Mutex;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use stocktag_core::AssetId;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("label printer error: {0}")]
    Other(String),
}

/// Turns an asset id into a physical, scannable label.
#[async_trait::async_trait]
pub trait LabelPrinter: Send + Sync {
    async fn print(&self, id: AssetId) -> Result<(), LabelError>;
}

/// Encodes the id with `qrencode` and spools the PNG to a CUPS queue via `lp`.
///
/// Both children are killed if the print future is dropped (e.g. on timeout).
#[derive(Debug, Clone)]
pub struct CommandLabelPrinter {
    printer: String,
    encoder: String,
    spooler: String,
}

impl CommandLabelPrinter {
    pub fn new(printer: impl Into<String>) -> Self {
        Self {
            printer: printer.into(),
            encoder: "qrencode".to_string(),
            spooler: "lp".to_string(),
        }
    }

    /// Override the encoder and spooler executables.
    pub fn with_programs(mut self, encoder: impl Into<String>, spooler: impl Into<String>) -> Self {
        self.encoder = encoder.into();
        self.spooler = spooler.into();
        self
    }

    pub fn printer(&self) -> &str {
        &self.printer
    }

    async fn encode(&self, id: AssetId) -> Result<Vec<u8>, LabelError> {
        let output = Command::new(&self.encoder)
            .args(["-t", "PNG", "-o", "-"])
            .arg(id.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| LabelError::Spawn {
                program: self.encoder.clone(),
                source,
            })?;
        check_status(&self.encoder, &output)?;
        Ok(output.stdout)
    }

    async fn spool(&self, png: &[u8]) -> Result<(), LabelError> {
        let spawn_err = |source| LabelError::Spawn {
            program: self.spooler.clone(),
            source,
        };
        let mut child = Command::new(&self.spooler)
            .arg("-d")
            .arg(&self.printer)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(png).await.map_err(spawn_err)?;
            // Close stdin so the spooler sees EOF.
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(spawn_err)?;
        check_status(&self.spooler, &output)
    }
}

fn check_status(program: &str, output: &std::process::Output) -> Result<(), LabelError> {
    if output.status.success() {
        return Ok(());
    }
    Err(LabelError::Failed {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

#[async_trait::async_trait]
impl LabelPrinter for CommandLabelPrinter {
    #[instrument(skip(self), fields(asset_id = %id, printer = %self.printer), err)]
    async fn print(&self, id: AssetId) -> Result<(), LabelError> {
        let png = self.encode(id).await?;
        debug!(bytes = png.len(), "label encoded");
        self.spool(&png).await
    }
}

/// Records print requests instead of printing.
#[derive(Debug, Default)]
pub struct InMemoryLabelPrinter {
    printed: Mutex<Vec<AssetId>>,
    fail_with: Option<String>,
}

impl InMemoryLabelPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A printer whose every job fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            printed: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub fn printed(&self) -> Vec<AssetId> {
        self.printed
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LabelPrinter for InMemoryLabelPrinter {
    async fn print(&self, id: AssetId) -> Result<(), LabelError> {
        if let Some(msg) = &self.fail_with {
            return Err(LabelError::Other(msg.clone()));
        }
        self.printed
            .lock()
            .map_err(|_| LabelError::Other("lock poisoned".to_string()))?
            .push(id);
        Ok(())
    }
}
