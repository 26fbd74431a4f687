//! Export orchestration: encode, archive locally, then fan out to every
//! enabled remote target.
//!
//! The local archive is the source of truth; a remote failure never undoes
//! it. Transports run strictly one after another, each against a fresh
//! slice of the encoded buffer, and each failure is caught and recorded so
//! the remaining targets still get their attempt. No retries, no rollback:
//! partial delivery is a normal outcome and is reported as such.

use std::path::PathBuf;

use tracing::{error, info};

use super::archive::{ArchiveError, Archiver};
use super::csv_encoder;
use super::models::ExportBatch;
use crate::transport::Transport;

/// One failed delivery attempt, kept for the user-facing summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub target: String,
    pub message: String,
}

/// What happened to one batch: where it was archived and which remote
/// targets accepted it.
#[derive(Debug)]
pub struct ExportOutcome {
    pub filename: String,
    pub local_path: PathBuf,
    pub delivered: Vec<String>,
    pub failures: Vec<DeliveryFailure>,
}

/// Runs the encode → archive → dispatch pipeline for accepted batches.
pub struct ExportService {
    archiver: Archiver,
    transports: Vec<Box<dyn Transport>>,
}

impl ExportService {
    pub fn new(archiver: Archiver, transports: Vec<Box<dyn Transport>>) -> Self {
        Self {
            archiver,
            transports,
        }
    }

    /// Encode and archive the batch, then attempt every configured
    /// transport in order. Only an encoding or local write failure is an
    /// error; transport failures come back inside the outcome.
    pub async fn export(&self, batch: &ExportBatch) -> Result<ExportOutcome, ExportError> {
        let filename = batch.filename();
        let bytes = csv_encoder::encode(batch).map_err(ExportError::Encode)?;

        let local_path = self
            .archiver
            .archive(&filename, &bytes, batch.timestamp.date())?;

        let mut delivered = Vec::new();
        let mut failures = Vec::new();

        for transport in &self.transports {
            match transport.upload(&filename, &bytes).await {
                Ok(()) => {
                    info!("delivered {} to {}", filename, transport.name());
                    delivered.push(transport.name().to_string());
                }
                Err(e) => {
                    error!("{} upload failed for {}: {}", transport.name(), filename, e);
                    failures.push(DeliveryFailure {
                        target: transport.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(ExportOutcome {
            filename,
            local_path,
            delivered,
            failures,
        })
    }
}

/// Fatal pipeline failures. Transport errors are deliberately absent: they
/// are collected per-target inside [`ExportOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode CSV: {0}")]
    Encode(anyhow::Error),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
