//! Remote delivery adapters for generated export files.
//!
//! Each adapter is a narrow seam over one external service. Failures are
//! per-adapter and never fatal to the request; the dispatcher catches and
//! reports them individually.

pub mod ftp;
pub mod webhook;

#[cfg(feature = "drive")]
pub mod drive;

use async_trait::async_trait;

use crate::config::ExportConfig;

/// Why a single upload attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Required configuration is blank or points at nothing.
    #[error("missing configuration: {0}")]
    Config(String),
    /// The transport was enabled but its support is not compiled in.
    #[error("{0} support is not available in this build")]
    Unavailable(&'static str),
    /// The remote rejected our credentials.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The remote was reached but refused the upload.
    #[error("upload rejected: {0}")]
    Remote(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ftp error: {0}")]
    Ftp(#[from] suppaftp::FtpError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A pluggable remote destination for one export file.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Display name used in flash messages ("FTP", "Google Drive", ...).
    fn name(&self) -> &'static str;

    /// Deliver `bytes` under `filename`. Must not retry internally.
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<(), UploadError>;
}

/// Build the enabled transports in their fixed dispatch order: FTP, then
/// Google Drive, then the webhook. Misconfiguration of an enabled transport
/// is reported at upload time, not here, so one bad target never blocks the
/// others.
pub fn build_transports(
    config: &ExportConfig,
    http: reqwest::Client,
) -> Vec<Box<dyn Transport>> {
    let mut transports: Vec<Box<dyn Transport>> = Vec::new();

    if config.ftp.enabled {
        transports.push(Box::new(ftp::FtpTransport::new(config.ftp.clone())));
    }

    if config.drive.enabled {
        #[cfg(feature = "drive")]
        transports.push(Box::new(drive::DriveTransport::new(
            config.drive.clone(),
            http.clone(),
        )));

        #[cfg(not(feature = "drive"))]
        transports.push(Box::new(UnavailableTransport {
            name: "Google Drive",
        }));
    }

    if config.webhook.enabled {
        transports.push(Box::new(webhook::WebhookTransport::new(
            config.webhook.clone(),
            http,
        )));
    }

    transports
}

/// Stands in for a transport whose support was not compiled into this
/// binary. Always fails with the same configuration-style error.
#[cfg_attr(feature = "drive", allow(dead_code))]
struct UnavailableTransport {
    name: &'static str,
}

#[async_trait]
impl Transport for UnavailableTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn upload(&self, _filename: &str, _bytes: &[u8]) -> Result<(), UploadError> {
        Err(UploadError::Unavailable(self.name))
    }
}
