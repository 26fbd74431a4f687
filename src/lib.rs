//! Store-return export service.
//!
//! A small web application: an inventory-return form whose submissions are
//! validated, serialized to CSV, archived under a date-partitioned local
//! directory and optionally delivered to remote targets (FTP, Google
//! Drive, webhook).
//!
//! Layers:
//! - `config` - environment-sourced immutable configuration
//! - `domain` - validation, row building, CSV encoding, archiving,
//!   delivery orchestration
//! - `transport` - one adapter per remote target
//! - `io` - axum handlers, routing and flash messages

pub mod config;
pub mod domain;
pub mod io;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use tracing::info;

use crate::config::ExportConfig;
use crate::domain::{Archiver, ExportService};

/// Bound on every outbound HTTP request (webhook and Drive).
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across handlers. Everything in here is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ExportConfig>,
    pub export_service: Arc<ExportService>,
    pub http: reqwest::Client,
    signing_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.signing_key.clone()
    }
}

/// Build the application state from configuration: shared HTTP client,
/// archiver rooted at the export directory, and the enabled transports in
/// their fixed dispatch order.
pub fn initialize(config: ExportConfig) -> Result<AppState> {
    info!("export root: {}", config.export_root.display());

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let transports = transport::build_transports(&config, http.clone());
    info!(
        "enabled transports: {:?}",
        transports.iter().map(|t| t.name()).collect::<Vec<_>>()
    );

    let archiver = Archiver::new(config.export_root.clone());
    let export_service = ExportService::new(archiver, transports);
    let signing_key = io::flash::signing_key(&config.secret_key);

    Ok(AppState {
        config: Arc::new(config),
        export_service: Arc::new(export_service),
        http,
        signing_key,
    })
}
