//! Environment-sourced configuration.
//!
//! Loaded once at startup into an immutable [`ExportConfig`] and passed
//! into the application state explicitly. Nothing reads the environment
//! after startup, which keeps the transports testable with injected
//! configuration.

use std::env;
use std::path::PathBuf;

/// Per-transport switch plus FTP connection settings.
#[derive(Debug, Clone, Default)]
pub struct FtpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub remote_dir: String,
}

/// Google Drive service-account settings.
#[derive(Debug, Clone, Default)]
pub struct DriveConfig {
    pub enabled: bool,
    /// Path to the service-account JSON key file.
    pub service_account_json: String,
    /// Optional destination folder id; empty means the drive root.
    pub folder_id: String,
}

/// Generic webhook settings.
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub url: String,
    pub token: String,
}

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Secret used to sign the flash cookie.
    pub secret_key: String,
    /// Whether `SECRET_KEY` was actually set in the environment, as
    /// opposed to falling back to the dev default.
    pub secret_key_set: bool,
    /// Shared key gating the debug endpoints; empty disables them.
    pub debug_key: String,
    /// Root directory for date-partitioned local archives.
    pub export_root: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    pub ftp: FtpConfig,
    pub drive: DriveConfig,
    pub webhook: WebhookConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            secret_key: "dev".to_string(),
            secret_key_set: false,
            debug_key: String::new(),
            export_root: PathBuf::from("exports"),
            bind_addr: "0.0.0.0:8000".to_string(),
            ftp: FtpConfig {
                port: 21,
                remote_dir: "/".to_string(),
                ..FtpConfig::default()
            },
            drive: DriveConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Read configuration from the process environment. Call once at
    /// startup, after `dotenvy::dotenv()`.
    pub fn from_env() -> Self {
        Self {
            secret_key: env_or("SECRET_KEY", "dev"),
            secret_key_set: !env_trimmed("SECRET_KEY").is_empty(),
            debug_key: env_trimmed("DEBUG_KEY"),
            export_root: PathBuf::from(env_or("EXPORT_ROOT", "exports")),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8000"),
            ftp: FtpConfig {
                enabled: env_bool("EXPORT_TO_FTP"),
                host: env_trimmed("FTP_HOST"),
                port: env_trimmed("FTP_PORT").parse().unwrap_or(21),
                user: env_trimmed("FTP_USER"),
                password: env_trimmed("FTP_PASS"),
                remote_dir: env_or("FTP_REMOTE_DIR", "/"),
            },
            drive: DriveConfig {
                enabled: env_bool("EXPORT_TO_GDRIVE"),
                service_account_json: env_trimmed("GDRIVE_SERVICE_ACCOUNT_JSON"),
                folder_id: env_trimmed("GDRIVE_FOLDER_ID"),
            },
            webhook: WebhookConfig {
                enabled: env_bool("EXPORT_TO_WEBHOOK"),
                url: env_trimmed("WEBHOOK_URL"),
                token: env_trimmed("WEBHOOK_TOKEN"),
            },
        }
    }

    /// Variable names reported by the debug config endpoint, paired with
    /// whether each is set to a non-blank value.
    pub fn presence_report(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("SECRET_KEY", self.secret_key_set),
            ("DEBUG_KEY", !self.debug_key.is_empty()),
            ("EXPORT_TO_FTP", self.ftp.enabled),
            ("FTP_HOST", !self.ftp.host.is_empty()),
            ("FTP_USER", !self.ftp.user.is_empty()),
            ("FTP_PASS", !self.ftp.password.is_empty()),
            ("EXPORT_TO_GDRIVE", self.drive.enabled),
            (
                "GDRIVE_SERVICE_ACCOUNT_JSON",
                !self.drive.service_account_json.is_empty(),
            ),
            ("GDRIVE_FOLDER_ID", !self.drive.folder_id.is_empty()),
            ("EXPORT_TO_WEBHOOK", self.webhook.enabled),
            ("WEBHOOK_URL", !self.webhook.url.is_empty()),
            ("WEBHOOK_TOKEN", !self.webhook.token.is_empty()),
        ]
    }
}

/// "1" / "true" / "yes" / "on" (trimmed, case-insensitive) count as true.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn env_bool(name: &str) -> bool {
    env::var(name).map(|v| parse_bool(&v)).unwrap_or(false)
}

fn env_trimmed(name: &str) -> String {
    env::var(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn env_or(name: &str, default: &str) -> String {
    let value = env_trimmed(name);
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
