//! Google Drive delivery adapter.
//!
//! Authenticates with a service-account key: signs an RS256 JWT for the
//! `drive.file` scope, exchanges it for an access token at the key's own
//! token endpoint, then creates the file in two steps (metadata first,
//! content second) so no multipart/related body has to be assembled by
//! hand.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Transport, UploadError};
use crate::config::DriveConfig;

const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const TOKEN_TTL_SECS: i64 = 300;

/// The fields we need from a service-account key file.
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct TokenClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

pub struct DriveTransport {
    config: DriveConfig,
    http: reqwest::Client,
}

impl DriveTransport {
    pub fn new(config: DriveConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    fn load_key(&self) -> Result<ServiceAccountKey, UploadError> {
        let path = &self.config.service_account_json;
        if path.is_empty() || !Path::new(path).exists() {
            return Err(UploadError::Config(
                "service account JSON missing (GDRIVE_SERVICE_ACCOUNT_JSON)".to_string(),
            ));
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| UploadError::Auth(format!("invalid service account key: {e}")))
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String, UploadError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: &key.client_email,
            scope: DRIVE_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| UploadError::Auth(format!("unusable private key: {e}")))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| UploadError::Auth(format!("failed to sign token request: {e}")))?;

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Auth(format!(
                "token exchange returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl Transport for DriveTransport {
    fn name(&self) -> &'static str {
        "Google Drive"
    }

    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<(), UploadError> {
        let key = self.load_key()?;
        let token = self.access_token(&key).await?;

        // Create the file entry, parented if a folder is configured.
        let mut metadata = serde_json::json!({ "name": filename });
        if !self.config.folder_id.is_empty() {
            metadata["parents"] = serde_json::json!([self.config.folder_id]);
        }

        let created = self
            .http
            .post(DRIVE_FILES_URL)
            .bearer_auth(&token)
            .json(&metadata)
            .send()
            .await?;
        if !created.status().is_success() {
            let status = created.status();
            let body = created.text().await.unwrap_or_default();
            return Err(UploadError::Remote(format!(
                "drive file create returned {status}: {body}"
            )));
        }
        let created: CreatedFile = created.json().await?;

        // Upload the content into the new file.
        let uploaded = self
            .http
            .patch(format!("{}/{}?uploadType=media", DRIVE_UPLOAD_URL, created.id))
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .body(bytes.to_vec())
            .send()
            .await?;
        if !uploaded.status().is_success() {
            let status = uploaded.status();
            let body = uploaded.text().await.unwrap_or_default();
            return Err(UploadError::Remote(format!(
                "drive content upload returned {status}: {body}"
            )));
        }

        info!("uploaded {} ({} bytes) to Google Drive", filename, bytes.len());
        Ok(())
    }
}
