//! FTP delivery adapter.
//!
//! Uses the synchronous `suppaftp` client on a blocking task so the
//! request handler's executor thread is never tied up by socket I/O. The
//! whole exchange runs under one deadline: a server that accepts the
//! connection and then goes silent (before the banner, during login, or
//! mid-transfer) must not hang the request indefinitely.

use std::io::Cursor;
use std::net::ToSocketAddrs;
use std::time::Duration;

use async_trait::async_trait;
use suppaftp::types::FileType;
use suppaftp::FtpStream;
use tracing::{debug, info};

use super::{Transport, UploadError};
use crate::config::FtpConfig;

/// Upper bound on the entire FTP session, connect included.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct FtpTransport {
    config: FtpConfig,
    timeout: Duration,
}

impl FtpTransport {
    pub fn new(config: FtpConfig) -> Self {
        Self {
            config,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn upload_blocking(
        config: &FtpConfig,
        timeout: Duration,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), UploadError> {
        if config.host.is_empty() || config.user.is_empty() {
            return Err(UploadError::Config(
                "FTP credentials missing (FTP_HOST / FTP_USER)".to_string(),
            ));
        }

        let addr = (config.host.as_str(), config.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                UploadError::Config(format!("FTP host does not resolve: {}", config.host))
            })?;

        let mut ftp = FtpStream::connect_timeout(addr, timeout)?;
        // The deadline on the surrounding task is the hard bound; socket
        // timeouts keep this worker thread from lingering past it on a
        // connection that stalls mid-session.
        let _ = ftp.get_ref().set_read_timeout(Some(timeout));
        let _ = ftp.get_ref().set_write_timeout(Some(timeout));

        ftp.login(&config.user, &config.password)?;

        // Walk the remote path creating each segment; MKD on an existing
        // directory is expected to fail and is ignored, CWD must succeed.
        for segment in config.remote_dir.split('/').filter(|s| !s.is_empty()) {
            if let Err(e) = ftp.mkdir(segment) {
                debug!("mkdir {segment} on FTP server: {e}");
            }
            ftp.cwd(segment)?;
        }

        ftp.transfer_type(FileType::Binary)?;
        ftp.put_file(filename, &mut Cursor::new(bytes))?;
        ftp.quit()?;

        info!("uploaded {} ({} bytes) via FTP", filename, bytes.len());
        Ok(())
    }
}

#[async_trait]
impl Transport for FtpTransport {
    fn name(&self) -> &'static str {
        "FTP"
    }

    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<(), UploadError> {
        let config = self.config.clone();
        let timeout = self.timeout;
        let filename = filename.to_string();
        let bytes = bytes.to_vec();

        let task = tokio::task::spawn_blocking(move || {
            Self::upload_blocking(&config, timeout, &filename, &bytes)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => {
                joined.map_err(|e| UploadError::Remote(format!("ftp task panicked: {e}")))?
            }
            Err(_) => Err(UploadError::Remote(format!(
                "FTP server did not respond within {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn blank_host_is_a_configuration_error() {
        let transport = FtpTransport::new(FtpConfig {
            enabled: true,
            user: "u".to_string(),
            port: 21,
            remote_dir: "/".to_string(),
            ..FtpConfig::default()
        });

        let err = transport.upload("f.CSV", b"x").await.unwrap_err();
        assert!(matches!(err, UploadError::Config(_)));
        assert!(err.to_string().contains("FTP_HOST"));
    }

    #[tokio::test]
    async fn blank_user_is_a_configuration_error() {
        let transport = FtpTransport::new(FtpConfig {
            enabled: true,
            host: "ftp.example.com".to_string(),
            port: 21,
            remote_dir: "/".to_string(),
            ..FtpConfig::default()
        });

        let err = transport.upload("f.CSV", b"x").await.unwrap_err();
        assert!(matches!(err, UploadError::Config(_)));
    }

    #[tokio::test]
    async fn silent_server_fails_within_the_deadline() {
        // Accepts the TCP connection but never sends the FTP banner
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let transport = FtpTransport::new(FtpConfig {
            enabled: true,
            host: addr.ip().to_string(),
            port: addr.port(),
            user: "u".to_string(),
            password: "p".to_string(),
            remote_dir: "/".to_string(),
        })
        .with_timeout(Duration::from_millis(500));

        let start = Instant::now();
        let err = transport.upload("f.CSV", b"x").await.unwrap_err();

        assert!(
            start.elapsed() < Duration::from_secs(5),
            "upload should fail promptly, took {:?}",
            start.elapsed()
        );
        assert!(matches!(err, UploadError::Remote(_) | UploadError::Ftp(_)));

        drop(listener);
    }
}
