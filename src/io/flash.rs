//! One-shot flash messages carried across the post/redirect/get cycle in a
//! signed cookie. The cookie is written on redirect, read and cleared on
//! the next page render.

use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "sr_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Derive the cookie signing key from the configured secret. The secret is
/// stretched to the minimum key material length, with the same dev
/// fallback the configuration uses.
pub fn signing_key(secret: &str) -> Key {
    let secret = if secret.is_empty() { "dev" } else { secret };
    let mut material = Vec::with_capacity(64);
    while material.len() < 64 {
        material.extend_from_slice(secret.as_bytes());
    }
    Key::derive_from(&material)
}

/// Queue flash messages for the next request.
pub fn set(jar: SignedCookieJar, flashes: &[Flash]) -> SignedCookieJar {
    let Ok(json) = serde_json::to_vec(flashes) else {
        return jar;
    };
    let cookie = Cookie::build((FLASH_COOKIE, STANDARD.encode(json)))
        .path("/")
        .http_only(true)
        .build();
    jar.add(cookie)
}

/// Read and clear any pending flash messages. A missing, unsigned or
/// garbled cookie simply yields no messages.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<Flash>) {
    let flashes = jar
        .get(FLASH_COOKIE)
        .and_then(|c| STANDARD.decode(c.value()).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default();

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    (jar, flashes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_take_round_trips_messages() {
        let key = signing_key("test secret");
        let jar = SignedCookieJar::new(key);

        let flashes = vec![
            Flash::success("File saved."),
            Flash::error("FTP upload failed: no route to host"),
        ];
        let jar = set(jar, &flashes);

        let (_, taken) = take(jar);
        assert_eq!(taken, flashes);
    }

    #[test]
    fn take_clears_the_cookie() {
        let key = signing_key("test secret");
        let jar = set(SignedCookieJar::new(key), &[Flash::success("once")]);

        let (jar, first) = take(jar);
        assert_eq!(first.len(), 1);

        let (_, second) = take(jar);
        assert!(second.is_empty());
    }

    #[test]
    fn missing_cookie_yields_no_messages() {
        let jar = SignedCookieJar::new(signing_key("test secret"));
        let (_, flashes) = take(jar);
        assert!(flashes.is_empty());
    }

    #[test]
    fn short_secret_still_derives_a_key() {
        // Must not panic on the minimal dev secret
        let _ = signing_key("dev");
        let _ = signing_key("");
    }
}
