//! One-shot form feedback carried across a redirect in a signed cookie.

use actix_web::cookie::{Cookie, CookieJar, Key};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

const FLASH_COOKIE: &str = "shopfront_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    // Cookie values are percent-decoded on the way in, so the signed value
    // must not contain '%'.
    fn encode(&self) -> String {
        format!("{}:{}", self.level.as_str(), URL_SAFE_NO_PAD.encode(&self.message))
    }

    fn decode(raw: &str) -> Option<Self> {
        let (level, message) = raw.split_once(':')?;
        let message = URL_SAFE_NO_PAD.decode(message).ok()?;
        Some(Self {
            level: Level::parse(level)?,
            message: String::from_utf8(message).ok()?,
        })
    }
}

/// Cookie signing key derived from the configured secret.
pub fn signing_key(secret: &str) -> Key {
    Key::derive_from(&Sha256::digest(secret.as_bytes()))
}

/// 302 to `location` carrying `flash` for the next page render.
pub fn redirect_with(key: &Key, location: &str, flash: Flash) -> HttpResponse {
    let mut jar = CookieJar::new();
    jar.signed_mut(key).add(
        Cookie::build(FLASH_COOKIE, flash.encode())
            .path("/")
            .http_only(true)
            .finish(),
    );

    let mut response = HttpResponse::Found();
    response.insert_header((header::LOCATION, location));
    if let Some(cookie) = jar.get(FLASH_COOKIE) {
        response.cookie(cookie.clone());
    }
    response.finish()
}

/// Reads the pending message. Tampered or malformed cookies are ignored.
pub fn take(req: &HttpRequest, key: &Key) -> Option<Flash> {
    let raw = req.cookie(FLASH_COOKIE)?;
    let mut jar = CookieJar::new();
    jar.add_original(raw);
    let verified = jar.signed(key).get(FLASH_COOKIE)?;
    Flash::decode(verified.value())
}

/// Expires the flash cookie on the response being built.
pub fn clear(response: &mut HttpResponseBuilder) {
    let mut removal = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    removal.make_removal();
    response.cookie(removal);
}
