//! One-shot status messages carried across a redirect.
//!
//! The message travels in the `flash` cookie and is consumed by the next view
//! that renders it. The cookie value is hex-encoded JSON so that non-ASCII
//! text survives header encoding.

use axum::http::{HeaderMap, Uri, header};
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::routes::PERMISSIONS_PATH;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, utoipa::ToSchema)]
pub struct Flash {
    pub level: FlashLevel,
    #[schema(example = "Permesso creato correttamente.")]
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

    fn encode(&self) -> Option<String> {
        serde_json::to_vec(self).ok().map(hex::encode)
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = hex::decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Attach a flash message to the outgoing response.
pub fn put(jar: CookieJar, flash: Flash) -> CookieJar {
    let Some(value) = flash.encode() else {
        tracing::warn!("Failed to encode flash message");
        return jar;
    };
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Read the pending flash message, if any, and clear it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = Flash::decode(cookie.value());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}

/// Where a "redirect back" should go.
///
/// The `Referer` is honoured when it is a local path or an absolute URL on the
/// same host as the request; anything else falls back to the permission list.
pub fn back_location(headers: &HeaderMap) -> String {
    let Some(referer) = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
    else {
        return PERMISSIONS_PATH.to_string();
    };

    let Ok(uri) = referer.parse::<Uri>() else {
        return PERMISSIONS_PATH.to_string();
    };

    let same_origin = match uri.authority() {
        None => referer.starts_with('/') && !referer.starts_with("//"),
        Some(authority) => headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|host| host.eq_ignore_ascii_case(authority.as_str())),
    };

    match uri.path_and_query() {
        Some(path) if same_origin => path.as_str().to_string(),
        _ => PERMISSIONS_PATH.to_string(),
    }
}

/// 303 redirect to the previous page.
pub fn back(headers: &HeaderMap) -> Redirect {
    Redirect::to(&back_location(headers))
}
