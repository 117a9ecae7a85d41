use axum::http::{header::InvalidHeaderValue, HeaderValue};

use crate::config::SessionConfig;

pub const AUTH_COOKIE_NAME: &str = "auth_token";

const COOKIE_PATH: &str = "/";
const EXPIRED: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// The auth cookie. Issuing and clearing share one attribute set, so a
/// cleared cookie always matches the one the browser holds.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    secure: bool,
    max_age_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("token contains characters not allowed in a cookie value")]
    InvalidToken,
    #[error(transparent)]
    Header(#[from] InvalidHeaderValue),
}

impl SessionCookie {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            secure: config.secure_cookie,
            max_age_secs: config.max_age_secs,
        }
    }

    fn attributes(&self) -> String {
        let mut attrs = format!("Path={}; HttpOnly; SameSite=Lax", COOKIE_PATH);
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    /// `Set-Cookie` value storing `token`
    pub fn issue(&self, token: &str) -> Result<HeaderValue, CookieError> {
        if token.is_empty() || !token.bytes().all(is_cookie_octet) {
            return Err(CookieError::InvalidToken);
        }
        let value = format!(
            "{}={}; {}; Max-Age={}",
            AUTH_COOKIE_NAME,
            token,
            self.attributes(),
            self.max_age_secs
        );
        Ok(HeaderValue::from_str(&value)?)
    }

    /// `Set-Cookie` value expiring the session
    pub fn clear(&self) -> Result<HeaderValue, CookieError> {
        let value = format!(
            "{}=; {}; Max-Age=0; Expires={}",
            AUTH_COOKIE_NAME,
            self.attributes(),
            EXPIRED
        );
        Ok(HeaderValue::from_str(&value)?)
    }
}

// RFC 6265 cookie-octet
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}
