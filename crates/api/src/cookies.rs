//! Session cookie plumbing.
//!
//! The access/refresh tokens travel as `httpOnly` cookies under fixed names
//! shared with any client-side logout action. Cookie windows match the token
//! expiry windows.

use axum::http::{HeaderMap, HeaderValue, header};

use panelkit_auth::{AuthConfig, TokenPair};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Cookie attributes derived from the auth configuration.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    access_max_age: i64,
    refresh_max_age: i64,
}

impl CookieConfig {
    pub fn new(auth: &AuthConfig, secure: bool) -> Self {
        Self {
            secure,
            access_max_age: auth.access_ttl.num_seconds(),
            refresh_max_age: auth.refresh_ttl.num_seconds(),
        }
    }
}

/// Extract a named cookie's value from a request's `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(header::COOKIE)?.to_str().ok()?;

    for cookie in header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(name).and_then(|s| s.strip_prefix('=')) {
            return Some(value.to_string());
        }
    }
    None
}

/// Append `Set-Cookie` headers for a freshly minted token pair.
pub fn append_session_cookies(headers: &mut HeaderMap, tokens: &TokenPair, config: &CookieConfig) {
    append(
        headers,
        &set_cookie(
            ACCESS_TOKEN_COOKIE,
            &tokens.access_token,
            config.access_max_age,
            config.secure,
        ),
    );
    append(
        headers,
        &set_cookie(
            REFRESH_TOKEN_COOKIE,
            &tokens.refresh_token,
            config.refresh_max_age,
            config.secure,
        ),
    );
}

/// Append `Set-Cookie` headers that expire both session cookies.
pub fn append_cleared_session_cookies(headers: &mut HeaderMap) {
    append(headers, &cleared_cookie(ACCESS_TOKEN_COOKIE));
    append(headers, &cleared_cookie(REFRESH_TOKEN_COOKIE));
}

fn set_cookie(name: &str, value: &str, max_age: i64, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; {}SameSite=Lax; Path=/; Max-Age={}",
        name,
        value,
        if secure { "Secure; " } else { "" },
        max_age
    )
}

fn cleared_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", name)
}

fn append(headers: &mut HeaderMap, cookie: &str) {
    // Token values are base64url, cookie attributes are static ASCII.
    if let Ok(value) = HeaderValue::from_str(cookie) {
        headers.append(header::SET_COOKIE, value);
    }
}
