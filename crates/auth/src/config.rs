use chrono::Duration;

/// Signing configuration for the access/refresh token pair.
///
/// Access and refresh tokens are signed with distinct secrets so a leaked
/// short-lived secret cannot mint long-lived credentials.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Default token windows: 1 day access, 7 days refresh.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::days(1),
            refresh_ttl: Duration::days(7),
        }
    }

    /// Read secrets from `ACCESS_TOKEN_SECRET` / `REFRESH_TOKEN_SECRET`,
    /// falling back to insecure dev defaults.
    pub fn from_env() -> Self {
        let access_secret = std::env::var("ACCESS_TOKEN_SECRET").unwrap_or_else(|_| {
            tracing::warn!("ACCESS_TOKEN_SECRET not set; using insecure dev default");
            "dev-access-secret".to_string()
        });
        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET").unwrap_or_else(|_| {
            tracing::warn!("REFRESH_TOKEN_SECRET not set; using insecure dev default");
            "dev-refresh-secret".to_string()
        });
        Self::new(access_secret, refresh_secret)
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}
