//! Authentication configuration.
//!
//! Configuration values should be provided by the application, not hardcoded.

use chrono::Duration;
use std::fmt;

/// Bearer token configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC secret used to sign and verify tokens.
    pub secret: String,

    /// Access token time-to-live.
    ///
    /// Default: 5 minutes
    pub access_ttl: Duration,

    /// Refresh token time-to-live.
    ///
    /// Default: 1 day
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Create a token configuration with default lifetimes.
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self {
            secret,
            access_ttl: Duration::minutes(5),
            refresh_ttl: Duration::days(1),
        }
    }

    /// Set access token time-to-live.
    #[must_use]
    pub const fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set refresh token time-to-live.
    #[must_use]
    pub const fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}
