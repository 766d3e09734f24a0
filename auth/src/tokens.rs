//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs. Expiry is checked against the injected clock
//! rather than the library's own view of system time, so expiry behaves the
//! same in tests as in production.

use crate::config::TokenConfig;
use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};
use event_manager_core::id::UserId;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Authorizes API calls.
    Access,
    /// Can only be exchanged for a new access token.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User the token was issued to.
    pub sub: UserId,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
    /// Unique token id.
    pub jti: Uuid,
    /// Access or refresh.
    pub token_type: TokenKind,
}

/// Encodes and decodes bearer tokens with a shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Sign a token of the given kind for `user`, issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InternalError` if signing fails or the expiry
    /// cannot be represented.
    pub fn encode(&self, user: UserId, kind: TokenKind, now: DateTime<Utc>) -> Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            tracing::error!(?kind, "Token lifetime overflows the expiry timestamp");
            AuthError::InternalError
        })?;
        let claims = Claims {
            sub: user,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            token_type: kind,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(
            |e| {
                tracing::error!(error = %e, "Token signing failed");
                AuthError::InternalError
            },
        )
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// # Errors
    ///
    /// - `InvalidToken`: malformed or signed with another key
    /// - `TokenExpired`: `exp` is at or before `now`
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        if data.claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(data.claims)
    }

    /// Decode and additionally require a specific kind.
    ///
    /// # Errors
    ///
    /// As [`TokenCodec::decode`], plus `InvalidToken` for the wrong kind.
    pub fn decode_kind(&self, token: &str, kind: TokenKind, now: DateTime<Utc>) -> Result<Claims> {
        let claims = self.decode(token, now)?;
        if claims.token_type != kind {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
