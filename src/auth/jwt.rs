use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::{AuthClaims, TokenClaims},
    config::JwtConfig,
    state::AppState,
};

/// Token failures. `Expired` and `Invalid` render identically so callers
/// cannot tell them apart; use [`TokenError::is_expired`] internally.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token")]
    Expired,
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    #[allow(dead_code)]
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired)
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: config.ttl,
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn sign(&self, claims: &AuthClaims) -> Result<String, TokenError> {
        self.sign_at(claims, OffsetDateTime::now_utc())
    }

    fn sign_at(&self, claims: &AuthClaims, now: OffsetDateTime) -> Result<String, TokenError> {
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let payload = TokenClaims {
            auth: claims.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token =
            encode(&Header::default(), &payload, &self.encoding).map_err(TokenError::Signing)?;
        debug!(user_id = claims.id, "jwt signed");
        Ok(token)
    }

    #[allow(dead_code)]
    pub fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })?;
        debug!(user_id = data.claims.auth.id, "jwt verified");
        Ok(data.claims.auth)
    }
}
