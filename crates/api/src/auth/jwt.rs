//! JWT access/refresh token generation and validation.
//!
//! Both token kinds are HS256-signed JWTs carrying a [`Claims`] payload; the
//! `token_type` claim keeps one from being accepted in place of the other.
//! Refresh tokens are additionally tracked server-side: only their SHA-256
//! hash is stored so a database leak does not compromise active sessions.

use byeolpedia_core::types::DbId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::env_or;

/// Which of the two tokens a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub token_type: TokenType,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier. Makes every refresh token, and so its hash,
    /// distinct even when two are issued in the same second.
    pub jti: String,
}

/// Why a token was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Token is invalid")]
    Invalid,
    #[error("Token has the wrong type")]
    WrongType,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            refresh_token_expiry_days: env_or(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn lifetime_secs(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_token_expiry_secs(),
            TokenType::Refresh => self.refresh_token_expiry_days * 24 * 60 * 60,
        }
    }
}

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Sign a new token of `token_type` for the given user.
pub fn issue_token(
    user_id: DbId,
    token_type: TokenType,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let exp = now + chrono::Duration::seconds(config.lifetime_secs(token_type));

    let claims = Claims {
        sub: user_id,
        token_type,
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(IssuedToken {
        token,
        expires_at: exp,
    })
}

/// Validate a token's signature and expiry and check that it is of the
/// `expected` type.
pub fn validate_token(
    token: &str,
    expected: TokenType,
    config: &JwtConfig,
) -> Result<Claims, TokenError> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    if token_data.claims.token_type != expected {
        return Err(TokenError::WrongType);
    }
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a refresh token.
///
/// Use this to compare an incoming refresh token against the stored hash.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
