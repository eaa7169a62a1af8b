//! JWT service for token generation and validation
//!
//! Tokens are compact JWTs signed with a shared secret using an HMAC
//! algorithm. They carry the subject (the user's email), the issue time and
//! the expiry time. Nothing is stored server-side: a token is valid exactly
//! when its signature verifies and its expiry lies strictly in the future.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// HMAC signing algorithm
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds (default: 30 minutes)
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Shared signing secret (required)
    /// - `JWT_ALGORITHM`: One of `HS256`, `HS384`, `HS512` (default: `HS256`)
    /// - `JWT_ACCESS_TOKEN_EXPIRE_MINUTES`: Token lifetime in minutes (default: 30)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let algorithm = match std::env::var("JWT_ALGORITHM") {
            Ok(name) => parse_algorithm(&name)?,
            Err(_) => Algorithm::HS256,
        };

        let minutes: u64 = std::env::var("JWT_ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid JWT_ACCESS_TOKEN_EXPIRE_MINUTES: {}", e))?;

        if minutes == 0 {
            bail!("JWT_ACCESS_TOKEN_EXPIRE_MINUTES must be at least 1");
        }

        let access_token_expiry = minutes
            .checked_mul(60)
            .filter(|seconds| i64::try_from(*seconds).is_ok())
            .ok_or_else(|| {
                anyhow::anyhow!("JWT_ACCESS_TOKEN_EXPIRE_MINUTES is too large: {}", minutes)
            })?;

        Ok(JwtConfig {
            secret,
            algorithm,
            access_token_expiry,
        })
    }
}

/// Accepts only the shared-secret algorithms
fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!("Unsupported JWT_ALGORITHM '{}'; expected HS256, HS384 or HS512", other),
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Reasons a presented token is rejected
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature, encoding, algorithm or claim shape is wrong
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// The token carries an empty subject
    #[error("token has no subject")]
    MissingSubject,

    /// `exp` is not strictly after the verification time
    #[error("token expired at {expired_at}")]
    Expired { expired_at: i64 },
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            bail!("JWT secret must not be empty");
        }

        if i64::try_from(config.access_token_expiry).is_err() {
            bail!("JWT access token expiry is too large");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is checked by hand so the comparison is strict and leeway-free.
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Issue an access token for `subject`, valid from now
    pub fn issue_token(&self, subject: &str) -> Result<String> {
        self.issue_token_at(subject, Utc::now().timestamp())
    }

    /// Issue an access token for `subject` as if the current time were `now`
    pub fn issue_token_at(&self, subject: &str, now: i64) -> Result<String> {
        if subject.is_empty() {
            bail!("Cannot issue a token for an empty subject");
        }

        let exp = i64::try_from(self.config.access_token_expiry)
            .ok()
            .and_then(|expiry| now.checked_add(expiry))
            .ok_or_else(|| anyhow::anyhow!("Token expiry overflows the timestamp range"))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp,
        };

        let token = encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.encoding_key,
        )?;

        if let Some(expires_at) = DateTime::<Utc>::from_timestamp(claims.exp, 0) {
            debug!(exp = claims.exp, %expires_at, "Issued access token");
        }

        Ok(token)
    }

    /// Validate a token against the current time and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_token_at(token, Utc::now().timestamp())
    }

    /// Validate a token as if the current time were `now`
    pub fn validate_token_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        if claims.exp <= now {
            return Err(TokenError::Expired {
                expired_at: claims.exp,
            });
        }

        Ok(claims)
    }

    /// Get the access token expiry time in seconds
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }
}
