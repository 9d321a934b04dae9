//! JWT issuance and validation for Post Desk services
//!
//! Two token kinds share this module:
//!
//! - **Phone tokens**: bearer tokens for the external API, issued when a phone
//!   number authenticates. Fixed one hour lifetime.
//! - **Session tokens**: carried in the dashboard session cookie after a user
//!   logs in. Lifetime chosen by the caller.
//!
//! ## Design
//!
//! - **HS256** with a shared secret per token kind
//! - **No globals**: keys live in a [`JwtKeys`] value built at startup and
//!   handed to whoever signs or verifies
//! - **Zero leeway**: a token is rejected as soon as `exp` has passed
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use crypto_core::jwt::JwtKeys;
//! use uuid::Uuid;
//!
//! let keys = JwtKeys::from_secret(b"a-long-random-secret").unwrap();
//! let issued = keys
//!     .issue_phone_token(Uuid::new_v4(), "+15551234567", Utc::now())
//!     .unwrap();
//! let claims = keys.validate_phone_token(&issued.token).unwrap();
//! assert_eq!(claims.phone_number, "+15551234567");
//! ```
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

pub const PHONE_TOKEN_EXPIRY_SECONDS: i64 = 3600;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Claims of a phone bearer token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhoneClaims {
    /// Phone number record id (UUID string)
    pub sub: String,
    /// The phone number string the token was issued for
    pub phone_number: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl PhoneClaims {
    pub fn phone_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow!("Invalid phone id in token: {e}"))
    }
}

/// Claims of a dashboard session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    /// User id (UUID string)
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow!("Invalid user id in token: {e}"))
    }
}

/// A signed token together with the instant it stops being valid
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Keys
// ============================================================================

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(anyhow!("JWT secret must not be empty"));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to sign token: {e}"))
    }

    /// Verify signature and expiry, then decode the claims.
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<C>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| anyhow!("Token validation failed: {e}"))
    }

    // ========================================================================
    // Phone tokens
    // ========================================================================

    pub fn issue_phone_token(
        &self,
        phone_id: Uuid,
        phone_number: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken> {
        let expires_at = issued_at + Duration::seconds(PHONE_TOKEN_EXPIRY_SECONDS);

        let claims = PhoneClaims {
            sub: phone_id.to_string(),
            phone_number: phone_number.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_at: truncate_to_second(expires_at),
        })
    }

    pub fn validate_phone_token(&self, token: &str) -> Result<PhoneClaims> {
        self.verify(token)
    }

    // ========================================================================
    // Session tokens
    // ========================================================================

    pub fn issue_session_token(
        &self,
        user_id: Uuid,
        username: &str,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken> {
        let expires_at = issued_at + ttl;

        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_at: truncate_to_second(expires_at),
        })
    }

    pub fn validate_session_token(&self, token: &str) -> Result<SessionClaims> {
        self.verify(token)
    }
}

fn truncate_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(at.timestamp(), 0).single().unwrap_or(at)
}

// ============================================================================
// Tests
// ============================================================================
