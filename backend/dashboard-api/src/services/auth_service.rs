use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use crypto_core::{
    hash_password, verify_password, IssuedToken, JwtKeys, PhoneClaims, SessionClaims,
};

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{PhoneSummary, User};

/// Signing keys for both token kinds, built once at startup.
pub struct AuthKeys {
    pub phone: JwtKeys,
    pub session: JwtKeys,
    pub session_ttl: Duration,
    /// Verified against when the account does not exist, so a miss costs
    /// the same Argon2 work as a wrong password.
    dummy_hash: String,
}

impl AuthKeys {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            phone: JwtKeys::from_secret(config.jwt.secret.as_bytes())?,
            session: JwtKeys::from_secret(config.session.secret.as_bytes())?,
            session_ttl: Duration::hours(config.session.expiry_hours),
            dummy_hash: hash_password("dashboard-api-unknown-account")?,
        })
    }

    /// One password verification whether or not the account exists.
    fn credentials_match(&self, password: &str, stored: Option<&str>) -> bool {
        match stored {
            Some(hash) => verify_password(password, hash),
            None => {
                verify_password(password, &self.dummy_hash);
                false
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhoneAuthentication {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub phone: PhoneSummary,
}

#[derive(Debug, Clone)]
pub struct SessionLogin {
    pub user: User,
    pub session: IssuedToken,
}

pub struct AuthService {
    db: Database,
    keys: Arc<AuthKeys>,
}

impl AuthService {
    pub fn new(db: Database, keys: Arc<AuthKeys>) -> Self {
        Self { db, keys }
    }

    /// Exchange phone credentials for a one-hour bearer token.
    ///
    /// An unknown phone and a wrong password fail identically.
    pub async fn authenticate_phone(
        &self,
        phone_number: &str,
        password: &str,
    ) -> Result<PhoneAuthentication> {
        let phone = self.db.find_phone_number_by_value(phone_number).await?;
        let verified = self
            .keys
            .credentials_match(password, phone.as_ref().map(|p| p.password_hash.as_str()));
        let phone = phone.filter(|_| verified);

        let Some(phone) = phone else {
            tracing::warn!("Phone authentication failed");
            return Err(AppError::AuthenticationFailed);
        };

        let issued = self
            .keys
            .phone
            .issue_phone_token(phone.id, &phone.phone_number, Utc::now())?;

        tracing::info!(phone_id = %phone.id, "Phone authenticated");

        Ok(PhoneAuthentication {
            token: issued.token,
            expires_at: issued.expires_at,
            phone: PhoneSummary::from(&phone),
        })
    }

    pub fn validate_phone_token(&self, token: &str) -> Result<PhoneClaims> {
        self.keys.phone.validate_phone_token(token).map_err(|e| {
            tracing::debug!("Phone token rejected: {e}");
            AppError::InvalidToken
        })
    }

    /// Dashboard login; the issued token goes into the session cookie.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionLogin> {
        let user = self.db.find_user_by_username(username).await?;
        let verified = self
            .keys
            .credentials_match(password, user.as_ref().map(|u| u.password_hash.as_str()));
        let user = user.filter(|_| verified);

        let Some(user) = user else {
            tracing::warn!("Dashboard login failed");
            return Err(AppError::AuthenticationFailed);
        };

        let session = self.keys.session.issue_session_token(
            user.id,
            &user.username,
            self.keys.session_ttl,
            Utc::now(),
        )?;

        tracing::info!(user_id = %user.id, "Dashboard user logged in");

        Ok(SessionLogin { user, session })
    }

    pub fn validate_session(&self, token: &str) -> Result<SessionClaims> {
        self.keys.session.validate_session_token(token).map_err(|e| {
            tracing::debug!("Session token rejected: {e}");
            AppError::InvalidToken
        })
    }
}
