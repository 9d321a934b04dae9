use chrono::Utc;
use crypto_core::hash_password;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::User;

pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, username: &str, email: Option<&str>, password: &str) -> Result<User> {
        if self.db.find_user_by_username(username).await?.is_some() {
            return Err(AppError::DuplicateKey(format!("User {username} already exists")));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.map(str::to_string),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        self.db.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, "Dashboard user created");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.db
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn reset_password(&self, username: &str, password: &str) -> Result<User> {
        let mut user = self
            .db
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.password_hash = hash_password(password)?;
        self.db.update_user_password(user.id, &user.password_hash).await?;

        tracing::info!(user_id = %user.id, "Dashboard user password reset");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_reset() {
        let service = UserService::new(Database::in_memory());
        let user = service
            .create("admin", Some("admin@postdesk.dev"), "first")
            .await
            .unwrap();

        assert!(matches!(
            service.create("admin", None, "again").await,
            Err(AppError::DuplicateKey(_))
        ));

        service.reset_password("admin", "second").await.unwrap();
        let stored = service.get(user.id).await.unwrap();
        assert!(crypto_core::verify_password("second", &stored.password_hash));
        assert!(!crypto_core::verify_password("first", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_reset_unknown_user() {
        let service = UserService::new(Database::in_memory());
        assert!(matches!(
            service.reset_password("ghost", "pw").await,
            Err(AppError::NotFound(_))
        ));
    }
}
