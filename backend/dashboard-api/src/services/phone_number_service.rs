use chrono::Utc;
use crypto_core::hash_password;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{NewPhoneNumber, PhoneNumber, PhoneNumberChanges, PhoneNumberUpdate};

pub struct PhoneNumberService {
    db: Database,
}

impl PhoneNumberService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewPhoneNumber) -> Result<PhoneNumber> {
        self.ensure_unique(&input.phone_number, None).await?;

        let phone = PhoneNumber {
            id: Uuid::new_v4(),
            phone_number: input.phone_number,
            password_hash: hash_password(&input.password)?,
            active: true,
            created_at: Utc::now(),
        };
        self.db.insert_phone_number(&phone).await?;

        tracing::info!(phone_id = %phone.id, "Phone number registered");
        Ok(phone)
    }

    pub async fn get(&self, id: Uuid) -> Result<PhoneNumber> {
        self.db
            .find_phone_number(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Phone number not found".to_string()))
    }

    pub async fn get_by_number(&self, phone_number: &str) -> Result<PhoneNumber> {
        self.db
            .find_phone_number_by_value(phone_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Phone number not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<PhoneNumber>> {
        self.db.list_phone_numbers().await
    }

    pub async fn update(&self, id: Uuid, changes: PhoneNumberChanges) -> Result<PhoneNumber> {
        if let Some(number) = &changes.phone_number {
            self.ensure_unique(number, Some(id)).await?;
        }

        let update = PhoneNumberUpdate {
            phone_number: changes.phone_number,
            password_hash: changes.password.as_deref().map(hash_password).transpose()?,
            active: changes.active,
        };

        self.db
            .update_phone_number(id, &update)
            .await?
            .ok_or_else(|| AppError::NotFound("Phone number not found".to_string()))
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<PhoneNumber> {
        self.update(
            id,
            PhoneNumberChanges {
                active: Some(active),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.db.delete_phone_number(id).await? {
            return Err(AppError::NotFound("Phone number not found".to_string()));
        }
        tracing::info!(phone_id = %id, "Phone number deleted");
        Ok(())
    }

    pub async fn delete_by_number(&self, phone_number: &str) -> Result<()> {
        let phone = self.get_by_number(phone_number).await?;
        self.delete(phone.id).await
    }

    async fn ensure_unique(&self, phone_number: &str, except: Option<Uuid>) -> Result<()> {
        match self.db.find_phone_number_by_value(phone_number).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::DuplicateKey(
                format!("Phone number {phone_number} already exists"),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_phone(number: &str) -> NewPhoneNumber {
        NewPhoneNumber {
            phone_number: number.to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_twice_is_duplicate() {
        let service = PhoneNumberService::new(Database::in_memory());
        service.create(new_phone("+15551234567")).await.unwrap();

        let err = service.create(new_phone("+15551234567")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let service = PhoneNumberService::new(Database::in_memory());
        let phone = service.create(new_phone("+15551234567")).await.unwrap();

        assert_ne!(phone.password_hash, "secret");
        assert!(crypto_core::verify_password("secret", &phone.password_hash));

        let json = serde_json::to_value(&phone).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["phoneNumber"], "+15551234567");
    }

    #[tokio::test]
    async fn test_update_rehashes_and_checks_uniqueness() {
        let service = PhoneNumberService::new(Database::in_memory());
        let first = service.create(new_phone("+15550000001")).await.unwrap();
        service.create(new_phone("+15550000002")).await.unwrap();

        let err = service
            .update(
                first.id,
                PhoneNumberChanges {
                    phone_number: Some("+15550000002".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));

        let updated = service
            .update(
                first.id,
                PhoneNumberChanges {
                    password: Some("rotated".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(crypto_core::verify_password("rotated", &updated.password_hash));
    }

    #[tokio::test]
    async fn test_toggle_active() {
        let service = PhoneNumberService::new(Database::in_memory());
        let phone = service.create(new_phone("+15551234567")).await.unwrap();
        assert!(phone.active);

        let phone = service.set_active(phone.id, false).await.unwrap();
        assert!(!phone.active);
    }

    #[tokio::test]
    async fn test_missing_targets_not_found() {
        let service = PhoneNumberService::new(Database::in_memory());
        assert!(matches!(
            service.get(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_by_number("+10000000000").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_update_fields_rejected() {
        let result = serde_json::from_value::<PhoneNumberChanges>(serde_json::json!({
            "active": false,
            "isAdmin": true,
        }));
        assert!(result.is_err());
    }
}
