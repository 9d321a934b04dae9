use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, EntityKind, Result};
use crate::models::{NewPhoneAppRel, PhoneAppRel, PhoneAppRelChanges};

pub struct PhoneAppRelService {
    db: Database,
}

impl PhoneAppRelService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewPhoneAppRel) -> Result<PhoneAppRel> {
        self.ensure_phone(input.phone_id).await?;
        self.ensure_app(input.app_id).await?;

        let rel = PhoneAppRel {
            id: Uuid::new_v4(),
            phone_id: input.phone_id,
            app_id: input.app_id,
            created_at: Utc::now(),
        };
        self.db.insert_phone_app_rel(&rel).await?;
        Ok(rel)
    }

    pub async fn get(&self, id: Uuid) -> Result<PhoneAppRel> {
        self.db
            .find_phone_app_rel(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Phone app relation not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<PhoneAppRel>> {
        self.db.list_phone_app_rels().await
    }

    pub async fn update(&self, id: Uuid, changes: PhoneAppRelChanges) -> Result<PhoneAppRel> {
        if let Some(phone_id) = changes.phone_id {
            self.ensure_phone(phone_id).await?;
        }
        if let Some(app_id) = changes.app_id {
            self.ensure_app(app_id).await?;
        }

        self.db
            .update_phone_app_rel(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Phone app relation not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.db.delete_phone_app_rel(id).await? {
            return Err(AppError::NotFound("Phone app relation not found".to_string()));
        }
        Ok(())
    }

    async fn ensure_phone(&self, id: Uuid) -> Result<()> {
        match self.db.find_phone_number(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::ReferenceNotFound(EntityKind::PhoneNumber)),
        }
    }

    async fn ensure_app(&self, id: Uuid) -> Result<()> {
        match self.db.find_app(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::ReferenceNotFound(EntityKind::App)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewApp, NewPhoneNumber};
    use crate::services::{AppService, PhoneNumberService};

    #[tokio::test]
    async fn test_assign_phone_to_app() {
        let db = Database::in_memory();
        let phone = PhoneNumberService::new(db.clone())
            .create(NewPhoneNumber {
                phone_number: "+15551234567".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        let app = AppService::new(db.clone())
            .create(NewApp {
                app_name: "TikTok".to_string(),
                active: None,
            })
            .await
            .unwrap();

        let service = PhoneAppRelService::new(db.clone());
        let rel = service
            .create(NewPhoneAppRel {
                phone_id: phone.id,
                app_id: app.id,
            })
            .await
            .unwrap();
        assert_eq!(service.get(rel.id).await.unwrap().app_id, app.id);

        // Assigned phone cannot be removed until the assignment goes
        let phones = PhoneNumberService::new(db);
        assert!(matches!(phones.delete(phone.id).await, Err(AppError::Conflict(_))));
        service.delete(rel.id).await.unwrap();
        phones.delete(phone.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_phone_reference() {
        let service = PhoneAppRelService::new(Database::in_memory());
        let err = service
            .create(NewPhoneAppRel {
                phone_id: Uuid::new_v4(),
                app_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ReferenceNotFound(EntityKind::PhoneNumber)));
    }
}
