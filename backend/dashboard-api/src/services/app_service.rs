use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{App, AppChanges, NewApp, Product};

pub struct AppService {
    db: Database,
}

impl AppService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewApp) -> Result<App> {
        self.ensure_unique(&input.app_name, None).await?;

        let app = App {
            id: Uuid::new_v4(),
            app_name: input.app_name,
            active: input.active.unwrap_or(true),
            created_at: Utc::now(),
        };
        self.db.insert_app(&app).await?;

        tracing::info!(app_id = %app.id, app_name = %app.app_name, "App created");
        Ok(app)
    }

    pub async fn get(&self, id: Uuid) -> Result<App> {
        self.db
            .find_app(id)
            .await?
            .ok_or_else(|| AppError::NotFound("App not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<App>> {
        self.db.list_apps().await
    }

    pub async fn update(&self, id: Uuid, changes: AppChanges) -> Result<App> {
        if let Some(name) = &changes.app_name {
            self.ensure_unique(name, Some(id)).await?;
        }

        self.db
            .update_app(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("App not found".to_string()))
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<App> {
        self.update(
            id,
            AppChanges {
                app_name: None,
                active: Some(active),
            },
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.db.delete_app(id).await? {
            return Err(AppError::NotFound("App not found".to_string()));
        }
        tracing::info!(app_id = %id, "App deleted");
        Ok(())
    }

    pub async fn products(&self, id: Uuid) -> Result<Vec<Product>> {
        self.get(id).await?;
        self.db.list_products_by_app(id).await
    }

    async fn ensure_unique(&self, app_name: &str, except: Option<Uuid>) -> Result<()> {
        match self.db.find_app_by_name(app_name).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::DuplicateKey(
                format!("App {app_name} already exists"),
            )),
            _ => Ok(()),
        }
    }
}
