use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, EntityKind, Result};
use crate::models::{
    Content, ContentChanges, ContentDetail, ContentMedia, ContentRelations, MediaChanges,
    NewContent, NewMedia, MEDIA_TYPE_URL,
};

pub struct ContentService {
    db: Database,
}

impl ContentService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewContent) -> Result<ContentDetail> {
        self.ensure_products(&input.product_ids).await?;
        self.ensure_apps(&input.app_ids).await?;

        let content = Content {
            id: Uuid::new_v4(),
            content_name: input.content_name,
            created_at: Utc::now(),
        };
        let relations = ContentRelations {
            product_ids: dedup(input.product_ids),
            app_ids: dedup(input.app_ids),
        };
        self.db.insert_content(&content, &relations, &[]).await?;

        tracing::info!(content_id = %content.id, "Content created");
        self.get(content.id).await
    }

    /// Content with a single `url` media item, as phone-side callers create it.
    pub async fn create_with_media_url(
        &self,
        content_name: String,
        media_url: String,
    ) -> Result<ContentDetail> {
        let now = Utc::now();
        let content = Content {
            id: Uuid::new_v4(),
            content_name,
            created_at: now,
        };
        let media = ContentMedia {
            id: Uuid::new_v4(),
            content_id: content.id,
            media_type: MEDIA_TYPE_URL.to_string(),
            media_url,
            order: None,
            created_at: now,
        };
        self.db
            .insert_content(&content, &ContentRelations::default(), &[media])
            .await?;

        tracing::info!(content_id = %content.id, "Content created with media");
        self.get(content.id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ContentDetail> {
        let content = self
            .db
            .find_content(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        self.detail(content).await
    }

    pub async fn list(&self) -> Result<Vec<ContentDetail>> {
        let contents = self.db.list_contents().await?;

        let mut details = Vec::with_capacity(contents.len());
        for content in contents {
            details.push(self.detail(content).await?);
        }
        Ok(details)
    }

    pub async fn update(&self, id: Uuid, mut changes: ContentChanges) -> Result<ContentDetail> {
        if let Some(product_ids) = changes.product_ids.take() {
            self.ensure_products(&product_ids).await?;
            changes.product_ids = Some(dedup(product_ids));
        }
        if let Some(app_ids) = changes.app_ids.take() {
            self.ensure_apps(&app_ids).await?;
            changes.app_ids = Some(dedup(app_ids));
        }

        let content = self
            .db
            .update_content(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        self.detail(content).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.db.delete_content(id).await? {
            return Err(AppError::NotFound("Content not found".to_string()));
        }
        tracing::info!(content_id = %id, "Content deleted");
        Ok(())
    }

    // ========================================================================
    // Media
    // ========================================================================

    pub async fn add_media(&self, content_id: Uuid, input: NewMedia) -> Result<ContentMedia> {
        if self.db.find_content(content_id).await?.is_none() {
            return Err(AppError::ReferenceNotFound(EntityKind::Content));
        }

        let media = ContentMedia {
            id: Uuid::new_v4(),
            content_id,
            media_type: input.media_type,
            media_url: input.media_url,
            order: input.order,
            created_at: Utc::now(),
        };
        self.db.insert_media(&media).await?;
        Ok(media)
    }

    pub async fn update_media(&self, media_id: Uuid, changes: MediaChanges) -> Result<ContentMedia> {
        self.db
            .update_media(media_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Media not found".to_string()))
    }

    pub async fn delete_media(&self, media_id: Uuid) -> Result<()> {
        if !self.db.delete_media(media_id).await? {
            return Err(AppError::NotFound("Media not found".to_string()));
        }
        Ok(())
    }

    async fn detail(&self, content: Content) -> Result<ContentDetail> {
        let relations = self.db.content_relations(content.id).await?;
        let media = self.db.list_media(content.id).await?;

        Ok(ContentDetail {
            content,
            relations,
            media,
        })
    }

    async fn ensure_products(&self, ids: &[Uuid]) -> Result<()> {
        for id in ids {
            if self.db.find_product(*id).await?.is_none() {
                return Err(AppError::ReferenceNotFound(EntityKind::Product));
            }
        }
        Ok(())
    }

    async fn ensure_apps(&self, ids: &[Uuid]) -> Result<()> {
        for id in ids {
            if self.db.find_app(*id).await?.is_none() {
                return Err(AppError::ReferenceNotFound(EntityKind::App));
            }
        }
        Ok(())
    }
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids.dedup();
    ids
}
