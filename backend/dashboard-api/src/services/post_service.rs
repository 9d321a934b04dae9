use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, EntityKind, Result};
use crate::models::{NewPost, Post, PostChanges, PostLog, DEFAULT_POST_TYPE};
use crate::services::history::{HistoryFilters, PostLogHistoryFilters};

pub use crate::models::PostActor;

pub struct PostService {
    db: Database,
}

impl PostService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolve all four references, then store the post with its first log entry.
    pub async fn create(&self, input: NewPost, actor: PostActor) -> Result<Post> {
        if self.db.find_phone_number(input.phone_number_id).await?.is_none() {
            return Err(AppError::ReferenceNotFound(EntityKind::PhoneNumber));
        }
        if self.db.find_content(input.content_id).await?.is_none() {
            return Err(AppError::ReferenceNotFound(EntityKind::Content));
        }
        if self.db.find_app(input.app_id).await?.is_none() {
            return Err(AppError::ReferenceNotFound(EntityKind::App));
        }
        if self.db.find_product(input.product_id).await?.is_none() {
            return Err(AppError::ReferenceNotFound(EntityKind::Product));
        }

        let post = Post {
            id: Uuid::new_v4(),
            phone_number_id: input.phone_number_id,
            content_id: input.content_id,
            app_id: input.app_id,
            product_id: input.product_id,
            post_type: input
                .post_type
                .unwrap_or_else(|| DEFAULT_POST_TYPE.to_string()),
            status: input.status.unwrap_or(false),
            fail_reason: input.fail_reason,
            request_ip: actor.request_ip.clone(),
            user_id: actor.user_id,
            created_at: Utc::now(),
        };
        let log = PostLog::record(&post, &actor);
        self.db.insert_post(&post, &log).await?;

        tracing::info!(post_id = %post.id, status = post.status, "Post created");
        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post> {
        self.db
            .find_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        self.db.list_posts().await
    }

    /// Posts published to an app; the app itself must exist.
    pub async fn list_by_app(&self, app_id: Uuid) -> Result<Vec<Post>> {
        if self.db.find_app(app_id).await?.is_none() {
            return Err(AppError::NotFound("App not found".to_string()));
        }
        self.db.list_posts_by_app(app_id).await
    }

    pub async fn list_by_phone(&self, phone_id: Uuid) -> Result<Vec<Post>> {
        if self.db.find_phone_number(phone_id).await?.is_none() {
            return Err(AppError::NotFound("Phone number not found".to_string()));
        }
        self.db.list_posts_by_phone(phone_id).await
    }

    /// Partial update; a change to status or failure reason is logged.
    pub async fn update(&self, id: Uuid, changes: PostChanges, actor: PostActor) -> Result<Post> {
        self.db
            .update_post(id, &changes, changes.touches_status().then_some(&actor))
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Overwrite status and failure reason. Either direction is allowed.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: bool,
        fail_reason: Option<String>,
        actor: PostActor,
    ) -> Result<Post> {
        let changes = PostChanges {
            post_type: None,
            status: Some(status),
            fail_reason: Some(fail_reason),
        };
        let post = self.update(id, changes, actor).await?;

        tracing::info!(post_id = %id, status, "Post status updated");
        Ok(post)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.db.delete_post(id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Filtered post history. Filters are validated before storage is touched.
    pub async fn history(&self, filters: HistoryFilters) -> Result<Vec<Post>> {
        let query = filters.into_query()?;
        self.db.find_posts(&query).await
    }

    pub async fn list_logs(&self) -> Result<Vec<PostLog>> {
        self.db.list_post_logs().await
    }

    pub async fn log_history(&self, filters: PostLogHistoryFilters) -> Result<Vec<PostLog>> {
        let query = filters.into_query()?;
        self.db.find_post_logs(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewApp, NewContent, NewPhoneNumber, NewProduct};
    use crate::services::history::DateBound;
    use crate::services::{AppService, ContentService, PhoneNumberService, ProductService};
    use chrono::Duration;

    struct Fixture {
        db: Database,
        phone_id: Uuid,
        content_id: Uuid,
        media_id: Uuid,
        app_id: Uuid,
        product_id: Uuid,
    }

    async fn fixture() -> Fixture {
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
        let product = ProductService::new(db.clone())
            .create(NewProduct {
                product_name: "Widget".to_string(),
                app_id: app.id,
            })
            .await
            .unwrap();
        let content = ContentService::new(db.clone())
            .create_with_media_url("Clip".to_string(), "https://cdn.example.com/c.mp4".to_string())
            .await
            .unwrap();

        Fixture {
            phone_id: phone.id,
            content_id: content.content.id,
            media_id: content.media[0].id,
            app_id: app.id,
            product_id: product.id,
            db,
        }
    }

    fn new_post(f: &Fixture) -> NewPost {
        NewPost {
            phone_number_id: f.phone_id,
            content_id: f.content_id,
            app_id: f.app_id,
            product_id: f.product_id,
            post_type: None,
            status: None,
            fail_reason: None,
        }
    }

    fn actor() -> PostActor {
        PostActor {
            request_ip: Some("10.0.0.7".to_string()),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_and_logs() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());

        let post = service.create(new_post(&f), actor()).await.unwrap();
        assert_eq!(post.post_type, "post");
        assert!(!post.status);
        assert_eq!(post.request_ip.as_deref(), Some("10.0.0.7"));

        let logs = service.list_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].post_id, post.id);
    }

    #[tokio::test]
    async fn test_create_checks_every_reference() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());

        let cases = [
            (
                NewPost {
                    phone_number_id: Uuid::new_v4(),
                    ..new_post(&f)
                },
                EntityKind::PhoneNumber,
            ),
            (
                NewPost {
                    content_id: Uuid::new_v4(),
                    ..new_post(&f)
                },
                EntityKind::Content,
            ),
            (
                NewPost {
                    app_id: Uuid::new_v4(),
                    ..new_post(&f)
                },
                EntityKind::App,
            ),
            (
                NewPost {
                    product_id: Uuid::new_v4(),
                    ..new_post(&f)
                },
                EntityKind::Product,
            ),
        ];

        for (input, kind) in cases {
            match service.create(input, actor()).await {
                Err(AppError::ReferenceNotFound(found)) => assert_eq!(found, kind),
                other => panic!("expected missing {kind}, got {other:?}"),
            }
        }

        assert!(service.list().await.unwrap().is_empty());
        assert!(service.list_logs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_is_idempotent() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        let post = service.create(new_post(&f), actor()).await.unwrap();

        let first = service.update_status(post.id, true, None, actor()).await.unwrap();
        let second = service.update_status(post.id, true, None, actor()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.get(post.id).await.unwrap(), second);
        assert_eq!(service.list_logs().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_status_can_flip_back() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        let post = service.create(new_post(&f), actor()).await.unwrap();

        let ok = service.update_status(post.id, true, None, actor()).await.unwrap();
        assert!(ok.status);

        let failed = service
            .update_status(post.id, false, Some("account banned".to_string()), actor())
            .await
            .unwrap();
        assert!(!failed.status);
        assert_eq!(failed.fail_reason.as_deref(), Some("account banned"));

        let logs = service
            .log_history(PostLogHistoryFilters {
                post_id: Some(post.id.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(logs.len(), 3);
        assert!(logs
            .iter()
            .any(|log| !log.status && log.fail_reason.as_deref() == Some("account banned")));
    }

    #[tokio::test]
    async fn test_status_log_snapshots_updated_row() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        let post = service.create(new_post(&f), actor()).await.unwrap();
        service
            .update_status(post.id, false, Some("captcha".to_string()), actor())
            .await
            .unwrap();

        let updated = service
            .update(
                post.id,
                PostChanges {
                    status: Some(true),
                    ..Default::default()
                },
                PostActor {
                    request_ip: Some("10.0.0.9".to_string()),
                    user_id: None,
                },
            )
            .await
            .unwrap();
        assert!(updated.status);
        assert_eq!(updated.fail_reason.as_deref(), Some("captcha"));

        let logs = service
            .log_history(PostLogHistoryFilters {
                request_ip: Some("10.0.0.9".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].post_id, post.id);
        assert_eq!(logs[0].status, updated.status);
        assert_eq!(logs[0].fail_reason, updated.fail_reason);
    }

    #[tokio::test]
    async fn test_update_without_status_is_not_logged() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        let post = service.create(new_post(&f), actor()).await.unwrap();

        let updated = service
            .update(
                post.id,
                PostChanges {
                    post_type: Some("story".to_string()),
                    ..Default::default()
                },
                actor(),
            )
            .await
            .unwrap();

        assert_eq!(updated.post_type, "story");
        assert_eq!(service.list_logs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_missing_post() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        let err = service
            .update_status(Uuid::new_v4(), true, None, actor())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_history_filters() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        service.create(new_post(&f), actor()).await.unwrap();
        service.create(new_post(&f), actor()).await.unwrap();

        let all = service.history(HistoryFilters::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);

        let by_media = service
            .history(HistoryFilters {
                media_uuid: Some(f.media_id.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_media.len(), 2);

        let other_media = service
            .history(HistoryFilters {
                media_uuid: Some(Uuid::new_v4().to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(other_media.is_empty());

        let future = service
            .history(HistoryFilters {
                from_date: Some(DateBound::from(Utc::now() + Duration::hours(1))),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(future.is_empty());

        let window = service
            .history(HistoryFilters {
                phone_uuid: Some(f.phone_id.to_string()),
                from_date: Some(DateBound::from(Utc::now() - Duration::hours(1))),
                end_date: Some(DateBound::from(Utc::now() + Duration::hours(1))),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
    }

    #[tokio::test]
    async fn test_history_rejects_inverted_range() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        service.create(new_post(&f), actor()).await.unwrap();

        let err = service
            .history(HistoryFilters {
                from_date: Some(DateBound::from(Utc::now())),
                end_date: Some(DateBound::from(Utc::now() - Duration::days(1))),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange));
    }

    #[tokio::test]
    async fn test_list_by_app() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        assert!(service.list_by_app(f.app_id).await.unwrap().is_empty());

        service.create(new_post(&f), actor()).await.unwrap();
        assert_eq!(service.list_by_app(f.app_id).await.unwrap().len(), 1);
        assert_eq!(service.list_by_phone(f.phone_id).await.unwrap().len(), 1);

        assert!(matches!(
            service.list_by_app(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_logs_survive_post_delete() {
        let f = fixture().await;
        let service = PostService::new(f.db.clone());
        let post = service.create(new_post(&f), actor()).await.unwrap();

        service.delete(post.id).await.unwrap();
        assert!(matches!(service.get(post.id).await, Err(AppError::NotFound(_))));
        assert_eq!(service.list_logs().await.unwrap().len(), 1);
    }
}
