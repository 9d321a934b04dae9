//! Storage contracts, one trait per entity family.
//!
//! Implementations translate storage constraint violations: a unique
//! violation becomes [`AppError::DuplicateKey`](crate::error::AppError) and a
//! delete blocked by a referencing row becomes `AppError::Conflict`.
//! Updates and deletes return `None`/`false` when the target does not exist.
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    App, AppChanges, Content, ContentChanges, ContentMedia, ContentRelations, MediaChanges,
    PhoneAppRel, PhoneAppRelChanges, PhoneNumber, PhoneNumberUpdate, Post, PostActor, PostChanges,
    PostHistoryQuery, PostLog, PostLogQuery, Product, ProductChanges, User,
};

#[async_trait]
pub trait PhoneNumberRepository: Send + Sync {
    async fn insert_phone_number(&self, phone: &PhoneNumber) -> Result<()>;

    async fn find_phone_number(&self, id: Uuid) -> Result<Option<PhoneNumber>>;

    /// Exact match on the phone string
    async fn find_phone_number_by_value(&self, phone_number: &str) -> Result<Option<PhoneNumber>>;

    async fn list_phone_numbers(&self) -> Result<Vec<PhoneNumber>>;

    async fn update_phone_number(
        &self,
        id: Uuid,
        update: &PhoneNumberUpdate,
    ) -> Result<Option<PhoneNumber>>;

    async fn delete_phone_number(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait AppRepository: Send + Sync {
    async fn insert_app(&self, app: &App) -> Result<()>;

    async fn find_app(&self, id: Uuid) -> Result<Option<App>>;

    async fn find_app_by_name(&self, app_name: &str) -> Result<Option<App>>;

    async fn list_apps(&self) -> Result<Vec<App>>;

    async fn update_app(&self, id: Uuid, changes: &AppChanges) -> Result<Option<App>>;

    async fn delete_app(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert_product(&self, product: &Product) -> Result<()>;

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>>;

    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn list_products_by_app(&self, app_id: Uuid) -> Result<Vec<Product>>;

    async fn update_product(&self, id: Uuid, changes: &ProductChanges) -> Result<Option<Product>>;

    async fn delete_product(&self, id: Uuid) -> Result<bool>;
}

/// Contents together with the media and relation rows they own.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert the content, its relations and initial media atomically.
    async fn insert_content(
        &self,
        content: &Content,
        relations: &ContentRelations,
        media: &[ContentMedia],
    ) -> Result<()>;

    async fn find_content(&self, id: Uuid) -> Result<Option<Content>>;

    async fn list_contents(&self) -> Result<Vec<Content>>;

    async fn content_relations(&self, content_id: Uuid) -> Result<ContentRelations>;

    /// Rename and/or replace relation sets atomically.
    async fn update_content(&self, id: Uuid, changes: &ContentChanges) -> Result<Option<Content>>;

    /// Removes the content's media and relation rows with it.
    async fn delete_content(&self, id: Uuid) -> Result<bool>;

    async fn insert_media(&self, media: &ContentMedia) -> Result<()>;

    async fn find_media(&self, id: Uuid) -> Result<Option<ContentMedia>>;

    /// Ordered by `order` (unset last), then creation time.
    async fn list_media(&self, content_id: Uuid) -> Result<Vec<ContentMedia>>;

    async fn update_media(&self, id: Uuid, changes: &MediaChanges) -> Result<Option<ContentMedia>>;

    async fn delete_media(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait PhoneAppRelRepository: Send + Sync {
    async fn insert_phone_app_rel(&self, rel: &PhoneAppRel) -> Result<()>;

    async fn find_phone_app_rel(&self, id: Uuid) -> Result<Option<PhoneAppRel>>;

    async fn list_phone_app_rels(&self) -> Result<Vec<PhoneAppRel>>;

    async fn update_phone_app_rel(
        &self,
        id: Uuid,
        changes: &PhoneAppRelChanges,
    ) -> Result<Option<PhoneAppRel>>;

    async fn delete_phone_app_rel(&self, id: Uuid) -> Result<bool>;
}

/// Posts and their append-only log.
///
/// Every listing is ordered by `created_at` descending, then `id`.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert the post and its first log entry atomically.
    async fn insert_post(&self, post: &Post, log: &PostLog) -> Result<()>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>>;

    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn list_posts_by_app(&self, app_id: Uuid) -> Result<Vec<Post>>;

    async fn list_posts_by_phone(&self, phone_id: Uuid) -> Result<Vec<Post>>;

    /// Apply `changes`. With `logged_by`, a log entry snapshotting the
    /// updated row is appended in the same transaction.
    async fn update_post(
        &self,
        id: Uuid,
        changes: &PostChanges,
        logged_by: Option<&PostActor>,
    ) -> Result<Option<Post>>;

    async fn delete_post(&self, id: Uuid) -> Result<bool>;

    /// One conjunctive query over every filter present.
    async fn find_posts(&self, query: &PostHistoryQuery) -> Result<Vec<Post>>;

    async fn list_post_logs(&self) -> Result<Vec<PostLog>>;

    async fn find_post_logs(&self, query: &PostLogQuery) -> Result<Vec<PostLog>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<()>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;
}

/// Everything the services need from storage.
pub trait Store:
    PhoneNumberRepository
    + AppRepository
    + ProductRepository
    + ContentRepository
    + PhoneAppRelRepository
    + PostRepository
    + UserRepository
{
}

impl<T> Store for T where
    T: PhoneNumberRepository
        + AppRepository
        + ProductRepository
        + ContentRepository
        + PhoneAppRelRepository
        + PostRepository
        + UserRepository
{
}
