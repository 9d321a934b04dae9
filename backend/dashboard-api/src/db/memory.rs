//! In-process store for tests and local runs (`DATABASE__URL=memory://`).
//!
//! Mirrors the PostgreSQL schema's unique and delete-restrict constraints so
//! both backends report the same errors.
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{
    AppRepository, ContentRepository, PhoneAppRelRepository, PhoneNumberRepository,
    PostRepository, ProductRepository, UserRepository,
};
use crate::error::{AppError, Result};
use crate::models::{
    App, AppChanges, Content, ContentChanges, ContentMedia, ContentRelations, MediaChanges,
    PhoneAppRel, PhoneAppRelChanges, PhoneNumber, PhoneNumberUpdate, Post, PostActor, PostChanges,
    PostHistoryQuery, PostLog, PostLogQuery, Product, ProductChanges, User,
};

#[derive(Default)]
struct Tables {
    phone_numbers: HashMap<Uuid, PhoneNumber>,
    apps: HashMap<Uuid, App>,
    products: HashMap<Uuid, Product>,
    contents: HashMap<Uuid, Content>,
    content_media: HashMap<Uuid, ContentMedia>,
    /// (content_id, product_id)
    content_product_rels: BTreeSet<(Uuid, Uuid)>,
    /// (content_id, app_id)
    content_site_rels: BTreeSet<(Uuid, Uuid)>,
    phone_app_rels: HashMap<Uuid, PhoneAppRel>,
    posts: HashMap<Uuid, Post>,
    post_logs: Vec<PostLog>,
    users: HashMap<Uuid, User>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(what: &str) -> AppError {
    AppError::DuplicateKey(format!("{what} already exists"))
}

fn referenced(what: &str) -> AppError {
    AppError::Conflict(format!("{what} is referenced by other records"))
}

/// Newest first, ties broken by id.
fn sorted_desc<T: Clone>(
    rows: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, Uuid),
) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(|a, b| {
        let (a_at, a_id) = key(a);
        let (b_at, b_id) = key(b);
        b_at.cmp(&a_at).then(a_id.cmp(&b_id))
    });
    rows
}

fn media_order(a: &ContentMedia, b: &ContentMedia) -> Ordering {
    let by_order = match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_order
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

impl Tables {
    fn post_matches(&self, post: &Post, query: &PostHistoryQuery) -> bool {
        if query.content_id.is_some_and(|id| post.content_id != id) {
            return false;
        }
        if let Some(media_id) = query.media_id {
            let owned = self
                .content_media
                .get(&media_id)
                .is_some_and(|m| m.content_id == post.content_id);
            if !owned {
                return false;
            }
        }
        if query.phone_id.is_some_and(|id| post.phone_number_id != id) {
            return false;
        }
        if query.app_id.is_some_and(|id| post.app_id != id) {
            return false;
        }
        if query.user_id.is_some() && post.user_id != query.user_id {
            return false;
        }
        if query.request_ip.is_some() && post.request_ip != query.request_ip {
            return false;
        }
        if query.from.is_some_and(|from| post.created_at < from) {
            return false;
        }
        if query.until.is_some_and(|until| post.created_at > until) {
            return false;
        }
        true
    }

    fn app_in_use(&self, id: Uuid) -> bool {
        self.products.values().any(|p| p.app_id == id)
            || self.content_site_rels.iter().any(|(_, app_id)| *app_id == id)
            || self.phone_app_rels.values().any(|r| r.app_id == id)
            || self.posts.values().any(|p| p.app_id == id)
    }

    fn phone_in_use(&self, id: Uuid) -> bool {
        self.phone_app_rels.values().any(|r| r.phone_id == id)
            || self.posts.values().any(|p| p.phone_number_id == id)
    }

    fn product_in_use(&self, id: Uuid) -> bool {
        self.content_product_rels.iter().any(|(_, product_id)| *product_id == id)
            || self.posts.values().any(|p| p.product_id == id)
    }

    fn replace_relations(&mut self, content_id: Uuid, changes: &ContentChanges) {
        if let Some(product_ids) = &changes.product_ids {
            self.content_product_rels.retain(|(c, _)| *c != content_id);
            self.content_product_rels
                .extend(product_ids.iter().map(|p| (content_id, *p)));
        }
        if let Some(app_ids) = &changes.app_ids {
            self.content_site_rels.retain(|(c, _)| *c != content_id);
            self.content_site_rels
                .extend(app_ids.iter().map(|a| (content_id, *a)));
        }
    }
}

// ============================================================================
// Phone numbers
// ============================================================================

#[async_trait]
impl PhoneNumberRepository for MemoryStore {
    async fn insert_phone_number(&self, phone: &PhoneNumber) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables
            .phone_numbers
            .values()
            .any(|p| p.phone_number == phone.phone_number)
        {
            return Err(duplicate("Phone number"));
        }
        tables.phone_numbers.insert(phone.id, phone.clone());
        Ok(())
    }

    async fn find_phone_number(&self, id: Uuid) -> Result<Option<PhoneNumber>> {
        Ok(self.tables.read().await.phone_numbers.get(&id).cloned())
    }

    async fn find_phone_number_by_value(&self, phone_number: &str) -> Result<Option<PhoneNumber>> {
        let tables = self.tables.read().await;
        Ok(tables
            .phone_numbers
            .values()
            .find(|p| p.phone_number == phone_number)
            .cloned())
    }

    async fn list_phone_numbers(&self) -> Result<Vec<PhoneNumber>> {
        let tables = self.tables.read().await;
        Ok(sorted_desc(tables.phone_numbers.values().cloned(), |p| {
            (p.created_at, p.id)
        }))
    }

    async fn update_phone_number(
        &self,
        id: Uuid,
        update: &PhoneNumberUpdate,
    ) -> Result<Option<PhoneNumber>> {
        let mut tables = self.tables.write().await;

        if let Some(number) = &update.phone_number {
            if tables
                .phone_numbers
                .values()
                .any(|p| p.id != id && &p.phone_number == number)
            {
                return Err(duplicate("Phone number"));
            }
        }

        let Some(phone) = tables.phone_numbers.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(number) = &update.phone_number {
            phone.phone_number = number.clone();
        }
        if let Some(hash) = &update.password_hash {
            phone.password_hash = hash.clone();
        }
        if let Some(active) = update.active {
            phone.active = active;
        }
        Ok(Some(phone.clone()))
    }

    async fn delete_phone_number(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.phone_numbers.contains_key(&id) {
            return Ok(false);
        }
        if tables.phone_in_use(id) {
            return Err(referenced("Phone number"));
        }
        tables.phone_numbers.remove(&id);
        Ok(true)
    }
}

// ============================================================================
// Apps
// ============================================================================

#[async_trait]
impl AppRepository for MemoryStore {
    async fn insert_app(&self, app: &App) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.apps.values().any(|a| a.app_name == app.app_name) {
            return Err(duplicate("App"));
        }
        tables.apps.insert(app.id, app.clone());
        Ok(())
    }

    async fn find_app(&self, id: Uuid) -> Result<Option<App>> {
        Ok(self.tables.read().await.apps.get(&id).cloned())
    }

    async fn find_app_by_name(&self, app_name: &str) -> Result<Option<App>> {
        let tables = self.tables.read().await;
        Ok(tables.apps.values().find(|a| a.app_name == app_name).cloned())
    }

    async fn list_apps(&self) -> Result<Vec<App>> {
        let tables = self.tables.read().await;
        Ok(sorted_desc(tables.apps.values().cloned(), |a| (a.created_at, a.id)))
    }

    async fn update_app(&self, id: Uuid, changes: &AppChanges) -> Result<Option<App>> {
        let mut tables = self.tables.write().await;

        if let Some(name) = &changes.app_name {
            if tables.apps.values().any(|a| a.id != id && &a.app_name == name) {
                return Err(duplicate("App"));
            }
        }

        let Some(app) = tables.apps.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.app_name {
            app.app_name = name.clone();
        }
        if let Some(active) = changes.active {
            app.active = active;
        }
        Ok(Some(app.clone()))
    }

    async fn delete_app(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.apps.contains_key(&id) {
            return Ok(false);
        }
        if tables.app_in_use(id) {
            return Err(referenced("App"));
        }
        tables.apps.remove(&id);
        Ok(true)
    }
}

// ============================================================================
// Products
// ============================================================================

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.apps.contains_key(&product.app_id) {
            return Err(AppError::Conflict("Product references a missing app".to_string()));
        }
        tables.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(sorted_desc(tables.products.values().cloned(), |p| {
            (p.created_at, p.id)
        }))
    }

    async fn list_products_by_app(&self, app_id: Uuid) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(sorted_desc(
            tables.products.values().filter(|p| p.app_id == app_id).cloned(),
            |p| (p.created_at, p.id),
        ))
    }

    async fn update_product(&self, id: Uuid, changes: &ProductChanges) -> Result<Option<Product>> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.product_name {
            product.product_name = name.clone();
        }
        if let Some(active) = changes.active {
            product.active = active;
        }
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(false);
        }
        if tables.product_in_use(id) {
            return Err(referenced("Product"));
        }
        tables.products.remove(&id);
        Ok(true)
    }
}

// ============================================================================
// Contents and media
// ============================================================================

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn insert_content(
        &self,
        content: &Content,
        relations: &ContentRelations,
        media: &[ContentMedia],
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.contents.contains_key(&content.id) {
            return Err(duplicate("Content"));
        }
        tables.contents.insert(content.id, content.clone());
        tables.replace_relations(
            content.id,
            &ContentChanges {
                content_name: None,
                product_ids: Some(relations.product_ids.clone()),
                app_ids: Some(relations.app_ids.clone()),
            },
        );
        for item in media {
            tables.content_media.insert(item.id, item.clone());
        }
        Ok(())
    }

    async fn find_content(&self, id: Uuid) -> Result<Option<Content>> {
        Ok(self.tables.read().await.contents.get(&id).cloned())
    }

    async fn list_contents(&self) -> Result<Vec<Content>> {
        let tables = self.tables.read().await;
        Ok(sorted_desc(tables.contents.values().cloned(), |c| {
            (c.created_at, c.id)
        }))
    }

    async fn content_relations(&self, content_id: Uuid) -> Result<ContentRelations> {
        let tables = self.tables.read().await;
        let mut product_ids: Vec<Uuid> = tables
            .content_product_rels
            .iter()
            .filter(|(c, _)| *c == content_id)
            .map(|(_, p)| *p)
            .collect();
        let mut app_ids: Vec<Uuid> = tables
            .content_site_rels
            .iter()
            .filter(|(c, _)| *c == content_id)
            .map(|(_, a)| *a)
            .collect();
        product_ids.sort();
        app_ids.sort();

        Ok(ContentRelations {
            product_ids,
            app_ids,
        })
    }

    async fn update_content(&self, id: Uuid, changes: &ContentChanges) -> Result<Option<Content>> {
        let mut tables = self.tables.write().await;
        let Some(content) = tables.contents.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.content_name {
            content.content_name = name.clone();
        }
        let content = content.clone();
        tables.replace_relations(id, changes);
        Ok(Some(content))
    }

    async fn delete_content(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.contents.contains_key(&id) {
            return Ok(false);
        }
        if tables.posts.values().any(|p| p.content_id == id) {
            return Err(referenced("Content"));
        }
        tables.contents.remove(&id);
        tables.content_media.retain(|_, m| m.content_id != id);
        tables.content_product_rels.retain(|(c, _)| *c != id);
        tables.content_site_rels.retain(|(c, _)| *c != id);
        Ok(true)
    }

    async fn insert_media(&self, media: &ContentMedia) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.contents.contains_key(&media.content_id) {
            return Err(AppError::Conflict("Media references a missing content".to_string()));
        }
        tables.content_media.insert(media.id, media.clone());
        Ok(())
    }

    async fn find_media(&self, id: Uuid) -> Result<Option<ContentMedia>> {
        Ok(self.tables.read().await.content_media.get(&id).cloned())
    }

    async fn list_media(&self, content_id: Uuid) -> Result<Vec<ContentMedia>> {
        let tables = self.tables.read().await;
        let mut media: Vec<ContentMedia> = tables
            .content_media
            .values()
            .filter(|m| m.content_id == content_id)
            .cloned()
            .collect();
        media.sort_by(media_order);
        Ok(media)
    }

    async fn update_media(&self, id: Uuid, changes: &MediaChanges) -> Result<Option<ContentMedia>> {
        let mut tables = self.tables.write().await;
        let Some(media) = tables.content_media.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(media_type) = &changes.media_type {
            media.media_type = media_type.clone();
        }
        if let Some(url) = &changes.media_url {
            media.media_url = url.clone();
        }
        if let Some(order) = changes.order {
            media.order = order;
        }
        Ok(Some(media.clone()))
    }

    async fn delete_media(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.content_media.remove(&id).is_some())
    }
}

// ============================================================================
// Phone / app assignments
// ============================================================================

#[async_trait]
impl PhoneAppRelRepository for MemoryStore {
    async fn insert_phone_app_rel(&self, rel: &PhoneAppRel) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.phone_app_rels.insert(rel.id, rel.clone());
        Ok(())
    }

    async fn find_phone_app_rel(&self, id: Uuid) -> Result<Option<PhoneAppRel>> {
        Ok(self.tables.read().await.phone_app_rels.get(&id).cloned())
    }

    async fn list_phone_app_rels(&self) -> Result<Vec<PhoneAppRel>> {
        let tables = self.tables.read().await;
        Ok(sorted_desc(tables.phone_app_rels.values().cloned(), |r| {
            (r.created_at, r.id)
        }))
    }

    async fn update_phone_app_rel(
        &self,
        id: Uuid,
        changes: &PhoneAppRelChanges,
    ) -> Result<Option<PhoneAppRel>> {
        let mut tables = self.tables.write().await;
        let Some(rel) = tables.phone_app_rels.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(phone_id) = changes.phone_id {
            rel.phone_id = phone_id;
        }
        if let Some(app_id) = changes.app_id {
            rel.app_id = app_id;
        }
        Ok(Some(rel.clone()))
    }

    async fn delete_phone_app_rel(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.phone_app_rels.remove(&id).is_some())
    }
}

// ============================================================================
// Posts and post logs
// ============================================================================

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert_post(&self, post: &Post, log: &PostLog) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(duplicate("Post"));
        }
        tables.posts.insert(post.id, post.clone());
        tables.post_logs.push(log.clone());
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        self.find_posts(&PostHistoryQuery::default()).await
    }

    async fn list_posts_by_app(&self, app_id: Uuid) -> Result<Vec<Post>> {
        self.find_posts(&PostHistoryQuery {
            app_id: Some(app_id),
            ..Default::default()
        })
        .await
    }

    async fn list_posts_by_phone(&self, phone_id: Uuid) -> Result<Vec<Post>> {
        self.find_posts(&PostHistoryQuery {
            phone_id: Some(phone_id),
            ..Default::default()
        })
        .await
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: &PostChanges,
        logged_by: Option<&PostActor>,
    ) -> Result<Option<Post>> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(post);
        let post = post.clone();
        if let Some(actor) = logged_by {
            tables.post_logs.push(PostLog::record(&post, actor));
        }
        Ok(Some(post))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.posts.remove(&id).is_some())
    }

    async fn find_posts(&self, query: &PostHistoryQuery) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(sorted_desc(
            tables
                .posts
                .values()
                .filter(|p| tables.post_matches(p, query))
                .cloned(),
            |p| (p.created_at, p.id),
        ))
    }

    async fn list_post_logs(&self) -> Result<Vec<PostLog>> {
        self.find_post_logs(&PostLogQuery::default()).await
    }

    async fn find_post_logs(&self, query: &PostLogQuery) -> Result<Vec<PostLog>> {
        let tables = self.tables.read().await;
        let matches = tables.post_logs.iter().filter(|log| {
            query.post_id.map_or(true, |id| log.post_id == id)
                && (query.user_id.is_none() || log.user_id == query.user_id)
                && (query.request_ip.is_none() || log.request_ip == query.request_ip)
                && query.from.map_or(true, |from| log.created_at >= from)
                && query.until.map_or(true, |until| log.created_at <= until)
        });
        Ok(sorted_desc(matches.cloned(), |l| (l.created_at, l.id)))
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(duplicate("User"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn app(name: &str) -> App {
        App {
            id: Uuid::new_v4(),
            app_name: name.to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unique_app_name() {
        let store = MemoryStore::new();
        store.insert_app(&app("TikTok")).await.unwrap();

        let err = store.insert_app(&app("TikTok")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_rejected() {
        let store = MemoryStore::new();
        let tiktok = app("TikTok");
        let reels = app("Reels");
        store.insert_app(&tiktok).await.unwrap();
        store.insert_app(&reels).await.unwrap();

        let changes = AppChanges {
            app_name: Some("TikTok".to_string()),
            active: None,
        };
        let err = store.update_app(reels.id, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));

        // Renaming to its own name is fine
        assert!(store.update_app(tiktok.id, &changes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_referenced_app_cannot_be_deleted() {
        let store = MemoryStore::new();
        let tiktok = app("TikTok");
        store.insert_app(&tiktok).await.unwrap();
        store
            .insert_product(&Product {
                id: Uuid::new_v4(),
                product_name: "Widget".to_string(),
                app_id: tiktok.id,
                active: true,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let err = store.delete_app(tiktok.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(store.find_app(tiktok.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_content_cascades_media() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let content = Content {
            id: Uuid::new_v4(),
            content_name: "Launch".to_string(),
            created_at: now,
        };
        let media = ContentMedia {
            id: Uuid::new_v4(),
            content_id: content.id,
            media_type: "url".to_string(),
            media_url: "https://cdn.example.com/a.png".to_string(),
            order: None,
            created_at: now,
        };
        store
            .insert_content(&content, &ContentRelations::default(), &[media.clone()])
            .await
            .unwrap();

        assert!(store.delete_content(content.id).await.unwrap());
        assert!(store.find_media(media.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_media_order_unset_last() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let content = Content {
            id: Uuid::new_v4(),
            content_name: "Gallery".to_string(),
            created_at: now,
        };
        let item = |order: Option<i32>, offset: i64| ContentMedia {
            id: Uuid::new_v4(),
            content_id: content.id,
            media_type: "image".to_string(),
            media_url: format!("https://cdn.example.com/{offset}.png"),
            order,
            created_at: now + Duration::seconds(offset),
        };
        let media = vec![item(None, 0), item(Some(2), 1), item(Some(1), 2)];
        store
            .insert_content(&content, &ContentRelations::default(), &media)
            .await
            .unwrap();

        let listed = store.list_media(content.id).await.unwrap();
        let orders: Vec<Option<i32>> = listed.iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![Some(1), Some(2), None]);
    }
}
