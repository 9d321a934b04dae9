use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
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

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate constraint violations; anything else passes through untouched.
fn write_error(e: sqlx::Error, what: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::DuplicateKey(format!("{what} already exists"));
        }
        if db.is_foreign_key_violation() {
            return AppError::Conflict(format!("{what} is referenced by other records"));
        }
    }
    AppError::Database(e)
}

// ============================================================================
// Phone numbers
// ============================================================================

#[async_trait]
impl PhoneNumberRepository for PgStore {
    async fn insert_phone_number(&self, phone: &PhoneNumber) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO phone_numbers (id, phone_number, password_hash, active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(phone.id)
        .bind(&phone.phone_number)
        .bind(&phone.password_hash)
        .bind(phone.active)
        .bind(phone.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "Phone number"))?;

        Ok(())
    }

    async fn find_phone_number(&self, id: Uuid) -> Result<Option<PhoneNumber>> {
        let phone = sqlx::query_as::<_, PhoneNumber>("SELECT * FROM phone_numbers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(phone)
    }

    async fn find_phone_number_by_value(&self, phone_number: &str) -> Result<Option<PhoneNumber>> {
        let phone =
            sqlx::query_as::<_, PhoneNumber>("SELECT * FROM phone_numbers WHERE phone_number = $1")
                .bind(phone_number)
                .fetch_optional(&self.pool)
                .await?;

        Ok(phone)
    }

    async fn list_phone_numbers(&self) -> Result<Vec<PhoneNumber>> {
        let phones = sqlx::query_as::<_, PhoneNumber>(
            "SELECT * FROM phone_numbers ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(phones)
    }

    async fn update_phone_number(
        &self,
        id: Uuid,
        update: &PhoneNumberUpdate,
    ) -> Result<Option<PhoneNumber>> {
        let phone = sqlx::query_as::<_, PhoneNumber>(
            r#"
            UPDATE phone_numbers
            SET phone_number = COALESCE($2, phone_number),
                password_hash = COALESCE($3, password_hash),
                active = COALESCE($4, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.phone_number.as_deref())
        .bind(update.password_hash.as_deref())
        .bind(update.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Phone number"))?;

        Ok(phone)
    }

    async fn delete_phone_number(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM phone_numbers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Phone number"))?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Apps
// ============================================================================

#[async_trait]
impl AppRepository for PgStore {
    async fn insert_app(&self, app: &App) -> Result<()> {
        sqlx::query("INSERT INTO apps (id, app_name, active, created_at) VALUES ($1, $2, $3, $4)")
            .bind(app.id)
            .bind(&app.app_name)
            .bind(app.active)
            .bind(app.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "App"))?;

        Ok(())
    }

    async fn find_app(&self, id: Uuid) -> Result<Option<App>> {
        let app = sqlx::query_as::<_, App>("SELECT * FROM apps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(app)
    }

    async fn find_app_by_name(&self, app_name: &str) -> Result<Option<App>> {
        let app = sqlx::query_as::<_, App>("SELECT * FROM apps WHERE app_name = $1")
            .bind(app_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(app)
    }

    async fn list_apps(&self) -> Result<Vec<App>> {
        let apps = sqlx::query_as::<_, App>("SELECT * FROM apps ORDER BY created_at DESC, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(apps)
    }

    async fn update_app(&self, id: Uuid, changes: &AppChanges) -> Result<Option<App>> {
        let app = sqlx::query_as::<_, App>(
            r#"
            UPDATE apps
            SET app_name = COALESCE($2, app_name),
                active = COALESCE($3, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.app_name.as_deref())
        .bind(changes.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "App"))?;

        Ok(app)
    }

    async fn delete_app(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM apps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "App"))?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Products
// ============================================================================

#[async_trait]
impl ProductRepository for PgStore {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, product_name, app_id, active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(product.id)
        .bind(&product.product_name)
        .bind(product.app_id)
        .bind(product.active)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "Product"))?;

        Ok(())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(products)
    }

    async fn list_products_by_app(&self, app_id: Uuid) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE app_id = $1 ORDER BY created_at DESC, id",
        )
        .bind(app_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn update_product(&self, id: Uuid, changes: &ProductChanges) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET product_name = COALESCE($2, product_name),
                active = COALESCE($3, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.product_name.as_deref())
        .bind(changes.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Product"))?;

        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Product"))?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Contents and media
// ============================================================================

async fn replace_product_rels(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    content_id: Uuid,
    product_ids: &[Uuid],
) -> Result<()> {
    sqlx::query("DELETE FROM content_product_rels WHERE content_id = $1")
        .bind(content_id)
        .execute(&mut **tx)
        .await?;

    for product_id in product_ids {
        sqlx::query(
            r#"
            INSERT INTO content_product_rels (content_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(content_id)
        .bind(product_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| write_error(e, "Content product relation"))?;
    }

    Ok(())
}

async fn replace_site_rels(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    content_id: Uuid,
    app_ids: &[Uuid],
) -> Result<()> {
    sqlx::query("DELETE FROM content_site_rels WHERE content_id = $1")
        .bind(content_id)
        .execute(&mut **tx)
        .await?;

    for app_id in app_ids {
        sqlx::query(
            r#"
            INSERT INTO content_site_rels (content_id, app_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(content_id)
        .bind(app_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| write_error(e, "Content app relation"))?;
    }

    Ok(())
}

#[async_trait]
impl ContentRepository for PgStore {
    async fn insert_content(
        &self,
        content: &Content,
        relations: &ContentRelations,
        media: &[ContentMedia],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO contents (id, content_name, created_at) VALUES ($1, $2, $3)")
            .bind(content.id)
            .bind(&content.content_name)
            .bind(content.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, "Content"))?;

        replace_product_rels(&mut tx, content.id, &relations.product_ids).await?;
        replace_site_rels(&mut tx, content.id, &relations.app_ids).await?;

        for item in media {
            sqlx::query(
                r#"
                INSERT INTO content_media (id, content_id, media_type, media_url, sort_order, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id)
            .bind(content.id)
            .bind(&item.media_type)
            .bind(&item.media_url)
            .bind(item.order)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, "Content media"))?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_content(&self, id: Uuid) -> Result<Option<Content>> {
        let content = sqlx::query_as::<_, Content>("SELECT * FROM contents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(content)
    }

    async fn list_contents(&self) -> Result<Vec<Content>> {
        let contents =
            sqlx::query_as::<_, Content>("SELECT * FROM contents ORDER BY created_at DESC, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(contents)
    }

    async fn content_relations(&self, content_id: Uuid) -> Result<ContentRelations> {
        let product_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT product_id FROM content_product_rels WHERE content_id = $1 ORDER BY product_id",
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;

        let app_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT app_id FROM content_site_rels WHERE content_id = $1 ORDER BY app_id",
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ContentRelations {
            product_ids,
            app_ids,
        })
    }

    async fn update_content(&self, id: Uuid, changes: &ContentChanges) -> Result<Option<Content>> {
        let mut tx = self.pool.begin().await?;

        let content = sqlx::query_as::<_, Content>(
            r#"
            UPDATE contents
            SET content_name = COALESCE($2, content_name)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.content_name.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(content) = content else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(product_ids) = &changes.product_ids {
            replace_product_rels(&mut tx, id, product_ids).await?;
        }
        if let Some(app_ids) = &changes.app_ids {
            replace_site_rels(&mut tx, id, app_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(content))
    }

    async fn delete_content(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Content"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_media(&self, media: &ContentMedia) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO content_media (id, content_id, media_type, media_url, sort_order, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(media.id)
        .bind(media.content_id)
        .bind(&media.media_type)
        .bind(&media.media_url)
        .bind(media.order)
        .bind(media.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "Content media"))?;

        Ok(())
    }

    async fn find_media(&self, id: Uuid) -> Result<Option<ContentMedia>> {
        let media = sqlx::query_as::<_, ContentMedia>("SELECT * FROM content_media WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(media)
    }

    async fn list_media(&self, content_id: Uuid) -> Result<Vec<ContentMedia>> {
        let media = sqlx::query_as::<_, ContentMedia>(
            r#"
            SELECT * FROM content_media
            WHERE content_id = $1
            ORDER BY sort_order ASC NULLS LAST, created_at ASC, id
            "#,
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(media)
    }

    async fn update_media(&self, id: Uuid, changes: &MediaChanges) -> Result<Option<ContentMedia>> {
        let media = sqlx::query_as::<_, ContentMedia>(
            r#"
            UPDATE content_media
            SET media_type = COALESCE($2, media_type),
                media_url = COALESCE($3, media_url),
                sort_order = CASE WHEN $4 THEN $5 ELSE sort_order END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.media_type.as_deref())
        .bind(changes.media_url.as_deref())
        .bind(changes.order.is_some())
        .bind(changes.order.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(media)
    }

    async fn delete_media(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM content_media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Phone / app assignments
// ============================================================================

#[async_trait]
impl PhoneAppRelRepository for PgStore {
    async fn insert_phone_app_rel(&self, rel: &PhoneAppRel) -> Result<()> {
        sqlx::query(
            "INSERT INTO phone_app_rels (id, phone_id, app_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(rel.id)
        .bind(rel.phone_id)
        .bind(rel.app_id)
        .bind(rel.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "Phone app relation"))?;

        Ok(())
    }

    async fn find_phone_app_rel(&self, id: Uuid) -> Result<Option<PhoneAppRel>> {
        let rel = sqlx::query_as::<_, PhoneAppRel>("SELECT * FROM phone_app_rels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rel)
    }

    async fn list_phone_app_rels(&self) -> Result<Vec<PhoneAppRel>> {
        let rels = sqlx::query_as::<_, PhoneAppRel>(
            "SELECT * FROM phone_app_rels ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rels)
    }

    async fn update_phone_app_rel(
        &self,
        id: Uuid,
        changes: &PhoneAppRelChanges,
    ) -> Result<Option<PhoneAppRel>> {
        let rel = sqlx::query_as::<_, PhoneAppRel>(
            r#"
            UPDATE phone_app_rels
            SET phone_id = COALESCE($2, phone_id),
                app_id = COALESCE($3, app_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.phone_id)
        .bind(changes.app_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Phone app relation"))?;

        Ok(rel)
    }

    async fn delete_phone_app_rel(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM phone_app_rels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Posts and post logs
// ============================================================================

async fn insert_post_log(tx: &mut sqlx::Transaction<'_, Postgres>, log: &PostLog) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO post_logs (id, post_id, request_ip, user_id, status, fail_reason, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(log.id)
    .bind(log.post_id)
    .bind(log.request_ip.as_deref())
    .bind(log.user_id)
    .bind(log.status)
    .bind(log.fail_reason.as_deref())
    .bind(log.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl PostRepository for PgStore {
    async fn insert_post(&self, post: &Post, log: &PostLog) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (
                id, phone_number_id, content_id, app_id, product_id,
                post_type, status, fail_reason, request_ip, user_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id)
        .bind(post.phone_number_id)
        .bind(post.content_id)
        .bind(post.app_id)
        .bind(post.product_id)
        .bind(&post.post_type)
        .bind(post.status)
        .bind(post.fail_reason.as_deref())
        .bind(post.request_ip.as_deref())
        .bind(post.user_id)
        .bind(post.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, "Post"))?;

        insert_post_log(&mut tx, log).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
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
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET post_type = COALESCE($2, post_type),
                status = COALESCE($3, status),
                fail_reason = CASE WHEN $4 THEN $5 ELSE fail_reason END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.post_type.as_deref())
        .bind(changes.status)
        .bind(changes.fail_reason.is_some())
        .bind(changes.fail_reason.clone().flatten())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(post) = post else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(actor) = logged_by {
            insert_post_log(&mut tx, &PostLog::record(&post, actor)).await?;
        }

        tx.commit().await?;
        Ok(Some(post))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Post"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_posts(&self, query: &PostHistoryQuery) -> Result<Vec<Post>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT p.* FROM posts p WHERE TRUE");

        if let Some(content_id) = query.content_id {
            builder.push(" AND p.content_id = ").push_bind(content_id);
        }
        if let Some(media_id) = query.media_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM content_media m WHERE m.content_id = p.content_id AND m.id = ")
                .push_bind(media_id)
                .push(")");
        }
        if let Some(phone_id) = query.phone_id {
            builder.push(" AND p.phone_number_id = ").push_bind(phone_id);
        }
        if let Some(app_id) = query.app_id {
            builder.push(" AND p.app_id = ").push_bind(app_id);
        }
        if let Some(user_id) = query.user_id {
            builder.push(" AND p.user_id = ").push_bind(user_id);
        }
        if let Some(request_ip) = &query.request_ip {
            builder.push(" AND p.request_ip = ").push_bind(request_ip.clone());
        }
        if let Some(from) = query.from {
            builder.push(" AND p.created_at >= ").push_bind(from);
        }
        if let Some(until) = query.until {
            builder.push(" AND p.created_at <= ").push_bind(until);
        }

        builder.push(" ORDER BY p.created_at DESC, p.id");

        let posts = builder.build_query_as::<Post>().fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn list_post_logs(&self) -> Result<Vec<PostLog>> {
        self.find_post_logs(&PostLogQuery::default()).await
    }

    async fn find_post_logs(&self, query: &PostLogQuery) -> Result<Vec<PostLog>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM post_logs WHERE TRUE");

        if let Some(post_id) = query.post_id {
            builder.push(" AND post_id = ").push_bind(post_id);
        }
        if let Some(user_id) = query.user_id {
            builder.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(request_ip) = &query.request_ip {
            builder.push(" AND request_ip = ").push_bind(request_ip.clone());
        }
        if let Some(from) = query.from {
            builder.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(until) = query.until {
            builder.push(" AND created_at <= ").push_bind(until);
        }

        builder.push(" ORDER BY created_at DESC, id");

        let logs = builder.build_query_as::<PostLog>().fetch_all(&self.pool).await?;
        Ok(logs)
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(user.email.as_deref())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "User"))?;

        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
