use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, EntityKind, Result};
use crate::models::{NewProduct, Product, ProductChanges};

pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product> {
        if self.db.find_app(input.app_id).await?.is_none() {
            return Err(AppError::ReferenceNotFound(EntityKind::App));
        }

        let product = Product {
            id: Uuid::new_v4(),
            product_name: input.product_name,
            app_id: input.app_id,
            active: true,
            created_at: Utc::now(),
        };
        self.db.insert_product(&product).await?;

        tracing::info!(product_id = %product.id, app_id = %product.app_id, "Product created");
        Ok(product)
    }

    pub async fn get(&self, id: Uuid) -> Result<Product> {
        self.db
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.db.list_products().await
    }

    pub async fn list_by_app(&self, app_id: Uuid) -> Result<Vec<Product>> {
        self.db.list_products_by_app(app_id).await
    }

    pub async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Product> {
        self.db
            .update_product(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.db.delete_product(id).await? {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
