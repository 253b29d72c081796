//! Catalog repository: categories and products.

use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use simshop_core::models::{
    now, Category, CategoryUpdate, NewCategory, NewProduct, Product, ProductFilter, ProductUpdate,
};
use simshop_core::{ShopError, ShopResult};
use simshop_storage::queries::{categories, products};
use simshop_storage::Store;

#[derive(Clone)]
pub struct CatalogRepository {
    store: Store,
}

fn require_category(conn: &Connection, id: Uuid) -> ShopResult<()> {
    match categories::get_category(conn, id)? {
        Some(_) => Ok(()),
        None => Err(ShopError::validation(format!("category {id} does not exist"))),
    }
}

impl CatalogRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_categories(&self) -> ShopResult<Vec<Category>> {
        self.store.with_conn(categories::list_categories).await
    }

    pub async fn category_by_slug(&self, slug: String) -> ShopResult<Category> {
        self.store
            .with_conn(move |conn| {
                categories::get_category_by_slug(conn, &slug)?
                    .ok_or_else(|| ShopError::not_found("category", &slug))
            })
            .await
    }

    pub async fn create_category(&self, request: NewCategory) -> ShopResult<Category> {
        let category = request.into_category(now())?;
        let created = self
            .store
            .with_conn(move |conn| {
                categories::insert_category(conn, &category)?;
                Ok(category)
            })
            .await?;
        info!(id = %created.id, slug = %created.slug, "category created");
        Ok(created)
    }

    pub async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> ShopResult<Category> {
        self.store
            .with_conn(move |conn| {
                let mut category = categories::get_category(conn, id)?
                    .ok_or_else(|| ShopError::not_found("category", id))?;
                update.apply(&mut category)?;
                categories::update_category(conn, &category)?;
                Ok(category)
            })
            .await
    }

    pub async fn delete_category(&self, id: Uuid) -> ShopResult<()> {
        let deleted = self
            .store
            .with_conn(move |conn| categories::delete_category(conn, id))
            .await?;
        if !deleted {
            return Err(ShopError::not_found("category", id));
        }
        info!(id = %id, "category deleted");
        Ok(())
    }

    pub async fn list_products(&self, filter: ProductFilter) -> ShopResult<Vec<Product>> {
        self.store
            .with_conn(move |conn| products::list_products(conn, &filter))
            .await
    }

    pub async fn product_by_slug(&self, slug: String) -> ShopResult<Product> {
        self.store
            .with_conn(move |conn| {
                products::get_product_by_slug(conn, &slug)?
                    .ok_or_else(|| ShopError::not_found("product", &slug))
            })
            .await
    }

    pub async fn create_product(&self, request: NewProduct) -> ShopResult<Product> {
        let product = request.into_product(now())?;
        let created = self
            .store
            .with_conn(move |conn| {
                require_category(conn, product.category)?;
                products::insert_product(conn, &product)?;
                Ok(product)
            })
            .await?;
        info!(id = %created.id, sku = %created.sku, "product created");
        Ok(created)
    }

    pub async fn update_product(&self, id: Uuid, update: ProductUpdate) -> ShopResult<Product> {
        self.store
            .with_conn(move |conn| {
                let mut product = products::get_product(conn, id)?
                    .ok_or_else(|| ShopError::not_found("product", id))?;
                update.apply(&mut product, now())?;
                require_category(conn, product.category)?;
                products::update_product(conn, &product)?;
                Ok(product)
            })
            .await
    }

    pub async fn delete_product(&self, id: Uuid) -> ShopResult<()> {
        let deleted = self
            .store
            .with_conn(move |conn| products::delete_product(conn, id))
            .await?;
        if !deleted {
            return Err(ShopError::not_found("product", id));
        }
        info!(id = %id, "product deleted");
        Ok(())
    }
}
