//! # Product Repository
//!
//! Database operations for the liquor catalog.
//!
//! ## Key Operations
//! - Full-text search using FTS5
//! - CRUD operations
//! - Stock adjustment on sale
//!
//! ## FTS5 Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How FTS5 Search Works                                │
//! │                                                                         │
//! │  Cashier types: "cusque"                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FTS5 searches across: description, barcode, category                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ products_fts (virtual table)            │                           │
//! │  │                                         │                           │
//! │  │ Cerveza Cusqueña 620ml | 77512... │ ← MATCH!                        │
//! │  │ Cerveza Pilsen 630ml   | 77598... │                                 │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results ordered by relevance                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use licoreria_core::validation::{validate_description, validate_price_cents};
use licoreria_core::Product;

/// Fields accepted when creating or updating a catalog product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub barcode: Option<String>,
    pub description: String,
    pub retail_price_cents: i64,
    pub wholesale_price_cents: i64,
    pub points_per_unit: i64,
    pub stock: i64,
    pub category: Option<String>,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new catalog product and returns it.
    pub async fn insert(&self, new: NewProduct) -> DbResult<Product> {
        validate_description(&new.description).map_err(|e| DbError::QueryFailed(e.to_string()))?;
        validate_price_cents(new.retail_price_cents)
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;
        validate_price_cents(new.wholesale_price_cents)
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            barcode: new.barcode,
            description: new.description,
            retail_price_cents: new.retail_price_cents,
            wholesale_price_cents: new.wholesale_price_cents,
            points_per_unit: new.points_per_unit.max(0),
            stock: new.stock,
            category: new.category,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        debug!(id = %product.id, description = %product.description, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, barcode, description,
                retail_price_cents, wholesale_price_cents, points_per_unit,
                stock, category, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.description)
        .bind(product.retail_price_cents)
        .bind(product.wholesale_price_cents)
        .bind(product.points_per_unit)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, description,
                   retail_price_cents, wholesale_price_cents, points_per_unit,
                   stock, category, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by exact barcode (scanner path).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, description,
                   retail_price_cents, wholesale_price_cents, points_per_unit,
                   stock, category, is_active, created_at, updated_at
            FROM products
            WHERE barcode = ?1 AND is_active = 1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Searches products using full-text search.
    ///
    /// ## How It Works
    /// 1. Uses FTS5 virtual table for instant search
    /// 2. Searches across: description, barcode, category
    /// 3. Returns active products ordered by relevance
    ///
    /// Empty queries fall back to listing active products.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        // FTS5 prefix matching: "cusque" becomes "cusque*"
        let fts_query = format!("{}*", query);

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.barcode, p.description,
                   p.retail_price_cents, p.wholesale_price_cents, p.points_per_unit,
                   p.stock, p.category, p.is_active, p.created_at, p.updated_at
            FROM products p
            INNER JOIN products_fts fts ON p.rowid = fts.rowid
            WHERE products_fts MATCH ?1
            AND p.is_active = 1
            ORDER BY rank
            LIMIT ?2
            "#,
        )
        .bind(&fts_query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists active products (catalog browse / empty search).
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, description,
                   retail_price_cents, wholesale_price_cents, points_per_unit,
                   stock, category, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY description
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates a product's mutable catalog fields.
    pub async fn update(&self, id: &str, update: NewProduct) -> DbResult<Product> {
        validate_description(&update.description)
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET barcode = ?1, description = ?2,
                retail_price_cents = ?3, wholesale_price_cents = ?4,
                points_per_unit = ?5, stock = ?6, category = ?7, updated_at = ?8
            WHERE id = ?9
            "#,
        )
        .bind(&update.barcode)
        .bind(&update.description)
        .bind(update.retail_price_cents)
        .bind(update.wholesale_price_cents)
        .bind(update.points_per_unit.max(0))
        .bind(update.stock)
        .bind(&update.category)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Adjusts stock by a signed delta (negative when selling).
    ///
    /// Stock may legitimately go negative: the store sells from the
    /// shelf even when the count in the system has drifted, and the
    /// back office reconciles later.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE products SET stock = stock + ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(delta)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    /// Counts all products, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Soft-deletes a product (keeps history intact).
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();
        let result =
            sqlx::query("UPDATE products SET is_active = 0, updated_at = ?1 WHERE id = ?2")
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
