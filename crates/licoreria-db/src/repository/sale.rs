//! # Sale Repository
//!
//! Database operations for finalized sales.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Creation (ACID)                                 │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ├── 1. INSERT INTO sales (totals, payment, cashier, change)      │
//! │       │                                                                 │
//! │       ├── 2. For each line:                                            │
//! │       │      INSERT INTO sale_items (snapshot of price/description)    │
//! │       │      UPDATE products SET stock = stock - quantity              │
//! │       │                                                                 │
//! │       ├── 3. For each split payment:                                   │
//! │       │      INSERT INTO sale_payments                                 │
//! │       │                                                                 │
//! │  COMMIT (or ROLLBACK on any failure, leaving no partial sale)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Sale items freeze the product description and unit price at the time
//! of sale, so later catalog edits never rewrite sales history.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use licoreria_core::{PaymentMethod, PurchaseType, Sale, SaleItem, SplitPayment};

/// One line of a sale about to be persisted, already priced.
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub product_id: String,
    pub description_snapshot: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub wholesale: bool,
}

impl NewSaleItem {
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(self.quantity)
    }
}

/// A fully-priced sale ready to be written in one transaction.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub client_id: Option<i64>,
    pub items: Vec<NewSaleItem>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub points_earned: i64,
    pub payment_method: PaymentMethod,
    pub purchase_type: PurchaseType,
    pub comment: Option<String>,
    pub cashier: String,
    pub amount_received_cents: i64,
    pub change_cents: i64,
    pub split_payments: Vec<SplitPayment>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a sale, its line snapshots, its split payments, and the
    /// stock decrements in a single transaction.
    pub async fn insert_sale(&self, new: NewSale) -> DbResult<Sale> {
        if new.items.is_empty() {
            return Err(DbError::QueryFailed(
                "cannot persist a sale with no items".to_string(),
            ));
        }

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            sale_id = %sale_id,
            items = new.items.len(),
            total_cents = new.total_cents,
            "Persisting sale"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, client_id, subtotal_cents, discount_cents, total_cents,
                points_earned, payment_method, purchase_type, comment,
                cashier, amount_received_cents, change_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&sale_id)
        .bind(new.client_id)
        .bind(new.subtotal_cents)
        .bind(new.discount_cents)
        .bind(new.total_cents)
        .bind(new.points_earned)
        .bind(new.payment_method)
        .bind(new.purchase_type)
        .bind(&new.comment)
        .bind(&new.cashier)
        .bind(new.amount_received_cents)
        .bind(new.change_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, description_snapshot,
                    unit_price_cents, quantity, line_total_cents, wholesale, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(&item.product_id)
            .bind(&item.description_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents())
            .bind(item.wholesale)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3")
                .bind(item.quantity)
                .bind(now)
                .bind(&item.product_id)
                .execute(&mut *tx)
                .await?;
        }

        for payment in &new.split_payments {
            sqlx::query(
                r#"
                INSERT INTO sale_payments (id, sale_id, method, amount_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(payment.method)
            .bind(payment.amount_cents)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await.map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sale_id = %sale_id, total_cents = new.total_cents, "Sale persisted");

        self.get_by_id(&sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", &sale_id))
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, client_id, subtotal_cents, discount_cents, total_cents,
                   points_earned, payment_method, purchase_type, comment,
                   cashier, amount_received_cents, change_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the line snapshots for a sale.
    pub async fn items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, description_snapshot,
                   unit_price_cents, quantity, line_total_cents, wholesale, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets the split-tender breakdown for a sale, if any.
    pub async fn payments(&self, sale_id: &str) -> DbResult<Vec<SplitPayment>> {
        let rows: Vec<(PaymentMethod, i64)> = sqlx::query_as(
            "SELECT method, amount_cents FROM sale_payments WHERE sale_id = ?1",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(method, amount_cents)| SplitPayment {
                method,
                amount_cents,
            })
            .collect())
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, client_id, subtotal_cents, discount_cents, total_cents,
                   points_earned, payment_method, purchase_type, comment,
                   cashier, amount_received_cents, change_cents, created_at
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sums cash received since a timestamp (cash-drawer reconciliation).
    pub async fn cash_total_since(&self, since: chrono::DateTime<Utc>) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(total_cents) FROM sales
            WHERE payment_method = 'cash' AND created_at >= ?1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;

    async fn seed_product(db: &Database, description: &str, price: i64) -> licoreria_core::Product {
        db.products()
            .insert(NewProduct {
                barcode: None,
                description: description.to_string(),
                retail_price_cents: price,
                wholesale_price_cents: price - 50,
                points_per_unit: 1,
                stock: 12,
                category: None,
            })
            .await
            .unwrap()
    }

    fn new_sale(items: Vec<NewSaleItem>, total: i64) -> NewSale {
        NewSale {
            client_id: None,
            items,
            subtotal_cents: total,
            discount_cents: 0,
            total_cents: total,
            points_earned: total / 100,
            payment_method: PaymentMethod::Cash,
            purchase_type: PurchaseType::Local,
            comment: None,
            cashier: "Rosa".to_string(),
            amount_received_cents: total,
            change_cents: 0,
            split_payments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_sale_writes_snapshots_and_decrements_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, "Cerveza Cusqueña 620ml", 350).await;

        let repo = db.sales();
        let sale = repo
            .insert_sale(new_sale(
                vec![NewSaleItem {
                    product_id: product.id.clone(),
                    description_snapshot: product.description.clone(),
                    unit_price_cents: product.retail_price_cents,
                    quantity: 3,
                    wholesale: false,
                }],
                1050,
            ))
            .await
            .unwrap();

        assert_eq!(sale.total_cents, 1050);
        assert_eq!(sale.points_earned, 10);

        let items = repo.items(&sale.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line_total_cents, 1050);
        assert_eq!(items[0].description_snapshot, "Cerveza Cusqueña 620ml");

        let restocked = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(restocked.stock, 9);
    }

    #[tokio::test]
    async fn test_empty_sale_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        assert!(repo.insert_sale(new_sale(Vec::new(), 0)).await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_survives_catalog_edit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, "Pisco Quebranta 750ml", 4500).await;

        let repo = db.sales();
        let sale = repo
            .insert_sale(new_sale(
                vec![NewSaleItem {
                    product_id: product.id.clone(),
                    description_snapshot: product.description.clone(),
                    unit_price_cents: 4500,
                    quantity: 1,
                    wholesale: false,
                }],
                4500,
            ))
            .await
            .unwrap();

        // Rename the product after the sale; history must not move.
        db.products()
            .update(
                &product.id,
                NewProduct {
                    barcode: None,
                    description: "Pisco Acholado 750ml".to_string(),
                    retail_price_cents: 4800,
                    wholesale_price_cents: 4500,
                    points_per_unit: 1,
                    stock: 11,
                    category: None,
                },
            )
            .await
            .unwrap();

        let items = repo.items(&sale.id).await.unwrap();
        assert_eq!(items[0].description_snapshot, "Pisco Quebranta 750ml");
        assert_eq!(items[0].unit_price_cents, 4500);
    }

    #[tokio::test]
    async fn test_split_payments_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, "Ron Cartavio 1L", 3200).await;

        let mut sale = new_sale(
            vec![NewSaleItem {
                product_id: product.id.clone(),
                description_snapshot: product.description.clone(),
                unit_price_cents: 3200,
                quantity: 1,
                wholesale: false,
            }],
            3200,
        );
        sale.split_payments = vec![
            SplitPayment {
                method: PaymentMethod::Cash,
                amount_cents: 2000,
            },
            SplitPayment {
                method: PaymentMethod::Yape,
                amount_cents: 1200,
            },
        ];

        let repo = db.sales();
        let persisted = repo.insert_sale(sale).await.unwrap();

        let payments = repo.payments(&persisted.id).await.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(
            payments.iter().map(|p| p.amount_cents).sum::<i64>(),
            3200
        );
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, "Vodka Russkaya 1L", 2800).await;

        let repo = db.sales();
        for _ in 0..2 {
            repo.insert_sale(new_sale(
                vec![NewSaleItem {
                    product_id: product.id.clone(),
                    description_snapshot: product.description.clone(),
                    unit_price_cents: 2800,
                    quantity: 1,
                    wholesale: false,
                }],
                2800,
            ))
            .await
            .unwrap();
        }

        let sales = repo.list_recent(10).await.unwrap();
        assert_eq!(sales.len(), 2);
    }
}
