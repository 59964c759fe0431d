//! # Database Adapters
//!
//! Production implementations of the collaborator traits over the
//! SQLite layer.
//!
//! ## Server-Side Pricing
//! The sale request carries only `(product_id, quantity)` pairs. The
//! adapter re-prices every line from the catalog at the retail tier and
//! recomputes the totals itself; it never trusts amounts computed on
//! the register side.

use async_trait::async_trait;
use tracing::debug;

use licoreria_core::{validation, Client, Money, Sale, SaleRequest};
use licoreria_db::{Database, DbError, NewSale, NewSaleItem};

use crate::service::{ClientDirectory, SalesService, ServiceError};

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::NotFound {
                entity: "record",
                id: format!("{entity}:{id}"),
            },
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

/// Persists sales into the local SQLite store.
#[derive(Debug, Clone)]
pub struct DbSalesService {
    db: Database,
}

impl DbSalesService {
    pub fn new(db: Database) -> Self {
        DbSalesService { db }
    }
}

#[async_trait]
impl SalesService for DbSalesService {
    async fn create(&self, request: &SaleRequest) -> Result<Sale, ServiceError> {
        if request.items.is_empty() {
            return Err(ServiceError::Invalid("sale has no items".to_string()));
        }

        let products = self.db.products();
        let mut items = Vec::with_capacity(request.items.len());
        let mut subtotal = Money::zero();

        for line in &request.items {
            validation::validate_uuid(&line.product_id)
                .map_err(|err| ServiceError::Invalid(err.to_string()))?;
            validation::validate_quantity(line.quantity)
                .map_err(|err| ServiceError::Invalid(err.to_string()))?;

            let product = products
                .get_by_id(&line.product_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound {
                    entity: "product",
                    id: line.product_id.clone(),
                })?;

            if !product.is_active {
                return Err(ServiceError::Invalid(format!(
                    "product is inactive: {}",
                    product.description
                )));
            }

            let unit_price = Money::from_cents(product.retail_price_cents);
            subtotal += unit_price.multiply_quantity(line.quantity);

            items.push(NewSaleItem {
                product_id: product.id,
                description_snapshot: product.description,
                unit_price_cents: unit_price.cents(),
                quantity: line.quantity,
                wholesale: false,
            });
        }

        let discount = Money::from_cents(request.discount_cents.max(0));
        let total = subtotal.saturating_discount(discount);
        let received = Money::from_cents(request.amount_received_cents);
        let change = received.saturating_discount(total);

        debug!(
            items = items.len(),
            total_cents = total.cents(),
            "Re-priced sale request"
        );

        let sale = self
            .db
            .sales()
            .insert_sale(NewSale {
                client_id: request.client_id,
                items,
                subtotal_cents: subtotal.cents(),
                discount_cents: discount.cents(),
                total_cents: total.cents(),
                points_earned: total.whole_soles(),
                payment_method: request.payment_method,
                purchase_type: request.purchase_type,
                comment: if request.comment.trim().is_empty() {
                    None
                } else {
                    Some(request.comment.trim().to_string())
                },
                cashier: request.cashier.clone(),
                amount_received_cents: received.cents(),
                change_cents: change.cents(),
                split_payments: request.split_payments.clone().unwrap_or_default(),
            })
            .await?;

        Ok(sale)
    }
}

/// Looks up loyalty clients in the local SQLite store.
#[derive(Debug, Clone)]
pub struct DbClientDirectory {
    db: Database,
}

impl DbClientDirectory {
    pub fn new(db: Database) -> Self {
        DbClientDirectory { db }
    }
}

#[async_trait]
impl ClientDirectory for DbClientDirectory {
    async fn get_by_id(&self, id: i64) -> Result<Client, ServiceError> {
        self.db
            .clients()
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "client",
                id: id.to_string(),
            })
    }

    async fn set_accumulated_points(&self, id: i64, points: i64) -> Result<(), ServiceError> {
        self.db
            .clients()
            .set_accumulated_points(id, points.max(0))
            .await
            .map_err(ServiceError::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use licoreria_core::{PaymentMethod, PurchaseType, SaleRequestItem};
    use licoreria_db::{DbConfig, NewProduct};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, description: &str, price: i64) -> licoreria_core::Product {
        db.products()
            .insert(NewProduct {
                barcode: None,
                description: description.to_string(),
                retail_price_cents: price,
                wholesale_price_cents: price - 50,
                points_per_unit: 1,
                stock: 10,
                category: None,
            })
            .await
            .unwrap()
    }

    fn request(items: Vec<SaleRequestItem>, received: i64) -> SaleRequest {
        SaleRequest {
            client_id: None,
            items,
            discount_cents: 0,
            payment_method: PaymentMethod::Cash,
            comment: String::new(),
            purchase_type: PurchaseType::Local,
            cashier: "Rosa".to_string(),
            amount_received_cents: received,
            points_used: 0,
            split_payments: None,
        }
    }

    #[tokio::test]
    async fn test_create_reprices_from_catalog() {
        let db = test_db().await;
        let product = seed_product(&db, "Cerveza Cusqueña 620ml", 750).await;

        let service = DbSalesService::new(db);
        let sale = service
            .create(&request(
                vec![SaleRequestItem {
                    product_id: product.id,
                    quantity: 4,
                }],
                3000,
            ))
            .await
            .unwrap();

        assert_eq!(sale.subtotal_cents, 3000);
        assert_eq!(sale.total_cents, 3000);
        assert_eq!(sale.points_earned, 30);
        assert_eq!(sale.change_cents, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_product() {
        let db = test_db().await;
        let service = DbSalesService::new(db);

        let result = service
            .create(&request(
                vec![SaleRequestItem {
                    product_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
                    quantity: 1,
                }],
                100,
            ))
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_product_id() {
        let db = test_db().await;
        let service = DbSalesService::new(db);

        let result = service
            .create(&request(
                vec![SaleRequestItem {
                    product_id: "not-a-uuid".to_string(),
                    quantity: 1,
                }],
                100,
            ))
            .await;

        // Malformed ids are rejected up front, before the catalog lookup.
        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_nonpositive_quantity() {
        let db = test_db().await;
        let product = seed_product(&db, "Pisco Quebranta 700ml", 4500).await;

        let service = DbSalesService::new(db);
        let result = service
            .create(&request(
                vec![SaleRequestItem {
                    product_id: product.id,
                    quantity: 0,
                }],
                4500,
            ))
            .await;

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_inactive_product() {
        let db = test_db().await;
        let product = seed_product(&db, "Vino Borgoña 750ml", 1800).await;
        db.products().deactivate(&product.id).await.unwrap();

        let service = DbSalesService::new(db);
        let result = service
            .create(&request(
                vec![SaleRequestItem {
                    product_id: product.id,
                    quantity: 1,
                }],
                1800,
            ))
            .await;

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_change_computed_for_cash_overpayment() {
        let db = test_db().await;
        let product = seed_product(&db, "Agua San Luis 625ml", 150).await;

        let service = DbSalesService::new(db);
        let sale = service
            .create(&request(
                vec![SaleRequestItem {
                    product_id: product.id,
                    quantity: 1,
                }],
                500,
            ))
            .await
            .unwrap();

        assert_eq!(sale.change_cents, 350);
    }

    #[tokio::test]
    async fn test_client_directory_round_trip() {
        let db = test_db().await;
        let client = db.clients().insert("María Quispe", None).await.unwrap();

        let directory = DbClientDirectory::new(db);
        directory
            .set_accumulated_points(client.id, 25)
            .await
            .unwrap();

        let fetched = directory.get_by_id(client.id).await.unwrap();
        assert_eq!(fetched.accumulated_points, 25);
    }

    #[tokio::test]
    async fn test_unknown_client_not_found() {
        let db = test_db().await;
        let directory = DbClientDirectory::new(db);

        assert!(matches!(
            directory.get_by_id(999).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
