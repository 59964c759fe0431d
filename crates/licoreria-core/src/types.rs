//! # Domain Types
//!
//! Core domain types used throughout Licorería POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Client      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (i64)       │   │  id (UUID)      │       │
//! │  │  description    │   │  name           │   │  client_id      │       │
//! │  │  retail/whole-  │   │  accumulated_   │   │  total_cents    │       │
//! │  │  sale prices    │   │  points         │   │  points_earned  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentMethod   │   │  PurchaseType   │   │  SaleRequest    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Cash           │   │  Local          │   │  what checkout  │       │
//! │  │  Yape / Plin    │   │  Delivery       │   │  sends to the   │       │
//! │  │  Card           │   │                 │   │  Sales service  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products and sales carry a UUID v4 `id` (immutable, offline-safe).
//! Clients use a plain numeric id because that is what the loyalty
//! backend exposes on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the store catalog.
///
/// Carries two pricing tiers: retail (single bottle over the counter)
/// and wholesale (by the box / bulk purchase). Which tier applies is
/// chosen per ticket line at the moment the line is added, and frozen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Display description shown to the cashier and on the receipt.
    pub description: String,

    /// Retail price in céntimos (single-unit, over the counter).
    pub retail_price_cents: i64,

    /// Wholesale price in céntimos (bulk tier, usually lower).
    pub wholesale_price_cents: i64,

    /// Loyalty points a client earns per unit sold.
    /// Zero means the product grants no per-line points.
    pub points_per_unit: i64,

    /// Current stock level.
    pub stock: i64,

    /// Optional catalog category ("Cervezas", "Piscos", "Vinos", ...).
    pub category: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the retail price as a Money type.
    #[inline]
    pub fn retail_price(&self) -> Money {
        Money::from_cents(self.retail_price_cents)
    }

    /// Returns the wholesale price as a Money type.
    #[inline]
    pub fn wholesale_price(&self) -> Money {
        Money::from_cents(self.wholesale_price_cents)
    }

    /// Returns the unit price for the requested pricing tier.
    #[inline]
    pub fn price_for_tier(&self, wholesale: bool) -> Money {
        if wholesale {
            self.wholesale_price()
        } else {
            self.retail_price()
        }
    }

    /// Loyalty points per unit, with non-positive catalog values
    /// normalized to zero.
    #[inline]
    pub fn effective_points_per_unit(&self) -> i64 {
        self.points_per_unit.max(0)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered client with a loyalty point balance.
///
/// Walk-in sales have no client attached; loyalty points only accrue
/// when a ticket references one of these records.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    /// Numeric identifier, as exposed by the loyalty backend.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Contact phone, if registered.
    pub phone: Option<String>,

    /// Accumulated loyalty points across all sales.
    pub accumulated_points: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the client paid.
///
/// Yape and Plin are the mobile wallets ubiquitous in Peruvian retail;
/// they behave like cash from the register's point of view (no external
/// terminal involved).
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Yape mobile wallet transfer.
    Yape,
    /// Plin mobile wallet transfer.
    Plin,
    /// Card payment on external terminal.
    Card,
}

// =============================================================================
// Purchase Type
// =============================================================================

/// Where the purchase happened.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseType {
    /// In-store sale at the register. The checkout flow always uses this.
    Local,
    /// Delivery order (recorded by the back office, not the register).
    Delivery,
}

impl Default for PurchaseType {
    fn default() -> Self {
        PurchaseType::Local
    }
}

// =============================================================================
// Sale Request (what checkout sends to the Sales collaborator)
// =============================================================================

/// One product line in a sale-creation request.
///
/// Unit price is deliberately NOT sent: the backend re-prices every
/// line from its own catalog and never trusts client-side amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRequestItem {
    pub product_id: String,
    pub quantity: i64,
}

/// One split-tender payment within a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SplitPayment {
    pub method: PaymentMethod,
    pub amount_cents: i64,
}

/// The sale-creation payload submitted to the Sales collaborator.
///
/// ## Wire Shape
/// ```json
/// {
///   "clientId": 12,
///   "items": [{ "productId": "…", "quantity": 2 }],
///   "discountCents": 0,
///   "paymentMethod": "cash",
///   "comment": "",
///   "purchaseType": "local",
///   "amountReceivedCents": 2000,
///   "pointsUsed": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRequest {
    /// Attached client, or None for a walk-in sale.
    pub client_id: Option<i64>,

    /// Product/quantity pairs. Prices are resolved server-side.
    pub items: Vec<SaleRequestItem>,

    /// Ticket-level discount in céntimos (never negative).
    pub discount_cents: i64,

    /// Primary payment method.
    pub payment_method: PaymentMethod,

    /// Free-text comment (the ticket notes).
    pub comment: String,

    /// Fixed to [`PurchaseType::Local`] by the register checkout flow.
    pub purchase_type: PurchaseType,

    /// Cashier who rang up the sale.
    pub cashier: String,

    /// Amount the client handed over (cash flows; 0 for exact-tender
    /// wallet/card payments).
    pub amount_received_cents: i64,

    /// Loyalty points redeemed against this sale.
    /// Fixed to 0 by the register checkout flow.
    pub points_used: i64,

    /// Split-tender breakdown, if the client paid with more than one
    /// method. When present, the amounts are persisted alongside the sale.
    pub split_payments: Option<Vec<SplitPayment>>,
}

// =============================================================================
// Sale (the persisted record)
// =============================================================================

/// A persisted sale, as returned by the Sales collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub client_id: Option<i64>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    /// Points awarded at checkout: one per whole sol of the final total.
    pub points_earned: i64,
    pub payment_method: PaymentMethod,
    pub purchase_type: PurchaseType,
    pub comment: Option<String>,
    pub cashier: String,
    pub amount_received_cents: i64,
    pub change_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the final total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the change due as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Sale Item (persisted line snapshot)
// =============================================================================

/// A line item in a persisted sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product description at time of sale (frozen).
    pub description_snapshot: String,
    /// Unit price in céntimos at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
    /// True if the wholesale pricing tier was applied.
    pub wholesale: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
