//! # licoreria-core: Pure Business Logic for Licorería POS
//!
//! This crate is the **heart** of Licorería POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Licorería POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (SPA)                               │   │
//! │  │    Catalog ──► Ticket Tabs ──► Tender ──► Receipt               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              licoreria-register (orchestration)                 │   │
//! │  │    ticket state, checkout, Sales/Clients collaborators          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ licoreria-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ticket   │  │  points   │  │   │
//! │  │   │  Product  │  │   Money   │  │  Ticket   │  │  badge +  │  │   │
//! │  │   │  Client   │  │  céntimos │  │  Book     │  │  award    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 licoreria-db (Database Layer)                   │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, Sale, PaymentMethod, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ticket`] - Tickets, line items, and the multi-ticket book
//! - [`points`] - The two independent loyalty point rules
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in céntimos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Derived, Not Stored**: Subtotals and totals are computed on read,
//!    so they can never drift from their inputs
//!
//! ## Example Usage
//!
//! ```rust
//! use licoreria_core::money::Money;
//! use licoreria_core::ticket::TicketBook;
//! # use licoreria_core::types::Product;
//! # use chrono::Utc;
//! # let cusquena = Product {
//! #     id: "p-1".into(), barcode: None,
//! #     description: "Cerveza Cusqueña 620ml".into(),
//! #     retail_price_cents: 350, wholesale_price_cents: 300,
//! #     points_per_unit: 1, stock: 48, category: None, is_active: true,
//! #     created_at: Utc::now(), updated_at: Utc::now(),
//! # };
//!
//! let mut book = TicketBook::new();
//! book.active_mut().add_item(&cusquena, false).unwrap();
//! book.active_mut().add_item(&cusquena, false).unwrap();
//!
//! // Same product + same tier merged into one line
//! assert_eq!(book.active().item_count(), 1);
//! assert_eq!(book.active().total(), Money::from_cents(700));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod points;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use licoreria_core::Money` instead of
// `use licoreria_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use ticket::{Ticket, TicketBook, TicketItem, TicketTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single ticket
///
/// ## Business Reason
/// Prevents runaway tickets and ensures reasonable transaction sizes.
pub const MAX_TICKET_ITEMS: usize = 100;

/// Maximum quantity of a single line in a ticket
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
