//! # Licorería Register - Checkout Orchestration
//!
//! The register crate ties the pure ticket logic to persistence: it
//! owns the live multi-ticket state, exposes the item-mutation flows,
//! and drives a finalized ticket through the Sales and Clients
//! collaborators.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      licoreria-register crate                           │
//! │                                                                         │
//! │  ┌──────────────┐      ┌──────────────────────────────────────┐        │
//! │  │  TicketState │◄─────┤         Register<S, C>               │        │
//! │  │ (Arc<Mutex<  │      │                                      │        │
//! │  │ TicketBook>>)│      │  ticket workflow / item mutation     │        │
//! │  └──────────────┘      │  complete_sale() orchestration       │        │
//! │                        └──────┬───────────────────┬───────────┘        │
//! │                               │                   │                    │
//! │                     SalesService trait   ClientDirectory trait         │
//! │                               │                   │                    │
//! │                     DbSalesService        DbClientDirectory            │
//! │                               └───────┬───────────┘                    │
//! │                                       ▼                                │
//! │                              licoreria-db (SQLite)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - There is always exactly one active ticket; closing the last one
//!   opens a fresh empty replacement
//! - Checkout either fully succeeds (sale persisted, ticket closed) or
//!   leaves the ticket open and unchanged
//! - Overlapping checkout submissions fail fast instead of double-selling

pub mod adapters;
pub mod checkout;
pub mod error;
pub mod service;
pub mod state;

pub use adapters::{DbClientDirectory, DbSalesService};
pub use checkout::{CheckoutRequest, Receipt, Register};
pub use error::{RegisterError, RegisterResult};
pub use service::{ClientDirectory, SalesService, ServiceError};
pub use state::TicketState;
