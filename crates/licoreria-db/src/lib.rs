//! # Licorería DB - SQLite Persistence Layer
//!
//! Database layer for the licorería POS, built on SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         licoreria-db crate                              │
//! │                                                                         │
//! │  ┌─────────────┐    ┌──────────────────────────────────────────┐       │
//! │  │   pool      │    │            repository/                    │       │
//! │  │             │    │                                          │       │
//! │  │ Database ───┼───►│  products()  ──► ProductRepository       │       │
//! │  │ DbConfig    │    │  clients()   ──► ClientRepository        │       │
//! │  └─────────────┘    │  sales()     ──► SaleRepository          │       │
//! │  ┌─────────────┐    │  sessions()  ──► SessionRepository       │       │
//! │  │ migrations  │    │  expenses()  ──► ExpenseRepository       │       │
//! │  │ (embedded)  │    └──────────────────────────────────────────┘       │
//! │  └─────────────┘                     │                                 │
//! │                                      ▼                                 │
//! │                            SQLite (WAL mode)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! - **Repository pattern**: one repository per aggregate, each holding a
//!   cloned handle to the shared pool
//! - **Integer céntimos**: monetary columns are INTEGER, never REAL
//! - **Snapshots**: sale lines freeze price and description at sale time
//! - **Embedded migrations**: the schema ships inside the binary and is
//!   applied on startup
//!
//! ## Usage
//! ```rust,ignore
//! use licoreria_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./licoreria.db")).await?;
//! let hits = db.products().search("cusque", 20).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::client::ClientRepository;
pub use repository::expense::{Expense, ExpenseRepository};
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::sale::{NewSale, NewSaleItem, SaleRepository};
pub use repository::session::{RegisterSession, SessionRepository};
