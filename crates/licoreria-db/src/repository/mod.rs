//! # Repository Module
//!
//! Database repository implementations for Licorería POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service handler                                                       │
//! │       │                                                                 │
//! │       │  db.products().search("cusque", 20)                            │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── search(&self, query, limit)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── adjust_stock(&self, id, delta)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, FTS search, stock
//! - [`client::ClientRepository`] - Clients and loyalty point balances
//! - [`sale::SaleRepository`] - Sales, line snapshots, split payments
//! - [`session::SessionRepository`] - Cash-register sessions
//! - [`expense::ExpenseRepository`] - Petty-cash expenses

pub mod client;
pub mod expense;
pub mod product;
pub mod sale;
pub mod session;
