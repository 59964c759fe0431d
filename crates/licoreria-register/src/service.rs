//! # Collaborator Seams
//!
//! The checkout orchestrator talks to two collaborators through traits,
//! so the register logic can be exercised against recording fakes in
//! tests and against the SQLite adapters in production.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Collaborators                             │
//! │                                                                         │
//! │  Register ──► SalesService::create(request)   ──► persists the sale    │
//! │          ──► ClientDirectory::get_by_id(id)   ──► loyalty lookup       │
//! │          ──► ClientDirectory::set_accumulated_points(id, points)       │
//! │                                                                         │
//! │  Production impls: adapters::DbSalesService / DbClientDirectory        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use licoreria_core::{Client, Sale, SaleRequest};
use thiserror::Error;

/// Failures reported by the collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The request was rejected as invalid.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The backing store failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Persists finalized sales.
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Creates a sale from the request, re-pricing lines server-side.
    async fn create(&self, request: &SaleRequest) -> Result<Sale, ServiceError>;
}

/// Loyalty-client lookup and point accumulation.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Fetches a client by id.
    async fn get_by_id(&self, id: i64) -> Result<Client, ServiceError>;

    /// Overwrites the client's accumulated point balance.
    async fn set_accumulated_points(&self, id: i64, points: i64) -> Result<(), ServiceError>;
}
