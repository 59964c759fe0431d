//! # Client Repository
//!
//! Database operations for the loyalty-client directory. Clients are
//! optional at sale time; when present, the sale accumulates points on
//! their account.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use licoreria_core::validation::validate_client_name;
use licoreria_core::Client;

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Inserts a new client and returns it with the assigned row id.
    pub async fn insert(&self, name: &str, phone: Option<&str>) -> DbResult<Client> {
        validate_client_name(name).map_err(|e| DbError::QueryFailed(e.to_string()))?;
        let name = name.trim();

        debug!(name = %name, "Inserting client");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, phone, accumulated_points, created_at, updated_at)
            VALUES (?1, ?2, 0, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id.to_string()))
    }

    /// Gets a client by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, accumulated_points, created_at, updated_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Lists clients ordered by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, accumulated_points, created_at, updated_at
            FROM clients
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Searches clients by name prefix (case-insensitive LIKE).
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Client>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list(limit).await;
        }

        let pattern = format!("%{}%", query);
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, accumulated_points, created_at, updated_at
            FROM clients
            WHERE name LIKE ?1
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Updates a client's name and phone.
    pub async fn update(&self, id: i64, name: &str, phone: Option<&str>) -> DbResult<Client> {
        validate_client_name(name).map_err(|e| DbError::QueryFailed(e.to_string()))?;
        let name = name.trim();

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE clients SET name = ?1, phone = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(name)
        .bind(phone)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id.to_string()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id.to_string()))
    }

    /// Overwrites the accumulated loyalty balance.
    ///
    /// The register computes `current + earned` and writes back the
    /// absolute value rather than issuing a relative increment.
    pub async fn set_accumulated_points(&self, id: i64, points: i64) -> DbResult<()> {
        debug!(id = %id, points = %points, "Setting accumulated points");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE clients SET accumulated_points = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(points)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id.to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
