//! # Register Session Repository
//!
//! One row per cash-drawer shift: opened with a counted float, closed
//! with a counted drawer. At most one session is open at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// A cash-drawer shift.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegisterSession {
    pub id: String,
    pub cashier: String,
    pub opening_cents: i64,
    pub closing_cents: Option<i64>,
    pub notes: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl RegisterSession {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Repository for register session database operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Opens a new session. Fails if one is already open.
    pub async fn open(&self, cashier: &str, opening_cents: i64) -> DbResult<RegisterSession> {
        if opening_cents < 0 {
            return Err(DbError::QueryFailed(
                "opening amount cannot be negative".to_string(),
            ));
        }
        if self.current_open().await?.is_some() {
            return Err(DbError::Conflict(
                "a register session is already open".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, cashier = %cashier, opening_cents, "Opening register session");

        sqlx::query(
            r#"
            INSERT INTO register_sessions (id, cashier, opening_cents, opened_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(cashier)
        .bind(opening_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("RegisterSession", &id))
    }

    /// Closes the session with the counted drawer amount.
    pub async fn close(
        &self,
        id: &str,
        closing_cents: i64,
        notes: Option<&str>,
    ) -> DbResult<RegisterSession> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE register_sessions
            SET closing_cents = ?1, notes = ?2, closed_at = ?3
            WHERE id = ?4 AND closed_at IS NULL
            "#,
        )
        .bind(closing_cents)
        .bind(notes)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("RegisterSession", id));
        }

        info!(id = %id, closing_cents, "Register session closed");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("RegisterSession", id))
    }

    /// Gets a session by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<RegisterSession>> {
        let session = sqlx::query_as::<_, RegisterSession>(
            r#"
            SELECT id, cashier, opening_cents, closing_cents, notes, opened_at, closed_at
            FROM register_sessions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Gets the currently open session, if any.
    pub async fn current_open(&self) -> DbResult<Option<RegisterSession>> {
        let session = sqlx::query_as::<_, RegisterSession>(
            r#"
            SELECT id, cashier, opening_cents, closing_cents, notes, opened_at, closed_at
            FROM register_sessions
            WHERE closed_at IS NULL
            ORDER BY opened_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Lists past sessions, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<RegisterSession>> {
        let sessions = sqlx::query_as::<_, RegisterSession>(
            r#"
            SELECT id, cashier, opening_cents, closing_cents, notes, opened_at, closed_at
            FROM register_sessions
            ORDER BY opened_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
