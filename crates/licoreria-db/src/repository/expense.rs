//! # Expense Repository
//!
//! Petty-cash outflows paid from the drawer (ice, delivery fuel, a quick
//! supplier top-up). Optionally tied to the register session they were
//! paid during, so the drawer count at close can be reconciled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// A cash outflow from the drawer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    pub id: String,
    pub session_id: Option<String>,
    pub description: String,
    pub category: Option<String>,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense.
    pub async fn insert(
        &self,
        session_id: Option<&str>,
        description: &str,
        category: Option<&str>,
        amount_cents: i64,
    ) -> DbResult<Expense> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DbError::QueryFailed(
                "expense description is required".to_string(),
            ));
        }
        if amount_cents <= 0 {
            return Err(DbError::QueryFailed(
                "expense amount must be positive".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, amount_cents, "Recording expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (id, session_id, description, category, amount_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(session_id)
        .bind(description)
        .bind(category)
        .bind(amount_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Expense", &id))
    }

    /// Gets an expense by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, session_id, description, category, amount_cents, created_at
            FROM expenses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists expenses for a session, newest first.
    pub async fn list_for_session(&self, session_id: &str) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, session_id, description, category, amount_cents, created_at
            FROM expenses
            WHERE session_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Sums the expenses charged against a session.
    pub async fn total_for_session(&self, session_id: &str) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount_cents) FROM expenses WHERE session_id = ?1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
