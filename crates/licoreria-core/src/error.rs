//! # Error Types
//!
//! Domain-specific error types for licoreria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  licoreria-core errors (this file)                                     │
//! │  ├── CoreError        - Ticket/domain rule violations                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  licoreria-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  licoreria-register errors (separate crate)                            │
//! │  ├── ServiceError     - Sales/Clients collaborator failures            │
//! │  └── RegisterError    - Checkout orchestration failures                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → RegisterError → UI                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ticket id, line id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No open ticket has the given id.
    ///
    /// ## When This Occurs
    /// - Switching to a ticket that was already closed
    /// - Closing the same ticket twice (stale id from the UI)
    #[error("Ticket not found: {0}")]
    TicketNotFound(u64),

    /// No line item in the ticket has the given line id.
    ///
    /// ## When This Occurs
    /// - Adjusting/removing a line that was already removed
    /// - The UI holding a stale line id after a removal
    #[error("Line {line_id} not found in ticket {ticket_id}")]
    LineNotFound { ticket_id: u64, line_id: u64 },

    /// Ticket has exceeded the maximum allowed distinct lines.
    #[error("Ticket cannot have more than {max} items")]
    TicketTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Product cannot be sold (deactivated in the catalog).
    #[error("Product not available for sale: {0}")]
    ProductInactive(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
