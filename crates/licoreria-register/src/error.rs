//! # Register Error Types
//!
//! Errors surfaced by the checkout orchestrator. Ticket-math failures
//! come through from the core crate; collaborator failures carry the
//! reason so the cashier UI can tell "fix the ticket" apart from "try
//! again".

use licoreria_core::CoreError;
use thiserror::Error;

use crate::service::ServiceError;

/// Errors from the register's ticket and checkout operations.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Checkout was attempted on a ticket with no items.
    #[error("cannot check out an empty ticket")]
    EmptyTicket,

    /// A checkout for this register is already in flight.
    #[error("a checkout is already in progress")]
    CheckoutInProgress,

    /// The Sales collaborator rejected or failed the sale. The ticket is
    /// left open and unchanged.
    #[error("sale creation failed: {0}")]
    SaleFailed(#[source] ServiceError),

    /// Ticket-level failure (unknown ticket, unknown line, caps).
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience alias for register results.
pub type RegisterResult<T> = Result<T, RegisterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RegisterError::EmptyTicket.to_string(),
            "cannot check out an empty ticket"
        );
        assert_eq!(
            RegisterError::CheckoutInProgress.to_string(),
            "a checkout is already in progress"
        );
    }

    #[test]
    fn test_core_error_passes_through() {
        let err: RegisterError = CoreError::TicketNotFound(7).into();
        assert!(err.to_string().contains('7'));
    }
}
