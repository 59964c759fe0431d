//! # Register State
//!
//! Shared ownership of the live [`TicketBook`]. Handlers run on
//! different tasks but the book itself is pure synchronous logic, so a
//! plain mutex around it is enough; every access goes through the
//! closure helpers and holds the lock only for the duration of the
//! closure.

use std::sync::{Arc, Mutex};

use licoreria_core::TicketBook;

/// Thread-safe handle to the open tickets of one register.
///
/// Cloning is cheap and all clones observe the same book.
#[derive(Debug, Clone)]
pub struct TicketState {
    book: Arc<Mutex<TicketBook>>,
}

impl TicketState {
    /// Creates state with a fresh book (one empty active ticket).
    pub fn new() -> Self {
        TicketState {
            book: Arc::new(Mutex::new(TicketBook::new())),
        }
    }

    /// Runs a closure with read access to the book.
    pub fn with_book<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&TicketBook) -> R,
    {
        let book = self
            .book
            .lock()
            .expect("ticket book mutex poisoned");
        f(&book)
    }

    /// Runs a closure with mutable access to the book.
    pub fn with_book_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut TicketBook) -> R,
    {
        let mut book = self
            .book
            .lock()
            .expect("ticket book mutex poisoned");
        f(&mut book)
    }
}

impl Default for TicketState {
    fn default() -> Self {
        TicketState::new()
    }
}
