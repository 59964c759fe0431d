//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    S/ 10.00 / 3 = S/ 3.33 (×3 = S/ 9.99)  → Lost S/ 0.01!              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Céntimos                                         │
//! │    1000 céntimos / 3 = 333 céntimos (×3 = 999 céntimos)                │
//! │    We KNOW we lost one céntimo, and handle it explicitly               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use licoreria_core::money::Money;
//!
//! // Create from céntimos (preferred)
//! let price = Money::from_cents(1250); // S/ 12.50
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // S/ 25.00
//! let total = price + Money::from_cents(350);   // S/ 16.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(12.50); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in céntimos (1/100 of a Peruvian sol).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.retail_price_cents ──┬──► TicketItem.unit_price_cents          │
/// │  Product.wholesale_price_cents┘         │                               │
/// │                                         ▼                               │
/// │  TicketItem.subtotal() ──► Ticket.subtotal() ──► Ticket.total()         │
/// │                                         │                               │
/// │                                         ▼                               │
/// │  SaleRequest.amount_received ──► Sale.change_cents                      │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from céntimos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use licoreria_core::money::Money;
    ///
    /// let price = Money::from_cents(1250); // Represents S/ 12.50
    /// assert_eq!(price.cents(), 1250);
    /// ```
    ///
    /// ## Why Céntimos?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and API all use céntimos.
    /// Only the UI converts to soles for display.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (soles and céntimos).
    ///
    /// ## Example
    /// ```rust
    /// use licoreria_core::money::Money;
    ///
    /// let price = Money::from_major_minor(12, 50); // S/ 12.50
    /// assert_eq!(price.cents(), 1250);
    ///
    /// let negative = Money::from_major_minor(-5, 50); // -S/ 5.50 (refund)
    /// assert_eq!(negative.cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -S/ 5.50, not -S/ 4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        // Handle sign: if major is negative, minor should subtract
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in céntimos (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (soles) portion, truncated toward zero.
    ///
    /// ## Example
    /// ```rust
    /// use licoreria_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1250).soles(), 12);
    /// assert_eq!(Money::from_cents(-550).soles(), -5);
    /// ```
    #[inline]
    pub const fn soles(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (céntimos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the number of *whole* soles in this amount, floored,
    /// never negative.
    ///
    /// This is the checkout loyalty rule: one point is earned per whole
    /// sol of the final total. It is intentionally independent from the
    /// per-line `points_per_unit × quantity` accumulation used for the
    /// ticket badge; the two values are reported separately.
    ///
    /// ## Example
    /// ```rust
    /// use licoreria_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1299).whole_soles(), 12);
    /// assert_eq!(Money::from_cents(99).whole_soles(), 0);
    /// assert_eq!(Money::from_cents(-500).whole_soles(), 0);
    /// ```
    #[inline]
    pub const fn whole_soles(&self) -> i64 {
        let floored = self.0.div_euclid(100);
        if floored < 0 {
            0
        } else {
            floored
        }
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use licoreria_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(350); // S/ 3.50
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 700); // S/ 7.00
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Cerveza Cusqueña S/ 3.50
    /// Quantity: 2
    ///      │
    ///      ▼
    /// multiply_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: S/ 7.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Subtracts `other` but never goes below zero.
    ///
    /// This models the ticket-total rule: a discount larger than the
    /// items subtotal clamps the total to S/ 0.00, never negative.
    ///
    /// ## Example
    /// ```rust
    /// use licoreria_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(2000);
    /// let discount = Money::from_cents(2500);
    /// assert_eq!(subtotal.saturating_discount(discount), Money::zero());
    /// ```
    #[inline]
    pub const fn saturating_discount(&self, other: Money) -> Self {
        let result = self.0 - other.0;
        if result < 0 {
            Money(0)
        } else {
            Money(result)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and receipts. Use frontend formatting for actual
/// UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}S/ {}.{:02}", sign, self.soles().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sum of an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1250);
        assert_eq!(money.cents(), 1250);
        assert_eq!(money.soles(), 12);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(12, 50);
        assert_eq!(money.cents(), 1250);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1250)), "S/ 12.50");
        assert_eq!(format!("{}", Money::from_cents(500)), "S/ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-S/ 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "S/ 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_whole_soles() {
        assert_eq!(Money::from_cents(1299).whole_soles(), 12);
        assert_eq!(Money::from_cents(1200).whole_soles(), 12);
        assert_eq!(Money::from_cents(99).whole_soles(), 0);
        assert_eq!(Money::from_cents(0).whole_soles(), 0);
        // Negative amounts never produce negative points
        assert_eq!(Money::from_cents(-1).whole_soles(), 0);
    }

    #[test]
    fn test_saturating_discount() {
        let subtotal = Money::from_cents(2000);
        assert_eq!(
            subtotal.saturating_discount(Money::from_cents(500)).cents(),
            1500
        );
        // Discount larger than the subtotal clamps to zero, never negative
        assert_eq!(
            subtotal.saturating_discount(Money::from_cents(2500)),
            Money::zero()
        );
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(350);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.cents(), 700);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 400);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
