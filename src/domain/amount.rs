//! Balance type
//!
//! Domain primitive for resolved account balances, plus the lenient decimal
//! parser used for ledger strings (output values, payment caps).

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Errors that can occur when building a Balance
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Balance must not be negative (got {0})")]
    Negative(Decimal),
}

/// Why a ledger decimal string could not be read exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecimalParseError {
    /// Not a decimal numeral at all (empty, letters, stray characters)
    #[error("malformed decimal")]
    Malformed,

    /// A well-formed numeral with more integer digits or decimal places than
    /// a `Decimal` holds without rounding
    #[error("decimal out of exact range")]
    OutOfRange,
}

/// Largest power of ten applied for a positive exponent; any nonzero
/// mantissa overflows well before this.
const MAX_EXPONENT_STEPS: u32 = 64;

/// Returns true if `s` is `[+-]digits[.digits]` with at least one digit.
fn is_plain_numeral(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = body.split_once('.').unwrap_or((body, ""));
    !(int.is_empty() && frac.is_empty())
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a plain numeral, failing instead of rounding.
fn parse_plain_exact(s: &str) -> Result<Decimal, DecimalParseError> {
    if !is_plain_numeral(s) {
        return Err(DecimalParseError::Malformed);
    }
    // Trailing fractional zeros do not change the value
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    };
    if matches!(s, "" | "+" | "-") {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str_exact(s).map_err(|_| DecimalParseError::OutOfRange)
}

/// Parse a ledger decimal string exactly.
///
/// Plain (`"10.5"`) and scientific (`"1e3"`) notations are accepted. A value
/// a `Decimal` cannot hold without rounding is `OutOfRange`, never rounded.
pub fn parse_exact_decimal(s: &str) -> Result<Decimal, DecimalParseError> {
    let Some((mantissa, exponent)) = s.split_once(['e', 'E']) else {
        return parse_plain_exact(s);
    };
    let mut value = parse_plain_exact(mantissa)?;
    let exponent: i64 = exponent.parse().map_err(|_| DecimalParseError::Malformed)?;
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }

    if exponent >= 0 {
        let steps = u32::try_from(exponent).unwrap_or(u32::MAX).min(MAX_EXPONENT_STEPS);
        for _ in 0..steps {
            value = value
                .checked_mul(Decimal::TEN)
                .ok_or(DecimalParseError::OutOfRange)?;
        }
    } else {
        let scale = i64::from(value.scale()) - exponent;
        if scale > i64::from(Decimal::MAX_SCALE) {
            return Err(DecimalParseError::OutOfRange);
        }
        value.set_scale(scale as u32).map_err(|_| DecimalParseError::OutOfRange)?;
    }
    Ok(value)
}

/// Parse a ledger decimal string leniently.
///
/// Anything [`parse_exact_decimal`] rejects yields `None`, so callers can
/// substitute their own default.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    parse_exact_decimal(s).ok()
}

/// Balance represents a resolved account balance.
///
/// # Invariants
/// - Value is always zero or positive
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use keyledger::domain::Balance;
///
/// let balance = Balance::new(Decimal::new(155, 1)).unwrap();
/// assert_eq!(balance.value(), Decimal::new(155, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Balance(Decimal);

impl Balance {
    /// Create a new balance (zero or positive)
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Create a zero balance
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying value
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Exact sum of two balances, or `None` if it does not fit in a
    /// `Decimal` without rounding.
    pub fn checked_add(&self, other: Balance) -> Option<Balance> {
        let sum = self.0.checked_add(other.0)?;
        // Decimal addition drops fractional digits instead of overflowing
        if sum.scale() < self.0.scale().max(other.0.scale())
            && sum.checked_sub(self.0) != Some(other.0)
        {
            return None;
        }
        Some(Self(sum))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}
