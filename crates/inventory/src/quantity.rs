//! Quantity input handling.
//!
//! Quantities arrive from forms and scanners as loosely-typed values. Anything
//! that carries no number at all (text, booleans, null, a missing field) is read
//! as 0; a number that is present must be a non-negative whole value.

use serde::{Deserialize, Serialize};

use stocktag_core::{DomainError, DomainResult};

/// Raw quantity as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl Default for QuantityInput {
    fn default() -> Self {
        QuantityInput::Integer(0)
    }
}

impl QuantityInput {
    /// Resolve to a validated quantity.
    pub fn resolve(&self) -> DomainResult<i64> {
        match self {
            QuantityInput::Integer(n) => validate_quantity(*n),
            QuantityInput::Float(f) => {
                if !f.is_finite() || f.fract() != 0.0 || *f > i64::MAX as f64 {
                    return Err(DomainError::validation("quantity must be a whole number"));
                }
                validate_quantity(*f as i64)
            }
            QuantityInput::Text(s) => coerce_quantity(s),
            QuantityInput::Other(_) => Ok(0),
        }
    }
}

impl From<i64> for QuantityInput {
    fn from(value: i64) -> Self {
        QuantityInput::Integer(value)
    }
}

/// Reject negative quantities.
pub fn validate_quantity(quantity: i64) -> DomainResult<i64> {
    if quantity < 0 {
        return Err(DomainError::validation(format!(
            "quantity cannot be negative (got {quantity})"
        )));
    }
    Ok(quantity)
}

/// Leniently read a quantity from free text.
///
/// Reads an optional sign followed by leading digits (`"12 units"` is 12).
/// Text without leading digits coerces to 0.
pub fn coerce_quantity(raw: &str) -> DomainResult<i64> {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return Ok(0);
    }

    let value: i64 = digits
        .parse()
        .map_err(|_| DomainError::validation(format!("quantity '{s}' is out of range")))?;

    if negative {
        validate_quantity(-value)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_text_coerces_to_zero() {
        assert_eq!(coerce_quantity("").unwrap(), 0);
        assert_eq!(coerce_quantity("lots").unwrap(), 0);
        assert_eq!(coerce_quantity("  ").unwrap(), 0);
    }

    #[test]
    fn leading_digits_are_honoured() {
        assert_eq!(coerce_quantity("12").unwrap(), 12);
        assert_eq!(coerce_quantity(" 7 units").unwrap(), 7);
        assert_eq!(coerce_quantity("3.9").unwrap(), 3);
        assert_eq!(coerce_quantity("+4").unwrap(), 4);
        assert_eq!(coerce_quantity("-0").unwrap(), 0);
    }

    #[test]
    fn negative_text_is_rejected() {
        assert!(matches!(coerce_quantity("-3"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn overflow_is_rejected() {
        assert!(matches!(
            coerce_quantity("99999999999999999999999"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn json_inputs_resolve() {
        let n: QuantityInput = serde_json::from_str("5").unwrap();
        assert_eq!(n.resolve().unwrap(), 5);

        let whole: QuantityInput = serde_json::from_str("5.0").unwrap();
        assert_eq!(whole.resolve().unwrap(), 5);

        let frac: QuantityInput = serde_json::from_str("2.5").unwrap();
        assert!(matches!(frac.resolve(), Err(DomainError::Validation(_))));

        let neg: QuantityInput = serde_json::from_str("-1").unwrap();
        assert!(matches!(neg.resolve(), Err(DomainError::Validation(_))));

        let text: QuantityInput = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(text.resolve().unwrap(), 0);

        for raw in ["true", "null", "[1, 2]", "{\"n\": 3}"] {
            let other: QuantityInput = serde_json::from_str(raw).unwrap();
            assert_eq!(other.resolve().unwrap(), 0, "{raw}");
        }
    }
}
