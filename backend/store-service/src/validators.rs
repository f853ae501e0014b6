/// Business validation shared by the services
use crate::error::{AppError, Result};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::hash::Hash;

/// Fractional digits stored for money columns
pub const MONEY_SCALE: u32 = 2;
/// Integer digits that fit a NUMERIC(10,2) column
const MONEY_INTEGER_DIGITS: u32 = 8;

/// Check that `amount` fits a NUMERIC(10,2) column
pub fn check_money(field: &str, amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::Validation(format!("{} must not be negative", field)));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::Validation(format!(
            "{} must have at most {} decimal places",
            field, MONEY_SCALE
        )));
    }
    if amount.trunc() >= max_integer_part() {
        return Err(AppError::Validation(format!(
            "{} must have at most {} digits before the decimal point",
            field, MONEY_INTEGER_DIGITS
        )));
    }
    Ok(())
}

fn max_integer_part() -> Decimal {
    Decimal::from(10i64.pow(MONEY_INTEGER_DIGITS))
}

/// First value that appears more than once, if any
pub fn first_duplicate<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    values.into_iter().find(|value| !seen.insert(*value))
}

/// First requested id missing from `existing`, preserving request order
pub fn first_missing(requested: &[i64], existing: &[i64]) -> Option<i64> {
    let existing: HashSet<i64> = existing.iter().copied().collect();
    requested.iter().copied().find(|id| !existing.contains(id))
}
