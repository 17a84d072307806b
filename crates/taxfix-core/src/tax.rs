use crate::error::TaxfixError;
use crate::model::TaxRate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest difference still considered equal when comparing amounts.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round to whole cents, halves away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `a` and `b` differ by at most one cent.
pub fn within_cent(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b).is_some_and(|diff| diff.abs() <= CENT)
}

pub(crate) fn overflow(what: &str) -> TaxfixError {
    TaxfixError::AmountOverflow(what.to_string())
}

/// Tax on a pre-tax amount: `round(base * rate, 2)`.
pub fn forward_tax(base: Decimal, rate: TaxRate) -> Result<Decimal, TaxfixError> {
    base.checked_mul(rate.value())
        .map(round_cents)
        .ok_or_else(|| overflow("subtotal * rate"))
}

/// Split a tax-inclusive total into `(base, tax)`.
///
/// `base = round(total / (1 + rate), 2)` and the tax is the residual
/// `round(total - base, 2)`, so `base + tax` always reproduces the total
/// to the cent. A rate close to -1 can push the base past the decimal
/// range, which is reported as [`TaxfixError::AmountOverflow`].
pub fn decompose(total: Decimal, tax_rate: Decimal) -> Result<(Decimal, Decimal), TaxfixError> {
    let rate = TaxRate::new(tax_rate)?;
    decompose_with(total, rate)
}

/// Same as [`decompose`] for an already validated rate.
pub fn decompose_with(total: Decimal, rate: TaxRate) -> Result<(Decimal, Decimal), TaxfixError> {
    let divisor = Decimal::ONE
        .checked_add(rate.value())
        .ok_or_else(|| overflow("1 + rate"))?;
    let base = total
        .checked_div(divisor)
        .map(round_cents)
        .ok_or_else(|| overflow("total / (1 + rate)"))?;
    let tax = total
        .checked_sub(base)
        .map(round_cents)
        .ok_or_else(|| overflow("total - base"))?;
    Ok((base, tax))
}
