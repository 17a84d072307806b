use crate::error::TaxfixError;
use crate::model::{Field, InvoiceAmounts, TaxRate};
use crate::reconcile::outcome::Derivation;
use crate::tax::{forward_tax, overflow};
use rust_decimal::Decimal;

/// Fill zero fields from the others, in fixed order: subtotal, tax, total,
/// amount due. Non-zero fields are never touched.
///
/// Fails only with [`TaxfixError::AmountOverflow`] when a derived value
/// would leave the decimal range.
pub fn derive(amounts: &mut InvoiceAmounts, rate: TaxRate) -> Result<Vec<Derivation>, TaxfixError> {
    let mut derived = Vec::new();

    if amounts.subtotal.is_zero() && !amounts.line_items.is_empty() {
        let subtotal = amounts
            .line_item_sum()
            .ok_or_else(|| overflow("sum(line items)"))?;
        fill(amounts, Field::Subtotal, subtotal, "sum(line items)", &mut derived);
    }

    if amounts.tax.is_zero() && amounts.subtotal > Decimal::ZERO {
        let tax = forward_tax(amounts.subtotal, rate)?;
        fill(amounts, Field::Tax, tax, "round(subtotal * rate, 2)", &mut derived);
    }

    if amounts.total.is_zero() {
        let total = amounts
            .subtotal
            .checked_add(amounts.tax)
            .ok_or_else(|| overflow("subtotal + tax"))?;
        fill(amounts, Field::Total, total, "subtotal + tax", &mut derived);
    }

    if amounts.amount_due.is_zero() {
        let due = amounts
            .total
            .checked_sub(amounts.amount_paid)
            .ok_or_else(|| overflow("total - amount paid"))?;
        fill(amounts, Field::AmountDue, due, "total - amount paid", &mut derived);
    }

    Ok(derived)
}

fn fill(
    amounts: &mut InvoiceAmounts,
    field: Field,
    value: Decimal,
    rule: &str,
    derived: &mut Vec<Derivation>,
) {
    if value.is_zero() {
        return;
    }
    tracing::debug!(%field, %value, rule, "derived");
    amounts.set(field, value);
    derived.push(Derivation {
        field,
        value,
        rule: rule.to_string(),
    });
}
