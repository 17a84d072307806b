use crate::error::TaxfixError;
use crate::model::{CurrencyToken, InvoiceAmounts, Role};

/// The six-amount layout of the NYC service invoices.
pub const DEFAULT_LAYOUT: [Role; 6] = [
    Role::LineItem,
    Role::LineItem,
    Role::Subtotal,
    Role::Tax,
    Role::AmountPaid,
    Role::AmountDue,
];

/// Assign tokens to roles by index.
///
/// Fails when there are fewer tokens than slots in the layout. Surplus
/// tokens are ignored.
pub fn classify_positional(
    tokens: &[CurrencyToken],
    layout: &[Role],
) -> Result<InvoiceAmounts, TaxfixError> {
    if tokens.len() < layout.len() {
        return Err(TaxfixError::UnexpectedTokenCount {
            expected: layout.len(),
            found: tokens.len(),
        });
    }
    if tokens.len() > layout.len() {
        tracing::warn!(
            ignored = tokens.len() - layout.len(),
            "more dollar amounts than positional slots"
        );
    }

    let mut amounts = InvoiceAmounts::default();
    for (role, token) in layout.iter().zip(tokens) {
        tracing::debug!(%role, amount = %token.raw, "assigned by position");
        amounts.assign(*role, token.value);
    }
    Ok(amounts)
}
