use crate::model::{Field, InvoiceAmounts, TaxRate};
use crate::reconcile::outcome::Discrepancy;
use crate::tax::{round_cents, within_cent};
use rust_decimal::Decimal;

/// Check every invariant between the amounts, within one cent.
///
/// Never fails: each broken invariant is returned as a [`Discrepancy`].
/// The subtotal check is skipped when there are no line items. Expected
/// values saturate at the decimal range limits, so an out-of-range
/// expectation is reported as a mismatch instead of aborting.
pub fn verify(amounts: &InvoiceAmounts, rate: TaxRate) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    if !amounts.line_items.is_empty() {
        let sum = amounts
            .line_items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(*item));
        check(Field::Subtotal, sum, amounts.subtotal, &mut found);
    }
    check(
        Field::Tax,
        round_cents(amounts.subtotal.saturating_mul(rate.value())),
        amounts.tax,
        &mut found,
    );
    check(
        Field::Total,
        amounts.subtotal.saturating_add(amounts.tax),
        amounts.total,
        &mut found,
    );
    check(
        Field::AmountDue,
        amounts.total.saturating_sub(amounts.amount_paid),
        amounts.amount_due,
        &mut found,
    );

    found
}

fn check(field: Field, expected: Decimal, actual: Decimal, found: &mut Vec<Discrepancy>) {
    if !within_cent(expected, actual) {
        let d = Discrepancy {
            field,
            expected,
            actual,
        };
        tracing::debug!("{d}");
        found.push(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn consistent() -> InvoiceAmounts {
        InvoiceAmounts {
            line_items: vec![dec!(200.00), dec!(200.00)],
            subtotal: dec!(400.00),
            tax: dec!(35.50),
            total: dec!(435.50),
            amount_paid: dec!(0.00),
            amount_due: dec!(435.50),
        }
    }

    #[test]
    fn test_consistent_invoice() {
        assert!(verify(&consistent(), TaxRate::NYC).is_empty());
    }

    #[test]
    fn test_one_cent_tolerance() {
        let mut amounts = consistent();
        amounts.tax = dec!(35.51);
        amounts.total = dec!(435.51);
        amounts.amount_due = dec!(435.51);
        assert!(verify(&amounts, TaxRate::NYC).is_empty());
    }

    #[test]
    fn test_baked_in_tax_reported() {
        // Line items include tax and the tax line shows $0.00.
        let amounts = InvoiceAmounts {
            line_items: vec![dec!(217.75), dec!(217.75)],
            subtotal: dec!(435.50),
            tax: dec!(0.00),
            total: dec!(435.50),
            amount_paid: dec!(0.00),
            amount_due: dec!(435.50),
        };
        let found = verify(&amounts, TaxRate::NYC);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, Field::Tax);
        assert_eq!(found[0].to_string(), "tax mismatch: expected 38.65, got 0.00");
    }

    #[test]
    fn test_subtotal_message() {
        let mut amounts = consistent();
        amounts.subtotal = dec!(390.00);
        let found = verify(&amounts, TaxRate::NYC);
        assert_eq!(
            found[0].to_string(),
            "subtotal mismatch: expected 400.00, got 390.00"
        );
    }

    #[test]
    fn test_subtotal_check_skipped_without_line_items() {
        let mut amounts = consistent();
        amounts.line_items.clear();
        assert!(verify(&amounts, TaxRate::NYC).is_empty());
    }

    #[test]
    fn test_amount_due_accounts_for_payment() {
        let mut amounts = consistent();
        amounts.amount_paid = dec!(100.00);
        let found = verify(&amounts, TaxRate::NYC);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, Field::AmountDue);
        assert_eq!(found[0].expected, dec!(335.50));
    }

    #[test]
    fn test_out_of_range_expectation_reported() {
        let amounts = InvoiceAmounts {
            subtotal: Decimal::MAX,
            tax: dec!(1.00),
            total: dec!(5.00),
            amount_due: dec!(5.00),
            ..Default::default()
        };
        let found = verify(&amounts, TaxRate::NYC);
        let fields: Vec<Field> = found.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec![Field::Tax, Field::Total]);
        assert_eq!(found[1].expected, Decimal::MAX);
    }
}
