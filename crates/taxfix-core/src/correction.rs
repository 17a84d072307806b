//! Correction plans for invoices whose line items already include tax.
//!
//! The typical defect: each line item is billed tax-inclusive and the tax
//! line reads `$0.00`. The plan splits every line item into base and tax and
//! lists the text substitutions a PDF patcher would need. Applying them is
//! left to the caller.

use crate::error::TaxfixError;
use crate::model::{InvoiceAmounts, TaxRate};
use crate::tax::{decompose_with, overflow, CENT};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCorrection {
    pub original: Decimal,
    pub base: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
    /// The `from` text also prints another amount on the invoice, so a
    /// blind text substitution would change that one too.
    pub ambiguous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionPlan {
    pub tax_rate: TaxRate,
    pub lines: Vec<LineCorrection>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    /// Unchanged: the sum of the tax-inclusive line items.
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub replacements: Vec<Replacement>,
}

impl CorrectionPlan {
    /// The invoice as it should read after correction.
    pub fn corrected_amounts(&self) -> InvoiceAmounts {
        InvoiceAmounts {
            line_items: self.lines.iter().map(|l| l.base).collect(),
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            amount_paid: self.amount_paid,
            amount_due: self.amount_due,
        }
    }
}

/// Plan a correction when the line items carry hidden tax.
///
/// Pass the amounts as extracted, before derivation: a tax line below one
/// cent is what marks the invoice as needing a fix. Returns `Ok(None)` when
/// there are no line items or the tax is already shown separately.
pub fn plan_correction(
    extracted: &InvoiceAmounts,
    rate: TaxRate,
) -> Result<Option<CorrectionPlan>, TaxfixError> {
    if extracted.line_items.is_empty() || extracted.tax.abs() >= CENT {
        return Ok(None);
    }

    let lines = extracted
        .line_items
        .iter()
        .map(|&original| {
            let (base, tax) = decompose_with(original, rate)?;
            Ok(LineCorrection {
                original,
                base,
                tax,
            })
        })
        .collect::<Result<Vec<_>, TaxfixError>>()?;

    let subtotal = checked_sum(lines.iter().map(|l| l.base), "corrected subtotal")?;
    let tax = checked_sum(lines.iter().map(|l| l.tax), "corrected tax")?;
    let total = checked_sum(lines.iter().map(|l| l.original), "total")?;
    let amount_due = total
        .checked_sub(extracted.amount_paid)
        .ok_or_else(|| overflow("total - amount paid"))?;

    tracing::info!(%subtotal, %tax, %total, "tax is baked into line items");

    let mut plan = CorrectionPlan {
        tax_rate: rate,
        lines,
        subtotal,
        tax,
        total,
        amount_paid: extracted.amount_paid,
        amount_due,
        replacements: Vec::new(),
    };
    plan.replacements = replacements(extracted, &plan);
    Ok(Some(plan))
}

fn checked_sum(
    mut values: impl Iterator<Item = Decimal>,
    what: &str,
) -> Result<Decimal, TaxfixError> {
    values
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| overflow(what))
}

fn dollars(value: Decimal) -> String {
    format!("${:.2}", value)
}

fn replacements(extracted: &InvoiceAmounts, plan: &CorrectionPlan) -> Vec<Replacement> {
    let mut pairs: Vec<(Decimal, Decimal)> = plan.lines.iter().map(|l| (l.original, l.base)).collect();
    if !extracted.subtotal.is_zero() {
        pairs.push((extracted.subtotal, plan.subtotal));
    }
    pairs.push((extracted.tax, plan.tax));

    // Printed amounts that stay as they are.
    let kept = [
        extracted.total,
        extracted.amount_paid,
        extracted.amount_due,
    ];

    let mut out: Vec<Replacement> = Vec::new();
    for (from, to) in pairs {
        let (from, to) = (dollars(from), dollars(to));
        if from == to || out.iter().any(|r| r.from == from) {
            continue;
        }
        let ambiguous = kept.iter().any(|&k| dollars(k) == from)
            || out.iter().any(|r| r.to == from);
        out.push(Replacement {
            from,
            to,
            ambiguous,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn baked_in() -> InvoiceAmounts {
        InvoiceAmounts {
            line_items: vec![dec!(217.75), dec!(217.75)],
            subtotal: dec!(435.50),
            tax: dec!(0.00),
            total: dec!(435.50),
            amount_paid: dec!(0.00),
            amount_due: dec!(435.50),
        }
    }

    #[test]
    fn test_two_monthly_charges_with_hidden_tax() {
        let plan = plan_correction(&baked_in(), TaxRate::NYC).unwrap().unwrap();
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].base, dec!(200.00));
        assert_eq!(plan.lines[0].tax, dec!(17.75));
        assert_eq!(plan.subtotal, dec!(400.00));
        assert_eq!(plan.tax, dec!(35.50));
        assert_eq!(plan.total, dec!(435.50));
        assert_eq!(plan.amount_due, dec!(435.50));
    }

    #[test]
    fn test_corrected_amounts_reconcile() {
        let plan = plan_correction(&baked_in(), TaxRate::NYC).unwrap().unwrap();
        let fixed = plan.corrected_amounts();
        assert!(crate::reconcile::verify(&fixed, TaxRate::NYC).is_empty());
    }

    #[test]
    fn test_replacements() {
        let plan = plan_correction(&baked_in(), TaxRate::NYC).unwrap().unwrap();
        let pairs: Vec<(&str, &str)> = plan
            .replacements
            .iter()
            .map(|r| (r.from.as_str(), r.to.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("$217.75", "$200.00"),
                ("$435.50", "$400.00"),
                ("$0.00", "$35.50"),
            ]
        );
        // $435.50 is also the total; $0.00 is also the amount paid.
        assert!(!plan.replacements[0].ambiguous);
        assert!(plan.replacements[1].ambiguous);
        assert!(plan.replacements[2].ambiguous);
    }

    #[test]
    fn test_no_plan_when_tax_shown() {
        let amounts = InvoiceAmounts {
            line_items: vec![dec!(200.00), dec!(200.00)],
            subtotal: dec!(400.00),
            tax: dec!(35.50),
            total: dec!(435.50),
            ..Default::default()
        };
        assert!(plan_correction(&amounts, TaxRate::NYC).unwrap().is_none());
    }

    #[test]
    fn test_no_plan_without_line_items() {
        let amounts = InvoiceAmounts {
            total: dec!(217.75),
            ..Default::default()
        };
        assert!(plan_correction(&amounts, TaxRate::NYC).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_split_is_an_error() {
        let amounts = InvoiceAmounts {
            line_items: vec![dec!(100000000000000000000)],
            ..Default::default()
        };
        let rate = TaxRate::new(dec!(-0.9999999999)).unwrap();
        assert!(matches!(
            plan_correction(&amounts, rate),
            Err(TaxfixError::AmountOverflow(_))
        ));
    }
}
