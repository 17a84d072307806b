use crate::error::TaxfixError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A dollar amount found in extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyToken {
    /// Unsigned amount, never negated by extraction.
    pub value: Decimal,
    /// Matched text including the `$` sign.
    pub raw: String,
    /// Byte offsets of `raw` in the source text.
    pub span: Range<usize>,
    /// True when the source wrote the amount as `($x.yy)`. Spaces or tabs
    /// inside the parentheses are allowed, line breaks are not.
    pub parenthesized: bool,
}

impl CurrencyToken {
    /// The value as a credit: negated when parenthesized, unchanged otherwise.
    ///
    /// Extraction never applies this on its own; callers opt in.
    pub fn as_credit(&self) -> Decimal {
        if self.parenthesized {
            -self.value
        } else {
            self.value
        }
    }
}

impl fmt::Display for CurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parenthesized {
            write!(f, "({})", self.raw)
        } else {
            write!(f, "{}", self.raw)
        }
    }
}

/// Semantic role of an amount on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    LineItem,
    Subtotal,
    Tax,
    Total,
    AmountPaid,
    AmountDue,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::LineItem => write!(f, "line item"),
            Role::Subtotal => write!(f, "subtotal"),
            Role::Tax => write!(f, "tax"),
            Role::Total => write!(f, "total"),
            Role::AmountPaid => write!(f, "amount paid"),
            Role::AmountDue => write!(f, "amount due"),
        }
    }
}

/// Sales tax rate as a fraction (0.08875 for 8.875%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// NYC combined sales tax rate.
    pub const NYC: TaxRate = TaxRate(Decimal::from_parts(8875, 0, 0, false, 5));

    pub fn new(rate: Decimal) -> Result<TaxRate, TaxfixError> {
        if rate <= Decimal::NEGATIVE_ONE {
            return Err(TaxfixError::InvalidRate(rate));
        }
        Ok(TaxRate(rate))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The rate as a percentage, e.g. 8.875. `None` when the rate is too
    /// large to scale.
    pub fn percent(&self) -> Option<Decimal> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|p| p.normalize())
    }
}

impl TryFrom<Decimal> for TaxRate {
    type Error = TaxfixError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        TaxRate::new(value)
    }
}

impl From<TaxRate> for Decimal {
    fn from(rate: TaxRate) -> Decimal {
        rate.0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(percent) => write!(f, "{percent}%"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Named amount fields of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Subtotal,
    Tax,
    Total,
    AmountPaid,
    AmountDue,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Subtotal => write!(f, "subtotal"),
            Field::Tax => write!(f, "tax"),
            Field::Total => write!(f, "total"),
            Field::AmountPaid => write!(f, "amount paid"),
            Field::AmountDue => write!(f, "amount due"),
        }
    }
}

/// Amounts of a single invoice. Unassigned fields stay zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceAmounts {
    pub line_items: Vec<Decimal>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
}

impl InvoiceAmounts {
    /// Sum of the line items, `None` if it leaves the decimal range.
    pub fn line_item_sum(&self) -> Option<Decimal> {
        self.line_items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(*item))
    }

    pub fn get(&self, field: Field) -> Decimal {
        match field {
            Field::Subtotal => self.subtotal,
            Field::Tax => self.tax,
            Field::Total => self.total,
            Field::AmountPaid => self.amount_paid,
            Field::AmountDue => self.amount_due,
        }
    }

    pub fn set(&mut self, field: Field, value: Decimal) {
        match field {
            Field::Subtotal => self.subtotal = value,
            Field::Tax => self.tax = value,
            Field::Total => self.total = value,
            Field::AmountPaid => self.amount_paid = value,
            Field::AmountDue => self.amount_due = value,
        }
    }

    /// Assign a value to a role. Line items are appended.
    pub fn assign(&mut self, role: Role, value: Decimal) {
        match role {
            Role::LineItem => self.line_items.push(value),
            Role::Subtotal => self.subtotal = value,
            Role::Tax => self.tax = value,
            Role::Total => self.total = value,
            Role::AmountPaid => self.amount_paid = value,
            Role::AmountDue => self.amount_due = value,
        }
    }

    /// Tax as a fraction of the subtotal, as it actually appears on the invoice.
    pub fn effective_rate(&self) -> Option<Decimal> {
        self.tax.checked_div(self.subtotal)
    }

    pub fn is_empty(&self) -> bool {
        *self == InvoiceAmounts::default()
    }
}
