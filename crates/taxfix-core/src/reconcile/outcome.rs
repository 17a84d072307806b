use crate::classify::labels::Capture;
use crate::classify::Strategy;
use crate::model::{Field, InvoiceAmounts, TaxRate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A field that was zero and got filled from the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub field: Field,
    pub value: Decimal,
    /// The formula applied, e.g. "round(subtotal * rate, 2)".
    pub rule: String,
}

/// An invariant that does not hold within one cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub field: Field,
    pub expected: Decimal,
    pub actual: Decimal,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Full outcome of reconciling one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconciliation {
    pub profile_name: String,
    pub tax_rate: TaxRate,
    pub strategy: Strategy,
    /// Amounts as found in the text, before derivation.
    pub extracted: InvoiceAmounts,
    /// Amounts after zero fields were derived.
    pub amounts: InvoiceAmounts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<Capture>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivations: Vec<Derivation>,
    pub discrepancies: Vec<Discrepancy>,
}

impl Reconciliation {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}
