use crate::model::CurrencyToken;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The n-th dollar amount of two documents side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPair {
    pub index: usize,
    pub left: Option<Decimal>,
    pub right: Option<Decimal>,
}

impl AmountPair {
    pub fn changed(&self) -> bool {
        self.left != self.right
    }
}

/// Pair the amounts of two documents by position.
pub fn compare_amounts(left: &[CurrencyToken], right: &[CurrencyToken]) -> Vec<AmountPair> {
    (0..left.len().max(right.len()))
        .map(|index| AmountPair {
            index,
            left: left.get(index).map(|t| t.value),
            right: right.get(index).map(|t| t.value),
        })
        .collect()
}
