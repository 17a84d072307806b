use crate::model::{Role, TaxRate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_GAP: usize = 64;

/// Configuration for one family of invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Sales tax rate as a fraction, written as a string for exact decimals.
    pub tax_rate: TaxRate,
    /// Largest number of characters allowed between a label and its value.
    #[serde(default = "default_max_gap")]
    pub max_gap: usize,
    #[serde(default)]
    pub labels: Vec<LabelDef>,
    /// Role of each dollar amount by position, for documents without labels.
    #[serde(default)]
    pub positional: Option<Vec<Role>>,
}

/// A label whose adjacent dollar amount fills a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDef {
    pub label: String,
    pub role: Role,
    #[serde(default)]
    pub value_side: ValueSide,
    #[serde(default)]
    pub note: Option<String>,
}

/// Where the value sits relative to its label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSide {
    #[default]
    After,
    Before,
}

fn default_max_gap() -> usize {
    DEFAULT_MAX_GAP
}
