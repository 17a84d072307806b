pub mod labels;
pub mod positional;

use crate::error::TaxfixError;
use crate::model::{CurrencyToken, InvoiceAmounts};
use crate::profiles::schema::ProfileDef;
use labels::{amounts_from_captures, Capture, LabelMatcher};
use positional::{classify_positional, DEFAULT_LAYOUT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How amounts are assigned to roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Labels first, positions only if no label matched anything.
    #[default]
    Auto,
    Labels,
    Positional,
}

impl FromStr for Strategy {
    type Err = TaxfixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "labels" | "label" => Ok(Strategy::Labels),
            "positional" | "position" => Ok(Strategy::Positional),
            other => Err(TaxfixError::InvalidStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Auto => write!(f, "auto"),
            Strategy::Labels => write!(f, "labels"),
            Strategy::Positional => write!(f, "positional"),
        }
    }
}

/// Amounts assigned to roles, plus how they were found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// `Labels` or `Positional`; never `Auto`.
    pub strategy: Strategy,
    pub amounts: InvoiceAmounts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<Capture>,
}

/// Assign `tokens` found in `text` to invoice roles.
pub fn classify(
    text: &str,
    tokens: &[CurrencyToken],
    profile: &ProfileDef,
    strategy: Strategy,
) -> Result<Classification, TaxfixError> {
    match strategy {
        Strategy::Labels => by_labels(text, tokens, profile),
        Strategy::Positional => by_position(tokens, profile),
        Strategy::Auto => {
            let result = by_labels(text, tokens, profile)?;
            if result.captures.is_empty() && profile.positional.is_some() {
                tracing::info!(
                    profile = %profile.name,
                    "no labels matched, falling back to positional matching"
                );
                return by_position(tokens, profile);
            }
            Ok(result)
        }
    }
}

fn by_labels(
    text: &str,
    tokens: &[CurrencyToken],
    profile: &ProfileDef,
) -> Result<Classification, TaxfixError> {
    let matcher = LabelMatcher::from_profile(profile)?;
    if matcher.is_empty() {
        tracing::warn!(profile = %profile.name, "profile has no labels");
    }
    let captures = matcher.captures(text, tokens);
    Ok(Classification {
        strategy: Strategy::Labels,
        amounts: amounts_from_captures(&captures),
        captures,
    })
}

fn by_position(
    tokens: &[CurrencyToken],
    profile: &ProfileDef,
) -> Result<Classification, TaxfixError> {
    let layout = profile.positional.as_deref().unwrap_or(&DEFAULT_LAYOUT);
    Ok(Classification {
        strategy: Strategy::Positional,
        amounts: classify_positional(tokens, layout)?,
        captures: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::collect_tokens;
    use crate::profiles::builtin::load_preset;
    use crate::profiles::parse_profile_str;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Labels".parse::<Strategy>().unwrap(), Strategy::Labels);
        assert_eq!("positional".parse::<Strategy>().unwrap(), Strategy::Positional);
    }

    #[test]
    fn test_unknown_strategy_message() {
        let err = "guess".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, TaxfixError::InvalidStrategy(ref s) if s == "guess"));
        assert_eq!(
            err.to_string(),
            "unknown strategy 'guess' (expected auto, labels or positional)"
        );
    }

    #[test]
    fn test_auto_prefers_labels() {
        let profile = load_preset("nyc-service").unwrap();
        let text = "SUBTOTAL $400.00 TAX $35.50";
        let result = classify(text, &collect_tokens(text), &profile, Strategy::Auto).unwrap();
        assert_eq!(result.strategy, Strategy::Labels);
        assert_eq!(result.captures.len(), 2);
    }

    #[test]
    fn test_auto_falls_back_to_positions() {
        let profile = load_preset("nyc-service").unwrap();
        let text = "$200.00 $200.00 $400.00 $35.50 $0.00 $435.50";
        let result = classify(text, &collect_tokens(text), &profile, Strategy::Auto).unwrap();
        assert_eq!(result.strategy, Strategy::Positional);
        assert_eq!(result.amounts.amount_due, dec!(435.50));
    }

    #[test]
    fn test_auto_without_layout_returns_empty_label_result() {
        let profile = load_preset("generic").unwrap();
        let text = "$1.00 $2.00";
        let result = classify(text, &collect_tokens(text), &profile, Strategy::Auto).unwrap();
        assert_eq!(result.strategy, Strategy::Labels);
        assert!(result.amounts.is_empty());
    }

    #[test]
    fn test_forced_positional_uses_default_layout() {
        let profile = parse_profile_str(
            r#"{ "name": "L", "version": "1", "tax_rate": "0.1",
                 "labels": [{ "label": "TOTAL", "role": "total" }] }"#,
        )
        .unwrap();
        let text = "$1 $2";
        let err = classify(text, &collect_tokens(text), &profile, Strategy::Positional)
            .unwrap_err();
        assert!(matches!(
            err,
            TaxfixError::UnexpectedTokenCount {
                expected: 6,
                found: 2
            }
        ));
    }
}
