use crate::error::TaxfixError;
use crate::model::{CurrencyToken, InvoiceAmounts, Role};
use crate::parsing::labels::{find_label, label_pattern};
use crate::profiles::schema::{ProfileDef, ValueSide};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A dollar amount claimed by a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub role: Role,
    pub label: String,
    pub amount: Decimal,
    pub raw: String,
    pub offset: usize,
}

struct CompiledLabel {
    label: String,
    role: Role,
    side: ValueSide,
    pattern: Regex,
}

struct Occurrence {
    label_idx: usize,
    range: Range<usize>,
}

/// Label set of a profile, compiled once per document.
pub struct LabelMatcher {
    labels: Vec<CompiledLabel>,
    max_gap: usize,
}

impl LabelMatcher {
    pub fn from_profile(profile: &ProfileDef) -> Result<Self, TaxfixError> {
        let labels = profile
            .labels
            .iter()
            .map(|def| {
                Ok(CompiledLabel {
                    label: def.label.clone(),
                    role: def.role,
                    side: def.value_side,
                    pattern: label_pattern(&def.label)?,
                })
            })
            .collect::<Result<Vec<_>, TaxfixError>>()?;

        Ok(LabelMatcher {
            labels,
            max_gap: profile.max_gap,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Find the amount next to every label occurrence in `text`.
    ///
    /// A label only claims the nearest token on its value side, and only when
    /// no other label sits in between and the gap is at most `max_gap` bytes.
    /// Captures come back in document order of the claimed amount.
    pub fn captures(&self, text: &str, tokens: &[CurrencyToken]) -> Vec<Capture> {
        let occurrences: Vec<Occurrence> = self
            .labels
            .iter()
            .enumerate()
            .flat_map(|(label_idx, l)| {
                find_label(&l.pattern, text)
                    .into_iter()
                    .map(move |range| Occurrence { label_idx, range })
            })
            .collect();

        let mut captures: Vec<Capture> = occurrences
            .iter()
            .filter_map(|occ| {
                let label = &self.labels[occ.label_idx];
                let token = self.adjacent_token(occ, label.side, tokens, &occurrences)?;
                tracing::debug!(
                    label = %label.label,
                    role = %label.role,
                    amount = %token.raw,
                    "label matched"
                );
                Some(Capture {
                    role: label.role,
                    label: label.label.clone(),
                    amount: token.value,
                    raw: token.raw.clone(),
                    offset: token.span.start,
                })
            })
            .collect();

        captures.sort_by_key(|c| c.offset);
        captures.dedup_by(|a, b| a.offset == b.offset && a.role == b.role);
        captures
    }

    fn adjacent_token<'t>(
        &self,
        occ: &Occurrence,
        side: ValueSide,
        tokens: &'t [CurrencyToken],
        occurrences: &[Occurrence],
    ) -> Option<&'t CurrencyToken> {
        // The byte window between the label and its candidate value.
        let (token, window) = match side {
            ValueSide::After => {
                let t = tokens.iter().find(|t| t.span.start >= occ.range.end)?;
                (t, occ.range.end..t.span.start)
            }
            ValueSide::Before => {
                let t = tokens.iter().rev().find(|t| t.span.end <= occ.range.start)?;
                (t, t.span.end..occ.range.start)
            }
        };

        if window.len() > self.max_gap {
            return None;
        }

        let blocked = occurrences.iter().any(|o| {
            o.range != occ.range && o.range.start >= window.start && o.range.end <= window.end
        });
        if blocked {
            return None;
        }

        Some(token)
    }
}

/// Build amounts from label captures: line items in document order, and
/// the first capture for every other role.
pub fn amounts_from_captures(captures: &[Capture]) -> InvoiceAmounts {
    let mut amounts = InvoiceAmounts::default();
    let mut seen: Vec<Role> = Vec::new();

    for capture in captures {
        if capture.role == Role::LineItem {
            amounts.line_items.push(capture.amount);
        } else if !seen.contains(&capture.role) {
            seen.push(capture.role);
            amounts.assign(capture.role, capture.amount);
        } else {
            tracing::debug!(
                role = %capture.role,
                amount = %capture.raw,
                "role already filled, ignoring later match"
            );
        }
    }

    amounts
}
