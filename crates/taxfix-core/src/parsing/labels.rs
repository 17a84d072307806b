use crate::error::TaxfixError;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Compile a label such as "AMOUNT DUE" into a case-insensitive,
/// word-bounded pattern that accepts any whitespace run (newlines included)
/// between its words.
pub fn label_pattern(label: &str) -> Result<Regex, TaxfixError> {
    let words: Vec<String> = label.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return Err(TaxfixError::ProfileInvalid("label must not be empty".into()));
    }

    // Word boundaries only make sense next to word characters.
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let trimmed = label.trim();
    let lead = if trimmed.starts_with(is_word) { r"\b" } else { "" };
    let tail = if trimmed.ends_with(is_word) { r"\b" } else { "" };

    let body = words.join(r"\s+");
    RegexBuilder::new(&format!("{lead}{body}{tail}"))
        .case_insensitive(true)
        .build()
        .map_err(|e| TaxfixError::ProfileInvalid(format!("bad label '{label}': {e}")))
}

/// Byte ranges of every occurrence of `pattern` in `text`.
pub fn find_label(pattern: &Regex, text: &str) -> Vec<Range<usize>> {
    pattern.find_iter(text).map(|m| m.range()).collect()
}
