use crate::error::TaxfixError;
use crate::model::CurrencyToken;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// `$` + digits, optional `.digits`. The second group captures characters
/// glued onto the number that make the token malformed (`$12abc`, `$1.2.3`).
static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([0-9]+(?:\.[0-9]+)?)((?:\.[0-9]|[A-Za-z0-9_])[A-Za-z0-9_.]*)?")
        .expect("currency pattern is valid")
});

/// Largest amount accepted from text: $1,000,000,000,000,000 (1e15).
///
/// Anything above is reported as malformed, which keeps every sum, product
/// and difference of extracted amounts well inside the decimal range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Lazily scan `text` for dollar amounts, left to right.
///
/// A malformed match yields an `Err` for that token only; scanning goes on.
pub fn currency_tokens(
    text: &str,
) -> impl Iterator<Item = Result<CurrencyToken, TaxfixError>> + '_ {
    CURRENCY
        .captures_iter(text)
        .map(move |caps| token_from_captures(text, &caps))
}

/// Collect every well-formed token. Malformed ones are logged and skipped.
pub fn collect_tokens(text: &str) -> Vec<CurrencyToken> {
    currency_tokens(text)
        .filter_map(|res| match res {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("skipping amount: {e}");
                None
            }
        })
        .collect()
}

/// Like [`collect_tokens`] but fails when nothing was found.
pub fn require_tokens(text: &str) -> Result<Vec<CurrencyToken>, TaxfixError> {
    let tokens = collect_tokens(text);
    if tokens.is_empty() {
        return Err(TaxfixError::NoAmountsFound);
    }
    Ok(tokens)
}

fn token_from_captures(text: &str, caps: &Captures<'_>) -> Result<CurrencyToken, TaxfixError> {
    let whole = caps.get(0).expect("group 0 always participates");
    if let Some(garbage) = caps.get(2) {
        return Err(TaxfixError::MalformedAmount {
            text: whole.as_str().to_string(),
            offset: whole.start(),
            reason: format!("unexpected trailing '{}'", garbage.as_str()),
        });
    }

    let digits = &caps[1];
    let value = Decimal::from_str(digits).map_err(|e| TaxfixError::MalformedAmount {
        text: whole.as_str().to_string(),
        offset: whole.start(),
        reason: e.to_string(),
    })?;
    if value > MAX_AMOUNT {
        return Err(TaxfixError::MalformedAmount {
            text: whole.as_str().to_string(),
            offset: whole.start(),
            reason: format!("amount too large (limit {MAX_AMOUNT})"),
        });
    }

    // Layout output may pad inside the parentheses: `( $0.00 )`.
    let parenthesized = text[..whole.start()]
        .trim_end_matches([' ', '\t'])
        .ends_with('(')
        && text[whole.end()..]
            .trim_start_matches([' ', '\t'])
            .starts_with(')');

    Ok(CurrencyToken {
        value,
        raw: whole.as_str().to_string(),
        span: whole.range(),
        parenthesized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn values(text: &str) -> Vec<Decimal> {
        collect_tokens(text).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_integer_and_decimal_amounts() {
        assert_eq!(values("pay $5 or $12.50"), vec![dec!(5), dec!(12.50)]);
    }

    #[test]
    fn test_order_preserved() {
        let text = "MONTHLY COST 1.00 $200.00 SUBTOTAL $400.00 TAX $35.50";
        let tokens = collect_tokens(text);
        assert_eq!(
            tokens.iter().map(|t| t.value).collect::<Vec<_>>(),
            vec![dec!(200.00), dec!(400.00), dec!(35.50)]
        );
        assert!(tokens.windows(2).all(|w| w[0].span.end <= w[1].span.start));
    }

    #[test]
    fn test_span_points_at_raw_text() {
        let text = "TOTAL $435.50";
        let token = &collect_tokens(text)[0];
        assert_eq!(&text[token.span.clone()], "$435.50");
        assert_eq!(token.raw, "$435.50");
    }

    #[test]
    fn test_no_thousands_separator_or_bare_numbers() {
        // "1.00" has no dollar sign; "$1,200.00" stops at the comma.
        assert_eq!(values("QTY 1.00 price $1,200.00"), vec![dec!(1)]);
    }

    #[test]
    fn test_other_currency_symbols_ignored() {
        assert!(values("€10.00 £5 ¥300").is_empty());
    }

    #[test]
    fn test_parenthesized_amount_flagged_not_negated() {
        let tokens = collect_tokens("AMOUNT PAID ($12.00)");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].parenthesized);
        assert_eq!(tokens[0].value, dec!(12.00));
    }

    #[test]
    fn test_parenthesized_with_inner_padding() {
        let tokens = collect_tokens("PAID ( $0.00 ) ($5.00 ) (\t$7.00)");
        assert!(tokens.iter().all(|t| t.parenthesized));
        assert!(!collect_tokens("( note ) $3.00")[0].parenthesized);
        assert!(!collect_tokens("(\n$3.00)")[0].parenthesized);
    }

    #[test]
    fn test_amount_cap() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert_eq!(values("$1000000000000000.00"), vec![MAX_AMOUNT]);
        let results: Vec<_> = currency_tokens("$1000000000000000.01").collect();
        assert!(matches!(
            results[0],
            Err(TaxfixError::MalformedAmount { ref reason, .. }) if reason.starts_with("amount too large")
        ));
    }

    #[test]
    fn test_trailing_period_is_not_part_of_amount() {
        assert_eq!(values("The total is $435.50."), vec![dec!(435.50)]);
    }

    #[test]
    fn test_malformed_token_does_not_abort_sequence() {
        let results: Vec<_> = currency_tokens("$10.00 $12abc $1.2.3 $7").collect();
        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(TaxfixError::MalformedAmount { offset: 7, .. })
        ));
        assert!(results[2].is_err());
        assert_eq!(results[3].as_ref().unwrap().value, dec!(7));
    }

    #[test]
    fn test_overflowing_amount_is_malformed() {
        let text = format!("${}", "9".repeat(40));
        let results: Vec<_> = currency_tokens(&text).collect();
        assert!(matches!(results[0], Err(TaxfixError::MalformedAmount { .. })));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(currency_tokens("").count(), 0);
        assert!(matches!(require_tokens(""), Err(TaxfixError::NoAmountsFound)));
    }

    #[test]
    fn test_require_tokens_skips_malformed() {
        assert!(matches!(
            require_tokens("$12abc"),
            Err(TaxfixError::NoAmountsFound)
        ));
        assert_eq!(require_tokens("$12abc $3").unwrap().len(), 1);
    }
}
