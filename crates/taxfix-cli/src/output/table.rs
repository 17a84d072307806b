use rust_decimal::Decimal;
use taxfix_core::compare::AmountPair;
use taxfix_core::correction::CorrectionPlan;
use taxfix_core::extraction::LocatedToken;
use taxfix_core::model::{Field, InvoiceAmounts};
use taxfix_core::reconcile::Reconciliation;
use taxfix_core::tax::round_cents;

fn dollars(value: Decimal) -> String {
    let value = round_cents(value);
    if value.is_sign_negative() && !value.is_zero() {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

fn optional(value: Option<Decimal>) -> String {
    value.map(dollars).unwrap_or_else(|| "-".to_string())
}

pub fn print_tokens(tokens: &[LocatedToken]) {
    for (i, located) in tokens.iter().enumerate() {
        let position = match located.position {
            Some(ref p) => match p.bbox {
                Some(ref b) => format!(
                    "page {}, line {}  at ({:.1}, {:.1})",
                    p.page_number,
                    p.line_index + 1,
                    b.x_min,
                    b.y_min
                ),
                None => format!("page {}, line {}", p.page_number, p.line_index + 1),
            },
            None => format!("offset {}", located.token.span.start),
        };
        let credit_marker = if located.token.parenthesized {
            " (parenthesized)"
        } else {
            ""
        };
        println!(
            "  {:>3}  {:>12}  {}{}",
            i,
            dollars(located.token.value),
            position,
            credit_marker
        );
    }
}

pub fn print_reconciliation(result: &Reconciliation) {
    println!(
        "=== {} (tax {}, {} matching) ===\n",
        result.profile_name, result.tax_rate, result.strategy
    );

    print_amounts(&result.amounts, |field| {
        result.derivations.iter().any(|d| d.field == field)
    });

    let printed_percent = result
        .extracted
        .effective_rate()
        .and_then(|rate| rate.checked_mul(Decimal::ONE_HUNDRED));
    if let Some(percent) = printed_percent {
        println!(
            "\n  Tax as printed: {}% of subtotal",
            percent.round_dp(3).normalize()
        );
    }

    if !result.derivations.is_empty() {
        println!("\n  Derived:");
        for d in &result.derivations {
            println!("    {} = {}  ({})", d.field, dollars(d.value), d.rule);
        }
    }

    println!();
    if result.is_consistent() {
        println!("  OK: all amounts reconcile");
    } else {
        println!("  Discrepancies:");
        for d in &result.discrepancies {
            println!(
                "    {} mismatch: expected {}, got {}",
                d.field,
                dollars(d.expected),
                dollars(d.actual)
            );
        }
    }
}

fn print_amounts(amounts: &InvoiceAmounts, derived: impl Fn(Field) -> bool) {
    for (i, item) in amounts.line_items.iter().enumerate() {
        println!("  {:<14} {:>12}", format!("Line item {}", i + 1), dollars(*item));
    }
    for field in [
        Field::Subtotal,
        Field::Tax,
        Field::Total,
        Field::AmountPaid,
        Field::AmountDue,
    ] {
        let marker = if derived(field) { "  (derived)" } else { "" };
        println!(
            "  {:<14} {:>12}{}",
            capitalize(&field.to_string()),
            dollars(amounts.get(field)),
            marker
        );
    }
}

pub fn print_plan(plan: &CorrectionPlan) {
    println!("=== Tax included in line items (rate {}) ===\n", plan.tax_rate);

    for (i, line) in plan.lines.iter().enumerate() {
        println!(
            "  Line item {}   {:>12} -> base {:>12} + tax {:>10}",
            i + 1,
            dollars(line.original),
            dollars(line.base),
            dollars(line.tax)
        );
    }

    println!("\n  Corrected invoice:");
    print_amounts(&plan.corrected_amounts(), |_| false);

    println!("\n  Replacements:");
    for r in &plan.replacements {
        let marker = if r.ambiguous {
            "  (also printed elsewhere, replace by position)"
        } else {
            ""
        };
        println!("    {:>12} -> {:<12}{}", r.from, r.to, marker);
    }
}

pub fn print_comparison(left_name: &str, right_name: &str, pairs: &[AmountPair]) {
    println!("  {:>3}  {:>12}  {:>12}", "#", "left", "right");
    println!("  {}", "-".repeat(33));
    for pair in pairs {
        let marker = if pair.changed() { "  *" } else { "" };
        println!(
            "  {:>3}  {:>12}  {:>12}{}",
            pair.index,
            optional(pair.left),
            optional(pair.right),
            marker
        );
    }
    let changed = pairs.iter().filter(|p| p.changed()).count();
    println!("\n  left:  {left_name}\n  right: {right_name}");
    println!("  {changed} of {} amount(s) differ", pairs.len());
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
