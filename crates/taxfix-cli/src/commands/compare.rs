use std::path::Path;
use taxfix_core::compare::compare_amounts;
use taxfix_core::error::TaxfixError;

use crate::output;

pub fn run(left: &Path, right: &Path, output_format: &str) -> Result<(), TaxfixError> {
    let left_tokens = taxfix_core::extract_tokens(super::load_document(left)?.text());
    let right_tokens = taxfix_core::extract_tokens(super::load_document(right)?.text());
    let pairs = compare_amounts(&left_tokens, &right_tokens);

    match output_format {
        "json" => output::json::print(&pairs)?,
        _ => output::table::print_comparison(
            &left.display().to_string(),
            &right.display().to_string(),
            &pairs,
        ),
    }
    Ok(())
}
