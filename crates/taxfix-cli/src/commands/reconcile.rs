use std::path::Path;
use taxfix_core::error::TaxfixError;

use crate::output;
use crate::ProfileArgs;

pub fn run(input_file: &Path, args: &ProfileArgs, output_format: &str) -> Result<(), TaxfixError> {
    let (profile, options) = super::resolve(args)?;
    let document = super::load_document(input_file)?;
    let result = taxfix_core::reconcile_text(document.text(), &profile, &options)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print_reconciliation(&result),
    }
    Ok(())
}
