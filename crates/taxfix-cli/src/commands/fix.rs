use std::path::Path;
use taxfix_core::error::TaxfixError;

use crate::output;
use crate::ProfileArgs;

pub fn run(input_file: &Path, args: &ProfileArgs, output_format: &str) -> Result<(), TaxfixError> {
    let (profile, options) = super::resolve(args)?;
    let document = super::load_document(input_file)?;
    let plan = taxfix_core::plan_fix(document.text(), &profile, &options)?;

    match (output_format, plan) {
        ("json", plan) => output::json::print(&plan)?,
        (_, Some(plan)) => output::table::print_plan(&plan),
        (_, None) => {
            println!("Tax is already shown separately; nothing to fix.");
        }
    }
    Ok(())
}
