use std::path::Path;
use taxfix_core::error::TaxfixError;

use crate::output;

pub fn run(input_file: &Path, output_format: &str) -> Result<(), TaxfixError> {
    let document = super::load_document(input_file)?;
    let tokens = document.located_tokens();

    if tokens.is_empty() {
        eprintln!("No dollar amounts found in {}", input_file.display());
    }

    match output_format {
        "json" => output::json::print(&tokens)?,
        _ => output::table::print_tokens(&tokens),
    }
    Ok(())
}
