pub mod compare;
pub mod decompose;
pub mod extract;
pub mod fix;
pub mod profiles;
pub mod reconcile;

use crate::ProfileArgs;
use std::path::Path;
use taxfix_core::error::TaxfixError;
use taxfix_core::extraction::pdftotext::PdftotextExtractor;
use taxfix_core::extraction::TextDocument;
use taxfix_core::model::TaxRate;
use taxfix_core::profiles::builtin;
use taxfix_core::profiles::schema::ProfileDef;
use taxfix_core::ReconcileOptions;

/// Read a PDF through pdftotext, or any other file as UTF-8 text.
pub fn load_document(path: &Path) -> Result<TextDocument, TaxfixError> {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let pdf_bytes = std::fs::read(path)?;
        let extractor = PdftotextExtractor::new();
        taxfix_core::extract_document(&pdf_bytes, &extractor)
    } else {
        Ok(TextDocument::from_text(std::fs::read_to_string(path)?))
    }
}

/// The profile named on the command line, and the options that override it.
pub fn resolve(args: &ProfileArgs) -> Result<(ProfileDef, ReconcileOptions), TaxfixError> {
    let profile = match (&args.profile_file, &args.profile) {
        (Some(path), _) => taxfix_core::profiles::load_profile(path)?,
        (None, Some(name)) => builtin::load_preset(name)?,
        (None, None) => builtin::load_preset(builtin::DEFAULT_PRESET)?,
    };
    let options = ReconcileOptions {
        strategy: args.strategy,
        tax_rate: args.rate.map(TaxRate::new).transpose()?,
    };
    Ok((profile, options))
}
