pub mod classify;
pub mod compare;
pub mod correction;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod profiles;
pub mod reconcile;
pub mod tax;

use classify::{classify, Classification, Strategy};
use correction::{plan_correction, CorrectionPlan};
use error::TaxfixError;
use extraction::{PdfExtractor, TextDocument};
use model::{CurrencyToken, TaxRate};
use profiles::schema::ProfileDef;
use reconcile::{derive, verify, Reconciliation};

pub use tax::decompose;

/// Caller overrides applied on top of a profile.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub strategy: Strategy,
    /// Replaces the profile's tax rate when set.
    pub tax_rate: Option<TaxRate>,
}

impl ReconcileOptions {
    fn rate(&self, profile: &ProfileDef) -> TaxRate {
        self.tax_rate.unwrap_or(profile.tax_rate)
    }
}

/// Every well-formed dollar amount in `text`, in document order.
pub fn extract_tokens(text: &str) -> Vec<CurrencyToken> {
    parsing::collect_tokens(text)
}

/// Run the PDF through the extractor and join its pages.
pub fn extract_document(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
) -> Result<TextDocument, TaxfixError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "extracted text"
    );
    Ok(TextDocument::from_pages(pages))
}

/// Main API entry point: find, classify, derive and verify the amounts of
/// one invoice's text.
pub fn reconcile_text(
    text: &str,
    profile: &ProfileDef,
    options: &ReconcileOptions,
) -> Result<Reconciliation, TaxfixError> {
    let rate = options.rate(profile);
    let Classification {
        strategy,
        amounts: extracted,
        captures,
    } = classify_text(text, profile, options)?;

    let mut amounts = extracted.clone();
    let derivations = derive(&mut amounts, rate)?;
    let discrepancies = verify(&amounts, rate);

    Ok(Reconciliation {
        profile_name: profile.name.clone(),
        tax_rate: rate,
        strategy,
        extracted,
        amounts,
        captures,
        derivations,
        discrepancies,
    })
}

/// [`reconcile_text`] for a PDF.
pub fn reconcile_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    profile: &ProfileDef,
    options: &ReconcileOptions,
) -> Result<Reconciliation, TaxfixError> {
    let document = extract_document(pdf_bytes, extractor)?;
    reconcile_text(document.text(), profile, options)
}

/// Plan a correction for an invoice whose line items include tax.
///
/// `Ok(None)` means the invoice already shows its tax separately.
pub fn plan_fix(
    text: &str,
    profile: &ProfileDef,
    options: &ReconcileOptions,
) -> Result<Option<CorrectionPlan>, TaxfixError> {
    let classification = classify_text(text, profile, options)?;
    plan_correction(&classification.amounts, options.rate(profile))
}

fn classify_text(
    text: &str,
    profile: &ProfileDef,
    options: &ReconcileOptions,
) -> Result<Classification, TaxfixError> {
    let tokens = parsing::require_tokens(text)?;
    tracing::debug!(count = tokens.len(), "found dollar amounts");
    classify(text, &tokens, profile, options.strategy)
}
