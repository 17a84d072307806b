use rust_decimal::Decimal;
use taxfix_core::error::TaxfixError;
use taxfix_core::model::TaxRate;
use taxfix_core::profiles::builtin;

use crate::output;

pub fn run(total: Decimal, rate: Option<Decimal>, output_format: &str) -> Result<(), TaxfixError> {
    let rate = match rate {
        Some(r) => TaxRate::new(r)?,
        None => builtin::load_preset(builtin::DEFAULT_PRESET)?.tax_rate,
    };
    let (base, tax) = taxfix_core::decompose(total, rate.value())?;

    match output_format {
        "json" => output::json::print(&serde_json::json!({
            "total": total,
            "tax_rate": rate,
            "base": base,
            "tax": tax,
        }))?,
        _ => {
            println!("  Total     {:>12}", format!("${:.2}", total));
            println!("  Base      {:>12}", format!("${:.2}", base));
            println!("  Tax       {:>12}   ({rate})", format!("${:.2}", tax));
        }
    }
    Ok(())
}
