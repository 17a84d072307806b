use serde::Serialize;
use taxfix_core::error::TaxfixError;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), TaxfixError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
