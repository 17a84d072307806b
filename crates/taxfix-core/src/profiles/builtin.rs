use crate::error::TaxfixError;
use crate::profiles::schema::ProfileDef;

const NYC_SERVICE_JSON: &str = include_str!("../../../../profiles/nyc-service.json");
const GENERIC_JSON: &str = include_str!("../../../../profiles/generic.json");

/// Available predefined profiles.
pub const PRESETS: &[&str] = &["nyc-service", "generic"];

/// Profile used when none is given.
pub const DEFAULT_PRESET: &str = "nyc-service";

/// Load a predefined profile by name.
pub fn load_preset(name: &str) -> Result<ProfileDef, TaxfixError> {
    let json = match name {
        "nyc-service" => NYC_SERVICE_JSON,
        "generic" => GENERIC_JSON,
        _ => {
            return Err(TaxfixError::ProfileInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let profile: ProfileDef = serde_json::from_str(json)?;
    Ok(profile)
}
