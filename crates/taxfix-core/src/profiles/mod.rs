pub mod builtin;
pub mod schema;

use crate::error::TaxfixError;
use crate::parsing::label_pattern;
use schema::ProfileDef;
use std::path::Path;

/// Load a profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<ProfileDef, TaxfixError> {
    let content = std::fs::read_to_string(path).map_err(|e| TaxfixError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_profile(&content, path)
}

/// Parse a profile from a JSON string.
pub fn parse_profile(json: &str, source: &Path) -> Result<ProfileDef, TaxfixError> {
    let profile: ProfileDef = serde_json::from_str(json).map_err(|e| TaxfixError::ProfileLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Parse a profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<ProfileDef, TaxfixError> {
    let profile: ProfileDef = serde_json::from_str(json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Validate that a profile is well-formed.
pub fn validate_profile(profile: &ProfileDef) -> Result<(), TaxfixError> {
    if profile.name.trim().is_empty() {
        return Err(TaxfixError::ProfileInvalid("name must not be empty".into()));
    }

    let has_layout = profile
        .positional
        .as_ref()
        .is_some_and(|layout| !layout.is_empty());
    if profile.labels.is_empty() && !has_layout {
        return Err(TaxfixError::ProfileInvalid(
            "profile needs at least one label or a positional layout".into(),
        ));
    }

    if matches!(profile.positional.as_deref(), Some([])) {
        return Err(TaxfixError::ProfileInvalid(
            "positional layout must not be empty".into(),
        ));
    }

    if profile.max_gap == 0 {
        return Err(TaxfixError::ProfileInvalid(
            "max_gap must be greater than zero".into(),
        ));
    }

    for def in &profile.labels {
        label_pattern(&def.label)?;
    }

    Ok(())
}
