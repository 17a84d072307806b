use std::path::Path;
use taxfix_core::error::TaxfixError;
use taxfix_core::model::Role;
use taxfix_core::profiles::builtin;
use taxfix_core::profiles::schema::{ProfileDef, ValueSide};

pub fn list() -> Result<(), TaxfixError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let profile = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {:<12} {} (v{}), tax {}{}",
            name, profile.name, profile.version, profile.tax_rate, default_marker
        );
        if let Some(ref desc) = profile.description {
            println!("               {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), TaxfixError> {
    let profile = builtin::load_preset(preset)?;
    describe(&profile);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), TaxfixError> {
    let profile = taxfix_core::profiles::load_profile(file)?;

    println!("Profile '{}' (v{}) is valid.", profile.name, profile.version);
    println!("  Tax rate: {}", profile.tax_rate);
    println!("  Labels: {}", profile.labels.len());
    match profile.positional {
        Some(ref layout) => println!("  Positional layout: {} slots", layout.len()),
        None => println!("  Positional layout: none"),
    }

    // Potential issues, not errors
    let mut warnings = Vec::new();
    for role in [Role::Subtotal, Role::Tax, Role::Total, Role::AmountDue] {
        if !profile.labels.iter().any(|l| l.role == role) {
            warnings.push(format!("no label for {role}; it can only be derived"));
        }
    }
    if profile.tax_rate.value().is_zero() {
        warnings.push("tax rate is 0; pass --rate when reconciling".to_string());
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

fn describe(profile: &ProfileDef) {
    println!("{} (version {})\n", profile.name, profile.version);

    if let Some(ref desc) = profile.description {
        println!("{}\n", desc);
    }

    println!("Tax rate: {} ({})\n", profile.tax_rate, profile.tax_rate.value());

    if !profile.labels.is_empty() {
        println!(
            "Labels (value at most {} characters away):\n",
            profile.max_gap
        );
        let width = profile
            .labels
            .iter()
            .map(|l| l.label.len())
            .max()
            .unwrap_or(10);

        for def in &profile.labels {
            let side = match def.value_side {
                ValueSide::After => "value after",
                ValueSide::Before => "value before",
            };
            println!(
                "  {:<width$}  -> {:<12} ({})",
                def.label,
                def.role.to_string(),
                side,
                width = width
            );
            if let Some(ref note) = def.note {
                println!("  {:<width$}     {}", "", note, width = width);
            }
        }
        println!();
    }

    match profile.positional {
        Some(ref layout) => {
            println!("Without labels, amounts are assigned by position:\n");
            for (i, role) in layout.iter().enumerate() {
                println!("  {:>2}. {}", i + 1, role);
            }
            println!();
        }
        None => println!("No positional layout: documents without labels are not classified.\n"),
    }

    println!("Missing subtotal, tax, total and amount due are derived in that order;");
    println!("a printed $0.00 counts as missing.\n");
}
