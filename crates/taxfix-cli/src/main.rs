mod commands;
mod logging;
mod output;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use taxfix_core::classify::Strategy;

#[derive(Parser)]
#[command(
    name = "taxfix",
    version,
    about = "Extract and reconcile dollar amounts on sales-tax invoices"
)]
struct Cli {
    /// Output format: table (default) or json
    #[arg(short, long, global = true, default_value = "table", value_parser = ["table", "json"])]
    output: String,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Profile selection shared by commands that classify amounts.
#[derive(Args)]
pub struct ProfileArgs {
    /// Predefined profile: nyc-service (default), generic
    #[arg(short, long = "profile", value_name = "NAME")]
    pub profile: Option<String>,

    /// Custom JSON profile file (overrides --profile)
    #[arg(long = "profile-file", value_name = "FILE")]
    pub profile_file: Option<PathBuf>,

    /// Tax rate as a fraction, e.g. 0.08875 (overrides the profile)
    #[arg(short, long, value_name = "RATE")]
    pub rate: Option<Decimal>,

    /// How amounts are matched to roles: auto, labels or positional
    #[arg(short, long, default_value = "auto")]
    pub strategy: Strategy,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dollar amounts in a PDF or text file
    Extract {
        /// Path to PDF or text file
        input_file: PathBuf,
    },
    /// Classify, derive and verify the amounts of an invoice
    Reconcile {
        /// Path to PDF or text file
        input_file: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Split a tax-inclusive total into base and tax
    Decompose {
        /// Tax-inclusive amount, e.g. 217.75
        #[arg(allow_negative_numbers = true)]
        total: Decimal,

        /// Tax rate as a fraction (default: the nyc-service rate)
        #[arg(short, long, value_name = "RATE")]
        rate: Option<Decimal>,
    },
    /// Plan the correction of an invoice whose line items include tax
    Fix {
        /// Path to PDF or text file
        input_file: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Show the amounts of two documents side by side
    Compare {
        /// Document before the change
        left: PathBuf,
        /// Document after the change
        right: PathBuf,
    },
    /// Manage and inspect invoice profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List predefined profiles
    List,
    /// Explain a profile in plain language
    Explain {
        /// Preset name (e.g., "nyc-service")
        preset: String,
    },
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let format = cli.output.as_str();
    let result = match cli.command {
        Commands::Extract { input_file } => commands::extract::run(&input_file, format),
        Commands::Reconcile {
            input_file,
            profile,
        } => commands::reconcile::run(&input_file, &profile, format),
        Commands::Decompose { total, rate } => commands::decompose::run(total, rate, format),
        Commands::Fix {
            input_file,
            profile,
        } => commands::fix::run(&input_file, &profile, format),
        Commands::Compare { left, right } => commands::compare::run(&left, &right, format),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Explain { preset } => commands::profiles::explain(&preset),
            ProfilesAction::Validate { file } => commands::profiles::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
