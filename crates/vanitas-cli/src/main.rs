//! Vanitas CLI
//!
//! Vanity address generator for Base58 (Solana-style) and hex (EVM-style)
//! addresses.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossbeam_channel::unbounded;
use vanitas_core::{
    format_count, format_duration_ms, generator_for, KeyExport, SearchBudget, SearchCriteria,
    SearchOptions, SearchOutcome, VanityFacade, Variant, DEFAULT_CADENCE,
};

#[derive(Parser)]
#[command(name = "vanitas")]
#[command(author = "Vanitas Team")]
#[command(version)]
#[command(about = "Vanity address generator for Base58 and hex addresses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a vanity address
    Generate {
        /// Address variant
        #[arg(short, long, default_value = "hex")]
        variant: VariantArg,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Maximum attempts
        #[arg(long, default_value_t = 10_000_000)]
        max_attempts: u64,

        /// Maximum time in milliseconds
        #[arg(long, default_value_t = 60_000)]
        max_time_ms: u64,

        /// Attempts between progress updates
        #[arg(long, default_value_t = DEFAULT_CADENCE)]
        cadence: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate how hard a pattern is to find
    Estimate {
        #[arg(short, long, default_value = "hex")]
        variant: VariantArg,

        #[command(flatten)]
        criteria: CriteriaArgs,

        #[arg(long)]
        json: bool,
    },

    /// Check a pattern against the variant's alphabet
    Validate {
        #[arg(short, long, default_value = "hex")]
        variant: VariantArg,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// Derive the address and key encodings for an existing private key
    Extract {
        #[arg(short, long, default_value = "hex")]
        variant: VariantArg,

        /// Private key as hex, Base58, Base64 or a JSON byte array
        #[arg(short, long)]
        key: String,

        #[arg(long)]
        json: bool,
    },

    /// List supported address variants
    Variants,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    #[value(aliases = ["sol", "solana"])]
    Base58,
    #[value(aliases = ["eth", "evm"])]
    Hex,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Base58 => Variant::Base58,
            VariantArg::Hex => Variant::Hex,
        }
    }
}

#[derive(Args)]
struct CriteriaArgs {
    /// Address must start with this (after any `0x`)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Address must end with this
    #[arg(short, long)]
    suffix: Option<String>,

    /// Address must contain this anywhere
    #[arg(short, long, alias = "substring")]
    contains: Option<String>,

    /// Case insensitive search
    #[arg(short = 'i', long)]
    case_insensitive: bool,
}

impl CriteriaArgs {
    fn to_criteria(&self) -> SearchCriteria {
        SearchCriteria {
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            substring: self.contains.clone(),
            case_sensitive: !self.case_insensitive,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let facade = Arc::new(VanityFacade::new());

    match cli.command {
        Commands::Generate {
            variant,
            criteria,
            max_attempts,
            max_time_ms,
            cadence,
            json,
        } => {
            let budget = SearchBudget::new(max_attempts, max_time_ms)
                .ok_or_else(|| anyhow!("--max-attempts and --max-time-ms must be positive"))?;
            cmd_generate(
                facade,
                variant.into(),
                criteria.to_criteria(),
                budget,
                cadence,
                json,
            )?;
        }
        Commands::Estimate {
            variant,
            criteria,
            json,
        } => {
            cmd_estimate(&facade, variant.into(), &criteria.to_criteria(), json)?;
        }
        Commands::Validate { variant, criteria } => {
            cmd_validate(&facade, variant.into(), &criteria.to_criteria())?;
        }
        Commands::Extract { variant, key, json } => {
            let export = facade.extract_str(Variant::from(variant).as_str(), &key)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&export)?);
            } else {
                print_export("KEY DETAILS", &export);
            }
        }
        Commands::Variants => {
            cmd_variants();
        }
    }

    Ok(())
}

fn cmd_generate(
    facade: Arc<VanityFacade>,
    variant: Variant,
    criteria: SearchCriteria,
    budget: SearchBudget,
    cadence: u64,
    json_output: bool,
) -> Result<()> {
    let tag = variant.as_str();
    let report = facade.estimate(tag, &criteria)?;

    if !json_output {
        eprintln!("Vanitas v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Variant:    {}", variant);
        eprintln!("Pattern:    {}", criteria);
        eprintln!(
            "Difficulty: {} attempts (~{})",
            report
                .expected_attempts
                .finite()
                .map_or_else(|| "unbounded".to_string(), |n| format_count(n as f64)),
            format_duration_ms(report.expected_duration_ms)
        );
        eprintln!();
    }

    let (progress_tx, progress_rx) = unbounded();
    let options = SearchOptions::new(criteria, budget)
        .with_progress(progress_tx)
        .with_cadence(cadence);
    let mut pending = facade.start(tag, options)?;

    let handler_facade = Arc::clone(&facade);
    ctrlc::set_handler(move || handler_facade.stop()).context("Error setting Ctrl-C handler")?;

    let outcome = loop {
        if let Some(outcome) = pending.wait_timeout(Duration::from_millis(250)) {
            break outcome;
        }
        if let Some(event) = progress_rx.try_iter().last() {
            if !json_output {
                eprint!("\r{}", event.format(report.probability));
            }
        }
    };
    if !json_output {
        eprintln!();
    }

    match outcome {
        SearchOutcome::Found(result) => {
            let export = KeyExport::from_result(&result);
            if json_output {
                println!("{}", serde_json::to_string_pretty(&export)?);
            } else {
                print_export("MATCH FOUND!", &export);
            }
            Ok(())
        }
        SearchOutcome::NotFound(reason) => {
            if json_output {
                let body = serde_json::json!({ "status": "not_found", "reason": reason });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                eprintln!("No match found: {}.", reason);
            }
            Ok(())
        }
        SearchOutcome::Failed(failure) => Err(failure.into()),
    }
}

fn cmd_estimate(
    facade: &VanityFacade,
    variant: Variant,
    criteria: &SearchCriteria,
    json_output: bool,
) -> Result<()> {
    let issues = facade.validate(variant.as_str(), criteria)?;
    if !issues.is_empty() {
        bail!(vanitas_core::VanityError::Validation(issues));
    }

    let report = facade.estimate(variant.as_str(), criteria)?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Variant:            {}", report.variant);
    println!("Pattern:            {}", report.criteria);
    println!("Probability:        {:e}", report.probability);
    println!(
        "Expected attempts:  {}",
        report
            .expected_attempts
            .finite()
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );
    println!(
        "Expected duration:  {}",
        format_duration_ms(report.expected_duration_ms)
    );
    Ok(())
}

fn cmd_validate(facade: &VanityFacade, variant: Variant, criteria: &SearchCriteria) -> Result<()> {
    let issues = facade.validate(variant.as_str(), criteria)?;
    if issues.is_empty() {
        println!("OK: {} is a valid {} pattern", criteria, variant);
        return Ok(());
    }
    for issue in &issues {
        println!("- {}", issue);
    }
    bail!("{} issue(s) found", issues.len())
}

fn cmd_variants() {
    println!("Supported Variants:");
    println!("{:-<60}", "");
    println!(
        "{:<8} {:<10} {:<8} {:<10} {}",
        "Tag", "Generator", "Length", "Alphabet", "Est. keys/s"
    );
    println!("{:-<60}", "");

    for variant in Variant::ALL {
        let generator = generator_for(variant);
        println!(
            "{:<8} {:<10} {:<8} {:<10} {}",
            variant.as_str(),
            generator.name(),
            generator.address_body_len(),
            generator.valid_address_chars().chars().count(),
            generator.throughput_per_second()
        );
    }
}

fn print_export(title: &str, export: &KeyExport) {
    println!();
    println!("{}", title);
    println!("{:-<60}", "");
    println!("Address:      {}", export.address);
    if let Some(checksum) = &export.checksum_address {
        println!("Checksummed:  {}", checksum);
    }
    println!("Private Hex:  {}", export.private_key_hex.as_str());
    println!("Private B58:  {}", export.private_key_base58.as_str());
    println!("Private B64:  {}", export.private_key_base64.as_str());
    if let (Some(attempts), Some(elapsed_ms)) = (export.attempts, export.elapsed_ms) {
        println!("{:-<60}", "");
        println!("Keys Tested:  {}", attempts);
        println!("Time:         {:.2}s", elapsed_ms as f64 / 1000.0);
        if elapsed_ms > 0 {
            println!(
                "Speed:        {:.2} Kkey/s",
                attempts as f64 / elapsed_ms as f64
            );
        }
    }
}
