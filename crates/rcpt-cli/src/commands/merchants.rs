//! Merchants command - inspect the merchant signature registry.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use rcpt_core::receipt::rules::{normalize, DetectionPass, MerchantRegistry};
use rcpt_core::receipt::rules::merchant::HEADER_LINES;

/// Arguments for the merchants command.
#[derive(Args)]
pub struct MerchantsArgs {
    #[command(subcommand)]
    command: MerchantsCommand,
}

#[derive(Subcommand)]
enum MerchantsCommand {
    /// List known merchant signatures in match order
    List,

    /// Detect the merchant of an OCR text file
    Detect {
        /// OCR text file
        input: PathBuf,
    },
}

pub fn run(args: MerchantsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let registry = config.build_registry()?;

    match args.command {
        MerchantsCommand::List => list_merchants(&registry),
        MerchantsCommand::Detect { input } => detect_merchant(&registry, &input),
    }
}

fn list_merchants(registry: &MerchantRegistry) -> anyhow::Result<()> {
    if registry.is_empty() {
        println!("{} No merchant signatures configured", style("ℹ").blue());
        return Ok(());
    }

    println!("{:<4} {:<24} Pattern", "#", "Merchant");
    println!("{}", "-".repeat(50));

    for (i, signature) in registry.iter().enumerate() {
        println!(
            "{:<4} {:<24} {}",
            i + 1,
            signature.name(),
            style(signature.pattern()).dim()
        );
    }

    Ok(())
}

fn detect_merchant(registry: &MerchantRegistry, input: &Path) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let text = std::fs::read_to_string(input)?;
    let normalized = normalize(&text);

    match registry.detect(&normalized) {
        Some(found) => {
            let pass = match found.pass {
                DetectionPass::FullText => "full text".to_string(),
                DetectionPass::Header => format!("first {} lines", HEADER_LINES),
            };
            println!(
                "{} {} (matched in {})",
                style("✓").green(),
                found.name(),
                pass
            );
        }
        None => {
            println!("{} Unknown Store", style("✗").red());
        }
    }

    Ok(())
}
