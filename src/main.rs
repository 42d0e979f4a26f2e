//! # chatunify CLI
//!
//! Command-line interface for the chatunify library.

use std::env;
use std::fs;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatunify::cli::{Args, Command};
use chatunify::config::ExtractConfig;
use chatunify::export::{UnifiedExport, format_transcript, read_unified, write_unified};
use chatunify::extract::{ExtractionManager, FileConfig, TypeHint, merge_and_sort};
use chatunify::filter::{FilterConfig, apply_filters};
use chatunify::scanner::{AccountScanner, ScanConfig};
use chatunify::{ExtractError, Result};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    println!("📦 chatunify v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match args.command {
        Command::Scan { privacy, output } => run_scan(privacy, output.as_deref()),
        Command::Extract {
            inputs,
            hints,
            privacy,
            output,
            after,
            before,
            from,
            report,
        } => run_extract(&inputs, &hints, privacy, &output, after, before, from, report),
        Command::Transcript { input, output } => run_transcript(&input, output.as_deref()),
    }
}

/// Builds the scan configuration from the environment, once, at the edge.
///
/// `CHATUNIFY_EXPORT_DIR` adds an extra root for both platforms;
/// `USERNAME` (Windows) then `USER` supply the profile name for the
/// default roots.
fn scan_config_from_env() -> ScanConfig {
    let username = env::var("USERNAME")
        .or_else(|_| env::var("USER"))
        .unwrap_or_else(|_| "Default".to_string());
    let mut config = ScanConfig::for_user(&username);
    if let Ok(dir) = env::var("CHATUNIFY_EXPORT_DIR") {
        config = config.with_wechat_root(&dir).with_qq_root(&dir);
    }
    config
}

fn run_scan(
    privacy: chatunify::privacy::PrivacyLevel,
    output: Option<&std::path::Path>,
) -> Result<()> {
    println!("🔍 Scanning for chat accounts...");
    println!("🔒 Privacy: {privacy}");
    println!();

    let scanner = AccountScanner::new(scan_config_from_env());
    let result = scanner.scan_all(privacy);

    println!(
        "   WeChat: {} account(s), QQ: {} account(s)",
        result.wechat_accounts.len(),
        result.qq_accounts.len()
    );
    for account in result.wechat_accounts.iter().chain(&result.qq_accounts) {
        println!(
            "   • {}: {} data store(s)",
            account.identifier, account.data_store_count
        );
    }

    if let Some(path) = output {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
        println!();
        println!("✅ Scan result saved to {}", path.display());
    }
    Ok(())
}

/// Pairs platform hints with inputs.
///
/// No hints auto-detects everything; a single hint applies to every input;
/// several must match the inputs one-to-one.
fn pair_hints(inputs: &[std::path::PathBuf], hints: &[TypeHint]) -> Result<Vec<FileConfig>> {
    match hints {
        [] => Ok(inputs
            .iter()
            .map(|path| FileConfig::new(path, TypeHint::Auto))
            .collect()),
        [hint] => Ok(inputs
            .iter()
            .map(|path| FileConfig::new(path, *hint))
            .collect()),
        _ if hints.len() == inputs.len() => Ok(inputs
            .iter()
            .zip(hints)
            .map(|(path, &hint)| FileConfig::new(path, hint))
            .collect()),
        _ => Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "{} --type hints for {} inputs; give one hint, or one per input",
                hints.len(),
                inputs.len()
            ),
        ))),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_extract(
    inputs: &[std::path::PathBuf],
    hints: &[TypeHint],
    privacy: chatunify::privacy::PrivacyLevel,
    output: &std::path::Path,
    after: Option<String>,
    before: Option<String>,
    from: Option<String>,
    report: bool,
) -> Result<()> {
    let total_start = Instant::now();

    println!("📂 Inputs:  {}", inputs.len());
    println!("💾 Output:  {}", output.display());
    println!("🔒 Privacy: {privacy}");

    let mut filter_config = FilterConfig::new();
    if let Some(ref date) = after {
        filter_config = filter_config.with_date_from(date)?;
        println!("📅 After:   {date}");
    }
    if let Some(ref date) = before {
        filter_config = filter_config.with_date_to(date)?;
        println!("📅 Before:  {date}");
    }
    if let Some(ref sender) = from {
        filter_config = filter_config.with_sender(sender.clone());
        println!("👤 From:    {sender}");
    }
    println!();

    let manager = ExtractionManager::new(ExtractConfig::default());
    let configs = pair_hints(inputs, hints)?;

    println!("⏳ Extracting...");
    let mut extraction = manager.extract_unified(&configs, privacy);
    for warning in &extraction.warnings {
        println!("⚠️  {warning}");
    }
    println!("   Found {} messages", extraction.messages.len());

    if filter_config.is_active() {
        println!("🔍 Filtering messages...");
        extraction.messages = apply_filters(extraction.messages, &filter_config);
        extraction.messages = merge_and_sort(extraction.messages);
        println!("   {} messages after filtering", extraction.messages.len());
    }

    let message_count = extraction.messages.len();
    let export = UnifiedExport::new(extraction.messages)
        .with_metadata("tool", format!("chatunify v{}", env!("CARGO_PKG_VERSION")))
        .with_metadata("privacy_level", privacy.to_string());
    write_unified(&export, output)?;

    println!();
    println!("✅ Done! {} messages saved to {}", message_count, output.display());

    if report {
        let scan_result = AccountScanner::new(scan_config_from_env()).scan_all(privacy);
        let report = manager.generate_report(&scan_result, &export.messages);
        println!();
        println!("📊 Report:");
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}

fn run_transcript(input: &std::path::Path, output: Option<&std::path::Path>) -> Result<()> {
    if !input.exists() {
        return Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input not found: {}", input.display()),
        )));
    }

    let export = read_unified(input)?;
    let transcript = format_transcript(&export.messages);

    match output {
        Some(path) => {
            fs::write(path, &transcript)?;
            println!(
                "✅ Transcript of {} messages saved to {}",
                export.message_count,
                path.display()
            );
        }
        None => print!("{transcript}"),
    }
    Ok(())
}
