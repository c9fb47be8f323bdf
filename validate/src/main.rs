//! kat-validate - Offline checks for KAT rule files.
//!
//! Replays a scripted flight through a profile file against the simulated
//! host, lists the capability catalog, and reports rules that would not run.
//!
//! Usage:
//!   kat-validate replay --rules profiles.toml --flight ascent.toml [--profile N] [--json]
//!   kat-validate capabilities [--flight ascent.toml] [--json]
//!   kat-validate check --rules profiles.toml [--flight ascent.toml] [--json]

mod flight;

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use kat_core::capability::{CapabilityCatalog, Role, TargetHandle};
use kat_core::config::EngineConfig;
use kat_core::sim::{SimFlight, install_catalog};
use kat_core::storage::load_profiles;
use kat_core::RuleProfiles;
use serde::Serialize;
use tracing_subscriber::filter::EnvFilter;

use flight::{FlightScript, ReplayReport, replay};

#[derive(Parser)]
#[command(version, about = "Replay and check KAT rule files")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted flight through one profile
    Replay {
        #[arg(short, long)]
        rules: PathBuf,
        #[arg(short, long)]
        flight: PathBuf,
        /// Profile index; defaults to the file's current profile
        #[arg(short, long)]
        profile: Option<usize>,
    },
    /// List capabilities, and which apply to each part
    Capabilities {
        #[arg(short, long)]
        flight: Option<PathBuf>,
    },
    /// List rules with invalid events, conditions or actions
    Check {
        #[arg(short, long)]
        rules: PathBuf,
        #[arg(short, long)]
        flight: Option<PathBuf>,
    },
}

/// Log to the file named by KAT_LOG_PATH, or to stderr. Replay reports go to
/// stdout, so logs never mix with `--json` output.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let log_path = std::env::var_os("KAT_LOG_PATH");
    match open_log_file(log_path.as_deref()) {
        Some(Ok(file)) => builder
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        Some(Err(err)) => {
            builder.with_writer(std::io::stderr).init();
            tracing::warn!(
                path = ?log_path,
                error = %err,
                "Cannot open KAT_LOG_PATH, logging to stderr"
            );
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
}

/// Append to the log file when a path is given
fn open_log_file(path: Option<&OsStr>) -> Option<std::io::Result<File>> {
    path.map(|path| OpenOptions::new().create(true).append(true).open(path))
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let catalog = install_catalog().map_err(|e| e.to_string())?;
    match &cli.command {
        Commands::Replay {
            rules,
            flight,
            profile,
        } => run_replay(rules, flight, *profile, cli.json),
        Commands::Capabilities { flight } => {
            let flight = load_flight(flight.as_deref())?;
            let listing = list_capabilities(catalog, &flight);
            if cli.json {
                print_json(&listing)
            } else {
                print_capabilities(&listing);
                Ok(())
            }
        }
        Commands::Check { rules, flight } => {
            let flight = load_flight(flight.as_deref())?;
            let findings = check_rules(rules, &flight)?;
            if cli.json {
                print_json(&findings)
            } else {
                print_findings(&findings);
                Ok(())
            }
        }
    }
}

fn load_flight(path: Option<&Path>) -> Result<SimFlight, String> {
    match path {
        Some(path) => FlightScript::load(path)?.build(),
        None => Ok(SimFlight::sample()),
    }
}

fn load_rules(path: &Path, flight: &SimFlight) -> Result<RuleProfiles, String> {
    let config = load_profiles(path).map_err(|e| e.to_string())?;
    Ok(RuleProfiles::from_config(&config, flight))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

// ─── replay ─────────────────────────────────────────────────────────────────

fn run_replay(
    rules: &Path,
    flight_path: &Path,
    profile: Option<usize>,
    json: bool,
) -> Result<(), String> {
    let script = FlightScript::load(flight_path)?;
    let flight = script.build()?;
    let mut profiles = load_rules(rules, &flight)?;
    if let Some(index) = profile {
        if !profiles.select(index) {
            return Err(format!(
                "profile {index} out of range ({} profiles)",
                profiles.len()
            ));
        }
    }

    let config = EngineConfig::load_or_default();
    let report = replay(&script, &flight, &mut profiles, &config)?;
    if json {
        print_json(&report)
    } else {
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &ReplayReport) {
    println!(
        "{} / profile {:?}: {} ticks, {} firings",
        report.vessel,
        report.profile,
        report.ticks,
        report.firings.len()
    );
    for firing in &report.firings {
        println!(
            "  [{}] rule {} {:?}",
            kat_types::formatting::format_clock(firing.time),
            firing.index,
            firing.rule
        );
    }
    for message in &report.messages {
        println!(
            "  [{}] message {:?}",
            kat_types::formatting::format_clock(message.time),
            message.text
        );
    }
    println!("final stage: {}", report.final_stage);
}

// ─── capabilities ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CapabilityListing {
    capabilities: Vec<CapabilityRow>,
    targets: Vec<TargetRow>,
}

#[derive(Debug, Serialize)]
struct CapabilityRow {
    category: String,
    name: &'static str,
    kind: String,
    parameters: Vec<String>,
    result: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct TargetRow {
    target: String,
    conditions: Vec<&'static str>,
    actions: Vec<&'static str>,
}

fn list_capabilities(catalog: &CapabilityCatalog, flight: &SimFlight) -> CapabilityListing {
    let capabilities = catalog
        .entries()
        .map(|entry| {
            let d = entry.descriptor();
            CapabilityRow {
                category: format!("{:?}", d.category),
                name: d.name,
                kind: format!("{:?}", d.kind),
                parameters: d
                    .parameters
                    .iter()
                    .map(|p| match &p.fixed {
                        Some(value) => format!("{}={}", p.name, value),
                        None => format!("{}: {}", p.name, p.ty.label()),
                    })
                    .collect(),
                result: d.result_type.map(|t| t.label()),
            }
        })
        .collect();

    let mut handles: Vec<TargetHandle> = vec![flight.vessel_handle()];
    handles.extend(
        flight
            .vessel()
            .parts()
            .into_iter()
            .map(|p| p as TargetHandle),
    );
    let targets = handles
        .iter()
        .map(|target| TargetRow {
            target: target.label(),
            conditions: catalog.applicable_names(&**target, Role::Condition),
            actions: catalog.applicable_names(&**target, Role::Action),
        })
        .collect();

    CapabilityListing {
        capabilities,
        targets,
    }
}

fn print_capabilities(listing: &CapabilityListing) {
    for row in &listing.capabilities {
        let result = row.result.map(|r| format!(" -> {r}")).unwrap_or_default();
        println!(
            "{:<8} {:<18} {}({}){}",
            row.category,
            row.kind,
            row.name,
            row.parameters.join(", "),
            result
        );
    }
    println!();
    for target in &listing.targets {
        println!("{}", target.target);
        println!("  conditions: {}", target.conditions.join(", "));
        println!("  actions:    {}", target.actions.join(", "));
    }
}

// ─── check ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Finding {
    profile: String,
    index: usize,
    rule: String,
    description: String,
    inert: bool,
}

fn check_rules(path: &Path, flight: &SimFlight) -> Result<Vec<Finding>, String> {
    let profiles = load_rules(path, flight)?;
    let mut findings = Vec::new();
    for profile in (0..profiles.len()).filter_map(|i| profiles.get(i)) {
        for (index, rule) in profile.rules().iter().enumerate() {
            if rule.is_valid() {
                continue;
            }
            findings.push(Finding {
                profile: profile.name().to_string(),
                index,
                rule: rule.name().to_string(),
                description: rule.describe(),
                inert: rule.is_inert(),
            });
        }
    }
    tracing::info!(
        profiles = profiles.len(),
        invalid = findings.len(),
        "Checked rule file"
    );
    Ok(findings)
}

fn print_findings(findings: &[Finding]) {
    if findings.is_empty() {
        println!("all rules valid");
        return;
    }
    for finding in findings {
        let inert = if finding.inert { " (inert)" } else { "" };
        println!(
            "{} #{}{}: {}",
            finding.profile, finding.index, inert, finding.description
        );
    }
}
