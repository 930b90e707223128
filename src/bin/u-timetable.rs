//! Command-line front end: generate or audit timetables in a JSON catalog.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use u_timetable::catalog::InMemoryCatalog;
use u_timetable::config::SchedulerConfig;
use u_timetable::models::Timetable;
use u_timetable::service::TimetableService;
use u_timetable::validation::audit_timetable;

#[derive(Parser)]
#[command(name = "u-timetable", version, about = "Weekly timetable synthesis")]
struct Cli {
    /// Scheduler config (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate one section's timetable and print the outcome.
    Generate {
        /// Catalog file (JSON).
        #[arg(long)]
        catalog: PathBuf,
        /// Section to regenerate.
        #[arg(long)]
        section: String,
        /// Seed override.
        #[arg(long)]
        seed: Option<u64>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write the updated catalog here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check every stored entry for conflicts.
    Audit {
        /// Catalog file (JSON).
        #[arg(long)]
        catalog: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Full outcome, coverage included.
    Json,
    /// Weekly listing with clock times and a coverage summary.
    Text,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SchedulerConfig::from_path(path)?,
        None => SchedulerConfig::default(),
    };

    match cli.command {
        Command::Generate {
            catalog,
            section,
            seed,
            format,
            output,
        } => {
            let store = load_catalog(&catalog)?;
            let service = TimetableService::new(store, config)?;
            let seed = seed.unwrap_or(service.config().seed);
            let outcome = service
                .generate_with_seed(&section, seed)
                .with_context(|| format!("generating timetable for section '{section}'"))?;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Format::Text => {
                    let timetable = Timetable::from_entries(outcome.entries.clone());
                    print!("{}", timetable.render(&service.config().grid));
                    let coverage = &outcome.coverage;
                    println!(
                        "coverage: {}/{} sessions ({:.1}%)",
                        coverage.total_scheduled(),
                        coverage.total_target(),
                        coverage.coverage_rate() * 100.0
                    );
                    for line in coverage.shortfalls() {
                        println!(
                            "  short: {} {} {}/{} ({:?})",
                            line.subject_code, line.session_type, line.scheduled, line.target, line.reason
                        );
                    }
                }
            }

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&service.store().to_data())?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing catalog to {}", path.display()))?;
            }
        }
        Command::Audit { catalog } => {
            let store = load_catalog(&catalog)?;
            let rooms = store.classrooms();
            let room_types: BTreeMap<_, _> = rooms.iter().map(|r| (r.id.as_str(), r.room_type)).collect();
            let violations = audit_timetable(&store.all_entries(), &room_types, &config.grid);

            println!("{}", serde_json::to_string_pretty(&violations)?);
            if !violations.is_empty() {
                bail!("{} violation(s) found", violations.len());
            }
        }
    }
    Ok(())
}

fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    InMemoryCatalog::from_json(&json).with_context(|| format!("parsing catalog {}", path.display()))
}
