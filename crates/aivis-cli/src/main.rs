//! AIVIS command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod registry;
mod render;
mod scan;

#[derive(Debug, Parser)]
#[command(name = "aivis-cli")]
#[command(about = "AI visibility scanner: probe how AI assistants describe a business")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full visibility scan across all configured AI platforms
    Scan {
        /// Target domain, e.g. acme.com.au
        #[arg(long)]
        domain: String,

        /// Path to the business profile YAML
        #[arg(long)]
        profile: PathBuf,

        /// Primary competitor name, if known
        #[arg(long)]
        competitor: Option<String>,

        /// Print the probe questions without dispatching anything
        #[arg(long)]
        dry_run: bool,

        /// Emit the full scan outcome as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// Run a brand-awareness scan (brand recall + service checks)
    Awareness {
        #[arg(long)]
        domain: String,

        #[arg(long)]
        profile: PathBuf,

        #[arg(long)]
        competitor: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Run an employer-research scan with provider-proposed questions
    Employer {
        #[arg(long)]
        domain: String,

        #[arg(long)]
        profile: PathBuf,

        /// Job families to cover (repeatable)
        #[arg(long = "job-family")]
        job_families: Vec<String>,

        /// Maximum number of deduplicated questions to dispatch
        #[arg(long, default_value_t = 9)]
        limit: usize,

        #[arg(long)]
        json: bool,
    },
    /// Preview the deterministic question sets for a profile
    Questions {
        #[arg(long)]
        domain: String,

        #[arg(long)]
        profile: PathBuf,

        #[arg(long)]
        competitor: Option<String>,
    },
    /// List recent scan runs (requires DATABASE_URL)
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            domain,
            profile,
            competitor,
            dry_run,
            json,
        } => {
            scan::run_scan(
                &domain,
                &profile,
                competitor.as_deref(),
                scan::ScanKind::Visibility,
                dry_run,
                json,
            )
            .await
        }
        Commands::Awareness {
            domain,
            profile,
            competitor,
            json,
        } => {
            scan::run_scan(
                &domain,
                &profile,
                competitor.as_deref(),
                scan::ScanKind::Awareness,
                false,
                json,
            )
            .await
        }
        Commands::Employer {
            domain,
            profile,
            job_families,
            limit,
            json,
        } => {
            scan::run_scan(
                &domain,
                &profile,
                None,
                scan::ScanKind::Employer {
                    job_families,
                    limit,
                },
                false,
                json,
            )
            .await
        }
        Commands::Questions {
            domain,
            profile,
            competitor,
        } => scan::preview_questions(&domain, &profile, competitor.as_deref()),
        Commands::Runs { limit } => scan::list_runs(limit).await,
    }
}
