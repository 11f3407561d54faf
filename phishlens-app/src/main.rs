use anyhow::Result;
use clap::{Parser, Subcommand};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use phishlens_app::api;
use phishlens_app::dashboard::DashboardReport;
use phishlens_app::scanner::ScanService;
use phishlens_core::persistence::{self, PersistenceManager};
use phishlens_core::LensConfig;
use phishlens_intel::{IndicatorStore, ScanLog, ThreatLog};

#[derive(Parser, Debug)]
#[command(name = "phishlens", version, about = "PhishLens — URL and email threat scanner")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "phishlens.toml")]
    config: String,

    /// Log level (overrides config file)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the JSON API server
    Serve {
        /// Bind address (overrides config file)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Scan a single URL and print the report
    ScanUrl {
        url: String,
        /// Recorded as the scan actor
        #[arg(long)]
        actor: Option<String>,
    },
    /// Scan an email subject/body pair and print the report
    ScanEmail {
        subject: String,
        body: String,
        #[arg(long)]
        actor: Option<String>,
    },
    /// Print dashboard statistics
    Stats,
    /// Write a default config file and exit
    GenerateConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Command::GenerateConfig) {
        let config = LensConfig::default();
        config.save(&cli.config)?;
        println!("Default configuration written to {}", cli.config);
        return Ok(());
    }

    let config = LensConfig::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: {}, using defaults", e);
        LensConfig::default()
    });

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.general.log_level);
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    FmtSubscriber::builder().with_max_level(level).init();

    // ── Stores ───────────────────────────────────────────────────────
    let intel = Arc::new(IndicatorStore::new());
    let scans = Arc::new(ScanLog::new());
    let threats = Arc::new(ThreatLog::new());

    let persist = if config.persistence.enabled {
        let mgr = persistence::manager_from_config(&config.persistence);
        mgr.init()?;
        mgr.register(intel.clone());
        mgr.register(scans.clone());
        mgr.register(threats.clone());
        mgr.restore_all();
        info!(
            indicators = intel.len(),
            scans = scans.len(),
            threats = threats.len(),
            "State restored"
        );
        Some(Arc::new(mgr))
    } else {
        None
    };

    let service = Arc::new(ScanService::new(intel, scans, threats));
    let start_time = chrono::Utc::now().timestamp();

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(config.server.bind);
            let state = api::ApiState {
                service,
                start_time,
            };

            let server = tokio::spawn(async move {
                if let Err(e) = api::serve(state, &bind).await {
                    tracing::error!(error = %e, "API server exited");
                }
            });

            tokio::signal::ctrl_c().await?;
            info!("Shutting down");
            server.abort();
            snapshot(&persist);
        }
        Command::ScanUrl { url, actor } => {
            let report = service.scan_url(&url, actor.as_deref(), None);
            println!("{}", serde_json::to_string_pretty(&report)?);
            snapshot(&persist);
        }
        Command::ScanEmail {
            subject,
            body,
            actor,
        } => {
            let report = service.scan_email(&subject, &body, actor.as_deref(), None);
            println!("{}", serde_json::to_string_pretty(&report)?);
            snapshot(&persist);
        }
        Command::Stats => {
            let report = DashboardReport::build(
                &service.intel,
                &service.scans,
                &service.threats,
                start_time,
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::GenerateConfig => unreachable!("handled above"),
    }

    Ok(())
}

/// Snapshot all stores; failures are logged by the manager.
fn snapshot(persist: &Option<Arc<PersistenceManager>>) {
    if let Some(mgr) = persist {
        mgr.snapshot_all();
    }
}
