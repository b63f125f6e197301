//! Queue Listing CLI - list, inspect and download queued flow units

mod config;
mod format;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use queue_listing_client::{ClientOptions, HttpTransport};
use queue_listing_core::domain::{JobTarget, SortColumn};
use queue_listing_core::{JobOutcome, ListingController};
use render::TerminalSink;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "queue-listing")]
#[command(about = "List the flow units waiting in a connection's queue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL for relative URIs (e.g. http://localhost:8080/nifi-api/)
    #[arg(long, global = true, env = "QUEUE_LISTING_BASE_URL")]
    base_url: Option<String>,

    /// Settings file (overrides QUEUE_LISTING_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List a connection's queue
    List {
        /// Connection URI (absolute, or relative to --base-url)
        connection: String,

        /// Sort column (e.g. QUEUE_POSITION, FILENAME, FLOWFILE_SIZE)
        #[arg(short, long, default_value = "QUEUE_POSITION")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one flow unit's details and attributes
    Show {
        /// Flow unit URI from a listing
        flowfile: String,

        /// Cluster node holding the flow unit
        #[arg(long)]
        cluster_node_id: Option<String>,
    },

    /// Download one flow unit's content
    Content {
        /// Flow unit URI from a listing
        flowfile: String,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,

        /// Cluster node holding the flow unit
        #[arg(long)]
        cluster_node_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} {:#}", "✗".red(), e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = Some(base_url);
    }
    if let Some(timeout) = cli.timeout {
        settings.request_timeout_secs = timeout;
    }
    debug!(?settings, "Settings loaded");

    let transport = Arc::new(
        HttpTransport::new(ClientOptions {
            base_url: settings.base_url.clone(),
            request_timeout: settings.request_timeout(),
            ..Default::default()
        })
        .context("Failed to create HTTP client")?,
    );

    match cli.command {
        Commands::List {
            connection,
            sort,
            desc,
        } => list(transport, &settings, connection, &sort, desc).await,

        Commands::Show {
            flowfile,
            cluster_node_id,
        } => {
            let node = cluster_node_id.or(settings.cluster_node_id);
            let details = transport
                .get_flowfile(&flowfile, node.as_deref())
                .await
                .context("Failed to fetch flowfile details")?;
            println!("{}", render::details_view(&details));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Content {
            flowfile,
            output,
            cluster_node_id,
        } => {
            let node = cluster_node_id.or(settings.cluster_node_id);
            let details = transport
                .get_flowfile(&flowfile, node.as_deref())
                .await
                .context("Failed to fetch flowfile details")?;
            let content = transport
                .fetch_content(&details)
                .await
                .context("Failed to download content")?;
            tokio::fs::write(&output, &content)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "{}",
                format!(
                    "✓ Saved {} to {}",
                    format::format_data_size(content.len() as u64),
                    output.display()
                )
                .green()
                .bold()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn list(
    transport: Arc<HttpTransport>,
    settings: &config::Settings,
    connection: String,
    sort: &str,
    desc: bool,
) -> Result<ExitCode> {
    if sort.parse::<SortColumn>().is_err() {
        let known: Vec<&str> = SortColumn::ALL.iter().map(|c| c.as_str()).collect();
        anyhow::bail!("unknown sort column '{}' (expected one of {})", sort, known.join(", "));
    }

    let sink = Arc::new(TerminalSink::new());
    let controller = Arc::new(
        ListingController::with_config(transport, sink.clone(), settings.poll)
            .context("Invalid poll settings")?,
    );

    let interrupt = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, cancelling listing");
                controller.cancel();
            }
        })
    };

    let target = JobTarget::new(connection);
    let outcome = controller.start_sorted(&target, sort, !desc).await;
    interrupt.abort();
    sink.finish();

    if tokio::time::timeout(Duration::from_secs(5), controller.wait_for_releases())
        .await
        .is_err()
    {
        tracing::warn!("Timed out waiting for the listing request to be released");
    }

    match outcome? {
        JobOutcome::Success(_) => {
            if let Some(table) = sink.render() {
                println!("{}", table);
            }
            Ok(ExitCode::SUCCESS)
        }
        JobOutcome::EmptyResult => Ok(ExitCode::SUCCESS),
        JobOutcome::Cancelled => {
            eprintln!("{}", "Listing cancelled".yellow());
            Ok(ExitCode::SUCCESS)
        }
        JobOutcome::Failed(_) => Ok(ExitCode::FAILURE),
    }
}
