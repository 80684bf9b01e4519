use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::RequestArgs;

#[derive(Parser)]
#[command(
    name = "fleet",
    about = "FleetGrid — instance type catalog and capacity resolution",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Catalog configuration (TOML). Built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every instance type in the catalog
    Catalog {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Resolve a capacity request against the catalog.
    ///
    /// Prints the eligible instance types in catalog order. With
    /// --explain, every candidate is listed with its rejection reason.
    Resolve {
        #[command(flatten)]
        request: RequestArgs,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Show why each instance type was accepted or rejected
        #[arg(long)]
        explain: bool,
    },
    /// Dry-run a node creation against the in-memory provisioner
    Provision {
        #[command(flatten)]
        request: RequestArgs,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

const DEFAULT_LOG_FILTER: &str = "fleet=info";

/// `RUST_LOG` when set and valid, otherwise [`DEFAULT_LOG_FILTER`].
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Catalog { format } => commands::catalog::list(&config, &format),
        Commands::Resolve {
            request,
            format,
            explain,
        } => commands::resolve::resolve(&config, request, &format, explain),
        Commands::Provision { request, format } => {
            commands::provision::provision(&config, request, &format).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_replaces_default_filter() {
        let filter = log_filter(Some("debug")).to_string().to_lowercase();
        assert!(filter.contains("debug"));
        assert!(!filter.contains("fleet"));
    }

    #[test]
    fn default_filter_when_rust_log_unset_or_empty() {
        assert!(log_filter(None).to_string().starts_with("fleet="));
        assert!(log_filter(Some("")).to_string().starts_with("fleet="));
    }
}
