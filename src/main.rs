use clap::Parser;
use std::path::PathBuf;

use branch_proxy::modules::{self, config::default_config_path};

/// GitHub API proxy for repository branch management
#[derive(Parser, Debug)]
#[command(name = "branch-proxy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to ~/.branch_proxy/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind 0.0.0.0 instead of 127.0.0.1
    #[arg(long)]
    allow_lan: bool,

    /// Upstream GitHub API base URL
    #[arg(long)]
    api_base_url: Option<String>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = modules::load_app_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.proxy.port = port;
    }
    if args.allow_lan {
        config.proxy.allow_lan_access = true;
    }
    if let Some(url) = args.api_base_url {
        config.proxy.github.api_base_url = url;
    }

    if args.write_config {
        let path = match args.config {
            Some(path) => path,
            None => default_config_path()?,
        };
        let written = modules::save_app_config(&config, Some(path.as_path()))?;
        println!("Configuration written to {}", written.display());
        return Ok(());
    }

    let _log_guard = modules::init_logger(config.file_logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting branch proxy");

    branch_proxy::run(config).await?;
    Ok(())
}
