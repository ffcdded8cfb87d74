use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use employee_gateway::api::{create_router, AppState};
use employee_gateway::backend::BackendClient;
use employee_gateway::cache::SnapshotCache;
use employee_gateway::config::AppConfig;
use employee_gateway::logging::{init_logging, LoggingConfig};
use employee_gateway::service::EmployeeService;

#[derive(Parser, Debug)]
#[command(name = "employee-gateway")]
#[command(version)]
#[command(about = "Resilient facade over a rate-limited upstream employee service")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to bind the API server to (overrides configuration)
    #[arg(long, value_name = "ADDRESS")]
    bind: Option<String>,

    /// Port to listen on (overrides configuration)
    #[arg(long, short)]
    port: Option<u16>,

    /// Upstream employee service URL (overrides configuration)
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Suppress all output except warnings and errors
    #[arg(long, short)]
    quiet: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig, employee_gateway::config::ConfigError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::from_env()?,
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.backend_url {
            config.backend.url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_flags(cli.verbose, cli.quiet));

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cache = SnapshotCache::shared();
    let client = BackendClient::from_config(&config.backend, cache)?;
    let service = EmployeeService::new(Arc::new(client));
    let app = create_router(AppState::new(service));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        address = %addr,
        upstream = %config.backend.url,
        max_retries = config.backend.max_retries,
        "Employee gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Employee gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
