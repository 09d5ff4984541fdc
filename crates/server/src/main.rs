use anyhow::Context;
use bourse_server::{AppState, create_router};
use bourse_settlement::{Bourse, BourseConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Bourse - simulated securities exchange, order-to-settlement backend

USAGE:
    bourse [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --json-logs         Emit logs as JSON lines
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 8080)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with the built-in demo data
    bourse

    # Run with config file
    bourse --config bourse.json

    # Run with custom port
    PORT=9000 bourse
"#
    );
}

fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bourse=info,audit=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Args {
    config_path: Option<String>,
    json_logs: bool,
    help: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => parsed.help = true,
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--config requires a path argument"))?;
                    parsed.config_path = Some(path);
                }
                "--json-logs" => parsed.json_logs = true,
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }
        Ok(parsed)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };
    if args.help {
        print_help();
        return Ok(());
    }

    init_tracing(args.json_logs);

    let config = if let Some(path) = args.config_path {
        tracing::info!("Loading configuration from: {}", path);
        BourseConfig::from_file(&path).with_context(|| format!("loading {}", path))?
    } else {
        let mut config = BourseConfig::demo();
        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }
        tracing::info!("Using demo configuration");
        config
    };

    tracing::info!("Exchange: {}", config.name);
    tracing::info!("Instruments: {}", config.instruments.len());
    tracing::info!("Accounts: {}", config.accounts.len());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let bourse = Bourse::from_config(config)
        .await
        .context("seeding trading accounts")?;

    let state = Arc::new(AppState::new(Arc::new(bourse)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("REST API: http://{}/api/v1/", addr);
    tracing::info!("Admin API: http://{}/admin/", addr);
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /api/v1/ping");
    tracing::info!("  POST /api/v1/orders");
    tracing::info!("  POST /api/v1/trading/orders");
    tracing::info!("  GET  /api/v1/accounts/{{id}}[/positions|/ledger|/orders|/reconciliation]");
    tracing::info!("  POST /admin/accounts/{{id}}/deposit");
    tracing::info!("  PUT  /admin/prices/{{instrumentId}}");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        Args::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse(&[]).unwrap(), Args::default());

        let args = parse(&["--json-logs", "-c", "bourse.json"]).unwrap();
        assert!(args.json_logs);
        assert_eq!(args.config_path.as_deref(), Some("bourse.json"));
        assert!(parse(&["--help"]).unwrap().help);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
    }
}
