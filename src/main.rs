//! LINE visitor relay entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use line_visitor_relay::api::{serve, AppState};
use line_visitor_relay::config::Config;
use line_visitor_relay::line::LineClient;
use line_visitor_relay::metrics;

/// Relays website visitor notifications and LINE webhook replies.
#[derive(Parser, Debug)]
#[command(name = "line-visitor-relay")]
#[command(about = "Forwards website visits and LINE webhook events through the LINE Messaging API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Push a test message through the LINE API.
    Push {
        /// Recipient id; defaults to LINE_TARGET_ID.
        #[arg(long)]
        to: Option<String>,

        /// Message text.
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Let .env feed both clap's env fallbacks and Config
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("line_visitor_relay=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if args.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port).await,
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Push { to, text }) => cmd_push(to, text).await,
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration, logging the reason on failure.
fn load_config() -> anyhow::Result<Config> {
    Config::from_env().map_err(|e| {
        error!("{}", e);
        anyhow::anyhow!("Configuration failed: {}", e)
    })
}

/// Serve HTTP until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port);

    info!("Configuration loaded successfully");
    info!("LINE API: {}", config.api_base_url());
    info!("Notification target: {}", config.line_target_id);
    match &config.cors_allowed_origin {
        Some(origin) => info!("CORS origin: {}", origin),
        None => warn!("CORS_ALLOWED_ORIGIN not set, allowing any origin"),
    }

    let mut app_state = AppState::new(&config)?;
    if config.metrics_enabled {
        if let Some(handle) = metrics::install_prometheus() {
            app_state = app_state.with_metrics(handle);
        }
    }

    serve(app_state, port).await?;
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("LINE VISITOR RELAY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Building LINE client... ");
    match LineClient::new(&config) {
        Ok(_) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("LINE client construction failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  LINE API: {}", config.api_base_url());
    println!("  Target ID: {}", config.line_target_id);
    println!("  Timeout: {}ms", config.line_http_timeout_ms);
    println!("  Port: {}", config.port);
    println!(
        "  CORS Origin: {}",
        config.cors_allowed_origin.as_deref().unwrap_or("* (any)")
    );
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Push one message, for checking the token and recipient end to end.
async fn cmd_push(to: Option<String>, text: String) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = LineClient::new(&config)?;
    let to = to.unwrap_or_else(|| config.line_target_id.clone());

    print!("Pushing message to {}... ", to);
    match client.push(&to, &text).await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            Err(anyhow::anyhow!("Push failed"))
        }
    }
}
