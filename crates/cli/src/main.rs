mod config_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    secrecy::Secret,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "tollgate", about = "Tollgate: session-gated realtime gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Only look for tollgate.{toml,yaml,yml,json} in this directory.
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server.
    Gateway {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Port shown in the rendered view.
        #[arg(long, env = "PORT")]
        display_port: Option<u16>,
        /// Session cookie signing key.
        #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
        secret_key: Option<String>,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    if let Some(dir) = &cli.config_dir {
        tollgate_config::set_config_dir(dir.clone());
    }

    info!(version = env!("CARGO_PKG_VERSION"), "tollgate starting");

    match cli.command {
        Commands::Gateway {
            bind,
            port,
            display_port,
            secret_key,
        } => {
            let mut config = tollgate_config::discover_and_load();
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if display_port.is_some() {
                config.server.display_port = display_port;
            }
            if let Some(secret) = secret_key.filter(|s| !s.is_empty()) {
                config.session.secret_key = Some(Secret::new(secret));
            }
            tollgate_gateway::server::start_gateway(config).await
        },
        Commands::Config { action } => config_commands::handle_config(action),
    }
}
