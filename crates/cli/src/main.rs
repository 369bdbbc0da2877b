mod channel_commands;
mod config_commands;
mod studio_commands;

use std::path::PathBuf;

use {
    aistudio_config::{RuntimeMode, StudioConfig},
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "aistudio", about = "AI Studio gateway for content-generation webhooks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./aistudio.toml and friends).
    #[arg(long, global = true, env = "AISTUDIO_CONFIG")]
    config: Option<PathBuf>,

    // Server arguments (used when no subcommand is provided, or with `serve`)
    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Runtime mode: development or production (overrides config value).
    #[arg(long, global = true)]
    mode: Option<RuntimeMode>,

    /// Gateway base URL used by the client subcommands.
    #[arg(
        long,
        global = true,
        env = "AISTUDIO_GATEWAY_URL",
        default_value = aistudio_client::DEFAULT_GATEWAY_URL
    )]
    gateway_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server (default when no subcommand is provided).
    Serve,
    /// Generate social media posts from a URL or text.
    SocialMedia {
        /// Blog URL or content text.
        text: String,
        /// 6-digit access PIN.
        #[arg(long, env = "AISTUDIO_CLIENT_PIN")]
        pin: String,
    },
    /// Generate a podcast episode and print the audio URL.
    Podcast {
        /// Podcast topic.
        topic: String,
    },
    /// Generate a thumbnail and print the image URL.
    Thumbnail {
        /// Thumbnail description/prompt.
        prompt: String,
    },
    /// Query the gateway health endpoints.
    Health,
    /// Show the resolved channel table.
    Channels,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Defaults, then config file, then process environment, then CLI flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<StudioConfig> {
    let config = match cli.config {
        Some(ref path) => aistudio_config::load_config(path)?,
        None => aistudio_config::discover_and_load(),
    };
    let mut config = aistudio_config::apply_env_overrides(config)?;

    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(mode) = cli.mode {
        config.server.mode = mode;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    match cli.command {
        // Default: start the server when no subcommand is provided
        None | Some(Commands::Serve) => {
            info!(version = env!("CARGO_PKG_VERSION"), "aistudio starting");
            let config = resolve_config(&cli)?;
            aistudio_gateway::start_gateway(&config).await
        },
        Some(Commands::SocialMedia { ref text, ref pin }) => {
            studio_commands::social_media(&cli.gateway_url, text, pin).await
        },
        Some(Commands::Podcast { ref topic }) => {
            studio_commands::podcast(&cli.gateway_url, topic).await
        },
        Some(Commands::Thumbnail { ref prompt }) => {
            studio_commands::thumbnail(&cli.gateway_url, prompt).await
        },
        Some(Commands::Health) => studio_commands::health(&cli.gateway_url).await,
        Some(Commands::Channels) => channel_commands::list(&resolve_config(&cli)?),
        Some(Commands::Config { ref action }) => {
            config_commands::handle_config(action, cli.config.as_deref(), || resolve_config(&cli))
        },
    }
}
