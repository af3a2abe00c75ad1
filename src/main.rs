//! switchkit - Guild settings service for plural identity proxying
//!
//! Serves per-guild configuration for systems and their members over HTTP,
//! backed by JSON collection files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use switchkit::api::build_app;
use switchkit::config::AppConfig;
use switchkit::guilds::{GuildSettingsStore, GuildsState, SettingsService};
use switchkit::ids::{ChannelId, GuildId, MessageId, UserId};
use switchkit::messages::{Message, MessageStore, MessagesState};
use switchkit::systems::{SystemStore, SystemsState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "switchkit")]
#[command(version)]
#[command(about = "Guild settings service for plural identity proxying")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SWITCHKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write demo data to the data directory
    Seed,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config: AppConfig = if let Some(config_path) = &cli.config {
        let content = std::fs::read_to_string(config_path)?;
        toml::from_str(&content)?
    } else {
        AppConfig::default()
    };

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("switchkit={},tower_http=debug", log_level).into());
    if config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_serve(config).await?;
        }
        Commands::Seed => {
            run_seed(config).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_serve(config: AppConfig) -> Result<()> {
    tracing::info!("Starting switchkit");

    let data_dir = config.storage.data_dir.clone();
    let systems = Arc::new(SystemStore::new(data_dir.clone()).await?);
    let guilds = Arc::new(GuildSettingsStore::new(data_dir.clone()).await?);
    let messages = Arc::new(MessageStore::new(data_dir).await?);

    let app = build_app(
        SystemsState {
            store: systems.clone(),
        },
        GuildsState {
            systems: systems.clone(),
            service: SettingsService::new(systems.clone(), guilds),
        },
        MessagesState { systems, messages },
        &config.server.cors_origins,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}. Press Ctrl+C to stop.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

/// Create a demo system with two members, settings rows in one guild, and a
/// proxied message, then print everything needed to exercise the API.
async fn run_seed(config: AppConfig) -> Result<()> {
    let data_dir = config.storage.data_dir.clone();
    let systems = SystemStore::new(data_dir.clone()).await?;
    let guilds = GuildSettingsStore::new(data_dir.clone()).await?;
    let messages = MessageStore::new(data_dir.clone()).await?;

    let system = systems
        .create_system(Some("Demo system".to_string()), Some("| demo".to_string()))
        .await;
    let ruby = systems.create_member(system.id, "Ruby").await;
    let sapphire = systems.create_member(system.id, "Sapphire").await;

    // The REST paths never create settings rows, so seed them through the
    // default-insert reads.
    let guild = GuildId(466707357099884544);
    guilds.system_guild(system.id, guild, true).await;
    guilds.member_guild(ruby.id, guild, true).await;
    guilds.member_guild(sapphire.id, guild, true).await;

    let mid = MessageId(175928847299117063);
    messages
        .insert(Message {
            mid,
            channel: ChannelId(81385020756865024),
            sender: UserId(80351110224678912),
            member: Some(ruby.id),
            original_mid: Some(MessageId(175928845201965063)),
        })
        .await;

    systems.flush().await?;
    guilds.flush().await?;
    messages.flush().await?;

    println!("Seeded demo data into {}", data_dir.display());
    println!();
    println!("  system   {}  ({})", system.hid, system.name.as_deref().unwrap_or("unnamed"));
    println!("  token    {}", system.token.as_deref().unwrap_or_default());
    println!("  members  {} (Ruby), {} (Sapphire)", ruby.hid, sapphire.hid);
    println!("  guild    {}", guild);
    println!("  message  {}", mid);
    println!();
    println!("Try:");
    println!("  curl http://127.0.0.1:8830/systems/{}", system.hid);
    println!(
        "  curl -H 'Authorization: <token>' http://127.0.0.1:8830/systems/@me/guilds/{}",
        guild
    );
    println!("  curl http://127.0.0.1:8830/messages/{}", mid);

    Ok(())
}

fn show_config(config: Option<&AppConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
