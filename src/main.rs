use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use chatroom::config::ServerConfig;
use chatroom::server::{self, MigrateDirection};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the GraphQL server
    Serve {
        /// YAML file with server settings; flags below override it
        #[clap(short, long)]
        config: Option<String>,
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Apply or roll back schema migrations
    Migrate {
        #[clap(value_enum)]
        direction: MigrateDirection,
        #[clap(short, long, default_value = "chatroom.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Commands::Serve {
            config,
            port,
            database,
            cors_origin,
        } => {
            let mut settings = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(database) = database {
                settings.database = database;
            }
            if cors_origin.is_some() {
                settings.cors_origin = cors_origin;
            }
            if let Some(log_level) = args.log_level {
                settings.log_level = log_level;
            }

            setup_logging(&settings.log_level);
            info!("Starting server on port {}", settings.port);
            server::start_server(&settings).await?;
        }
        Commands::Migrate {
            direction,
            database,
        } => {
            setup_logging(args.log_level.as_deref().unwrap_or("info"));
            server::migrate_database(&database, direction).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    let log_level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // sqlx logs every statement at info
    let filter = if log_level >= Level::DEBUG {
        log_level.to_string()
    } else {
        format!("sqlx=warn,{}", log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}
