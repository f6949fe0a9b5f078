mod bootstrap;
mod commands;

use clap::{Parser, Subcommand};
use commands::serve::ServeOptions;
use docsearch_core::{load_dotenv, AppConfig, AppConfigTrait, SERVICE_NAME, VERSION};
use docsearch_http::{init_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(name = "docsearch")]
#[command(version, about = "Upload text documents and search them by TF-IDF relevance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind host (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides PORT)
        #[arg(long, short)]
        port: Option<u16>,

        /// Do not apply pending migrations on startup
        #[arg(long)]
        no_migrate: bool,
    },

    /// Database schema management
    Migrate {
        #[command(subcommand)]
        migrate_command: MigrateCommands,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommands {
    /// Apply pending migrations
    Run,

    /// Revert the most recent batch
    Rollback,

    /// List every migration and whether it is applied
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv_path = load_dotenv();
    let config = AppConfig::from_env()?;

    init_logging(LoggingConfig::from_app_config(&config).with_service(SERVICE_NAME, VERSION))
        .map_err(|e| anyhow::anyhow!(e))?;
    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_migrate,
        } => {
            let options = ServeOptions {
                host,
                port,
                no_migrate,
            };
            commands::serve::run(config, options).await?;
        }
        Commands::Migrate { migrate_command } => match migrate_command {
            MigrateCommands::Run => commands::migrate::run(&config).await?,
            MigrateCommands::Rollback => commands::migrate::rollback(&config).await?,
            MigrateCommands::Status => commands::migrate::status(&config).await?,
        },
    }

    Ok(())
}
