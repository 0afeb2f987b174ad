use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

mod commands {
    pub mod account;
    pub mod db;
    pub mod document;
}

use cli::{AccountCommands, Cli, Commands, DocumentCommands};
use output::OutputFormat;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("texdocs=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let config = cli.database.config();

    match cli.command {
        Commands::Init => commands::db::init(&config, format).await,
        Commands::Reset(args) => commands::db::reset(&config, &args, format).await,
        Commands::Account(AccountCommands::Create(args)) => {
            commands::account::create(&config, &args, format).await
        }
        Commands::Account(AccountCommands::Login(args)) => {
            commands::account::login(&config, &args, format).await
        }
        Commands::Document(DocumentCommands::List(args)) => {
            commands::document::list(&config, &args, format).await
        }
    }
}
