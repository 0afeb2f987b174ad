//! Database setup commands.

use texdocs::{Database, DatabaseConfig, database};

use crate::cli::ResetArgs;
use crate::output::OutputFormat;

/// Run the `init` command
pub async fn init(
    config: &DatabaseConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let existed = database::exists(&config.path).await;
    let db = Database::open_with_config(config).await?;
    db.close().await;
    if existed {
        tracing::info!(path = %config.path.display(), "Opened existing database");
    } else {
        tracing::info!(path = %config.path.display(), "Created database");
    }

    let path = config.path.display().to_string();
    match format {
        OutputFormat::Human if existed => println!("Database already exists at {path}"),
        OutputFormat::Human => println!("Created database at {path}"),
        OutputFormat::Json => {
            let value = serde_json::json!({ "path": path, "created": !existed });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the `reset` command
pub async fn reset(
    config: &DatabaseConfig,
    args: &ResetArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes {
        return Err("refusing to reset without --yes".into());
    }
    if !database::exists(&config.path).await {
        return Err(format!("no database at {}", config.path.display()).into());
    }

    let db = Database::open_with_config(config).await?;
    db.reset().await?;
    db.close().await;
    tracing::info!(path = %config.path.display(), "Reset database");

    match format {
        OutputFormat::Human => println!("Database reset"),
        OutputFormat::Json => println!("{}", serde_json::json!({ "reset": true })),
    }
    Ok(())
}
