//! Account commands.

use texdocs::account::{self, CreateAccount, Credentials};
use texdocs::{Database, DatabaseConfig};

use crate::cli::{AccountCreateArgs, AccountLoginArgs};
use crate::output::OutputFormat;

/// Run the `account create` command
pub async fn create(
    config: &DatabaseConfig,
    args: &AccountCreateArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_with_config(config).await?;
    let input = CreateAccount::new(&args.name, &args.password)
        .admin(args.admin)
        .public(args.public);
    let id = account::create(&db, &input).await?;
    db.close().await;

    match format {
        OutputFormat::Human => println!("Created account {} with id {id}", args.name),
        OutputFormat::Json => {
            let value = serde_json::json!({ "id": id, "name": args.name });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the `account login` command. A wrong password exits with an error.
pub async fn login(
    config: &DatabaseConfig,
    args: &AccountLoginArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_with_config(config).await?;
    let result = account::check_login(&db, &Credentials::new(&args.name, &args.password)).await?;
    db.close().await;

    let Some(id) = result else {
        return Err("password does not match".into());
    };
    match format {
        OutputFormat::Human => println!("Login ok: account {id}"),
        OutputFormat::Json => println!("{}", serde_json::json!({ "id": id })),
    }
    Ok(())
}
