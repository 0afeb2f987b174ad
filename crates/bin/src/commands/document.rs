//! Document commands.

use texdocs::account::AccountId;
use texdocs::document;
use texdocs::{Database, DatabaseConfig};

use crate::cli::DocumentListArgs;
use crate::output::{OutputFormat, print_table};

/// Run the `document list` command
pub async fn list(
    config: &DatabaseConfig,
    args: &DocumentListArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_with_config(config).await?;
    let documents = document::get_all_from_owner(&db, AccountId(args.owner), args.contents).await?;
    db.close().await;

    match format {
        OutputFormat::Human => {
            if documents.is_empty() {
                println!("No documents found.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = documents
                .iter()
                .map(|doc| {
                    vec![
                        doc.id.to_string(),
                        doc.title.clone(),
                        doc.authors.clone().unwrap_or_default(),
                        doc.group.map(|g| g.to_string()).unwrap_or_default(),
                        doc.public.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "TITLE", "AUTHORS", "GROUP", "PUBLIC"], &rows);
            if args.contents {
                for doc in &documents {
                    println!();
                    println!("--- {} ---", doc.id);
                    println!("{}", doc.content.as_deref().unwrap_or_default());
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&documents)?),
    }
    Ok(())
}
