use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the users, activities_calendar and journal tables")]
    Init,

    #[command(about = "Check that the configured store answers")]
    Ping,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config().database;

    match cmd {
        DbCommands::Init => {
            let applied = DatabaseManager::init_schema(database).await?;
            output_format.emit(
                &format!("Applied {} schema statements", applied),
                &json!({ "applied": applied }),
            )
        }
        DbCommands::Ping => {
            let store = DatabaseManager::connect(database).await?;
            store.ping().await?;
            output_format.emit("Store is reachable", &json!({ "status": "ok" }))
        }
    }
}
