use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::models::Users;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user (the only way to create an admin)")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Grant admin rights")]
        admin: bool,
    },

    #[command(about = "Show a user")]
    Show {
        #[arg(help = "Username")]
        username: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = DatabaseManager::connect(&config().database).await?;
    let users = Users::new(store);

    match cmd {
        UserCommands::Add {
            username,
            password,
            admin,
        } => {
            let user = users.add(&username, &password, admin).await?;
            output_format.emit(
                &format!("Created user {} (admin: {})", user.username, user.is_admin),
                &json!({ "user": user }),
            )
        }
        UserCommands::Show { username } => {
            let user = users.get(&username).await?;
            output_format.emit(
                &format!("{} (admin: {})", user.username, user.is_admin),
                &json!({ "user": user }),
            )
        }
    }
}
