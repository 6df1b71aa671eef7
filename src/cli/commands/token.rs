use serde_json::json;

use crate::auth::create_token;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::models::Users;
use crate::database::DatabaseManager;

/// Mint a token for an existing user without knowing their password
pub async fn handle(username: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config();
    let store = DatabaseManager::connect(&config.database).await?;
    let user = Users::new(store).get(&username).await?;

    let token = create_token(&user.username, user.is_admin, &config.security)?;

    output_format.emit(&token, &json!({ "token": token }))
}
