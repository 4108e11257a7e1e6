//! Chat bot process: long-polls the Bot API and answers task commands until
//! Ctrl-C.

use std::sync::Arc;

use tasktrack::{
    app::{Services, shutdown_signal},
    chat::{ChatBot, CommandRouter},
    config::AppConfig,
    logging,
    persistence::{build_pool, migrate},
    telegram::TelegramClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;
    logging::init(config.log_format)?;

    let pool = build_pool(&config.database_url, config.database_max_connections)?;
    migrate(&pool).await?;

    let client = TelegramClient::new(config.telegram.clone())?;
    let transport = Arc::new(client.clone());
    let services = Arc::new(Services::postgres(&pool, Arc::clone(&transport)));
    let router = CommandRouter::standard(&services);

    ChatBot::new(client, transport, router)
        .run(shutdown_signal())
        .await;
    Ok(())
}
