use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use holiday_calendar::backend::{create_router, initialize_backend};
use holiday_calendar::backend::storage::RemoteConfig;
use holiday_calendar::config::{AppArgs, AppConfig};
use holiday_calendar::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let args = AppArgs::parse();
    let config = AppConfig::from_args(args, RemoteConfig::from_env())?;

    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(config.bind).await?;
    info!("🚀 Calendar API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
