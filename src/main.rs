use std::env;

use textile_billing::api::{AppState, create_router};
use textile_billing::config::ConfigLoader;
use tracing::info;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textile_billing=info".into()),
        )
        .init();

    let config_dir =
        env::var("TEXTILE_BILLING_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = env::var("TEXTILE_BILLING_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        company = %config.company().name,
        process_types = config.config().process_type_count(),
        "Loaded configuration"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
