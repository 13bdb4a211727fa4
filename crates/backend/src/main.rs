use std::net::SocketAddr;
use tokio::net::TcpListener;

use backend::domain::a009_billing;
use backend::routes::configure_routes;
use backend::shared::config::{get_database_path, load_config};
use backend::shared::context::AppContext;
use backend::shared::data::db::initialize_database;
use backend::system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = load_config()?;
    if config.auth.jwt_secret.is_empty() {
        tracing::warn!("auth.jwt_secret is empty; every authenticated request will be rejected");
    }

    let db_path = get_database_path(&config)?;
    let db = initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    a009_billing::service::seed_default_plans(&db).await?;

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind '{}': {e}", config.server.bind))?;

    let ctx = AppContext::new(db, config)?;
    let app = configure_routes(ctx);

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: {} is already in use. Please ensure no other process is using this port.",
                    addr
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
