use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use tokio::sync::RwLock;

use recipe_api::{
    app_state::AppState,
    get_postgres_pool, run_migrations,
    services::data_stores::{PostgresRecipeStore, PostgresUserStore},
    utils::{
        constants::{APP_ADDRESS, DATABASE_URL},
        tracing::init_tracing,
    },
    Application,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let pg_pool = get_postgres_pool(&DATABASE_URL).await?;
    run_migrations(&pg_pool).await?;

    let user_store =
        Arc::new(RwLock::new(PostgresUserStore::new(pg_pool.clone())));
    let recipe_store = Arc::new(RwLock::new(PostgresRecipeStore::new(pg_pool)));

    let app_state = AppState::new(user_store, recipe_store);

    let app = Application::build(app_state, &APP_ADDRESS)
        .await
        .map_err(|e| eyre!("Failed to build app: {e}"))?;

    app.run().await?;
    Ok(())
}
