use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::RwLock;

use team_roster::{
    app_state::AppState,
    get_postgres_pool,
    services::data_stores::PostgresRosterStore,
    utils::{
        constants::{prod, DATABASE_URL},
        tracing::init_tracing,
    },
    Application,
};

#[tokio::main]
async fn main() {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");

    let pg_pool = configure_postgresql().await;
    let roster_store =
        Arc::new(RwLock::new(PostgresRosterStore::new(pg_pool)));
    let app_state = AppState::new(roster_store);

    let app = Application::build(app_state, prod::APP_ADDRESS)
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

async fn configure_postgresql() -> PgPool {
    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .expect("Failed to create Postgres connection pool!");

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("Failed to run migrations");

    pg_pool
}
