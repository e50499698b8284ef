use std::sync::Arc;

use reqwest::Client;
use team_roster::{
    app_state::{AppState, RosterStoreType},
    services::data_stores::VecRosterStore,
    utils::constants::test,
    Application,
};
use test_context::AsyncTestContext;
use tokio::sync::RwLock;

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub roster_store: RosterStoreType,
}

impl TestApp {
    pub async fn new() -> Self {
        // The single endpoint touches no storage, so the in-memory store
        // stands in for Postgres and no external services are needed.
        let roster_store: RosterStoreType =
            Arc::new(RwLock::new(VecRosterStore::default()));
        let app_state = AppState::new(roster_store.clone());

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let http_client = Client::new();

        Self {
            address,
            http_client,
            roster_store,
        }
    }

    pub async fn get_hello(&self) -> reqwest::Response {
        self.http_client
            .get(format!("{}/hello", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }
}
