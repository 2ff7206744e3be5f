use axum::http::header::SET_COOKIE;
use axum_test::{TestResponse, TestServer};
use cookie::Cookie;
use sea_orm::{ConnectOptions, Database};

use timesheet::build_router;
use timesheet::config::{Config, Environment};
use timesheet::entity::schema;
use timesheet::services::SessionData;
use timesheet::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        // Every pool gets its own private in-memory database
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        session_secret: "test-session-secret-that-is-long-enough".to_string(),
        session_expiration_hours: 1,
        session_cookie_name: "_timesheet_test".to_string(),
        bcrypt_cost: 4,
        environment: Environment::Test,
        assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application on a fresh in-memory database
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .expect("Failed to open test database");
        schema::create_tables(&db)
            .await
            .expect("Failed to create test schema");

        let state = AppState::with_connection(db, config);
        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }

    /// Session written by the response, if it set the session cookie
    pub fn session_of(&self, response: &TestResponse) -> Option<SessionData> {
        let cookie_name = self.state.sessions.cookie_name();

        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| Cookie::parse(raw.to_string()).ok())
            .filter(|cookie| cookie.name() == cookie_name)
            .last()
            .and_then(|cookie| self.state.sessions.decode(cookie.value()))
    }

    /// Flash messages the response left in the session
    pub fn flashes_of(&self, response: &TestResponse) -> Vec<String> {
        self.session_of(response)
            .map(|data| data.flash.into_iter().map(|f| f.message).collect())
            .unwrap_or_default()
    }
}

/// `Location` header of a redirect
#[allow(dead_code)]
pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(axum::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
