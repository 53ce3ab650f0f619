use std::sync::Arc;

use auth::Authenticator;
use auth_module::domain::user::service::DefaultUserHooks;
use auth_module::outbound::repositories::SqliteUserRepository;
use auth_module::require_auth;
use auth_module::AuthModule;
use auth_module::AuthSettings;
use auth_module::AuthenticatedUser;
use axum::middleware;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use axum::Router;
use serde_json::json;
use serde_json::Value;
use sqlx::SqlitePool;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub pool: SqlitePool,
    pub api_client: reqwest::Client,
    pub authenticator: Authenticator,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let repository = SqliteUserRepository::in_memory()
            .await
            .expect("Failed to open in-memory database");
        repository.migrate().await.expect("Failed to run migrations");
        let pool = repository.pool().clone();

        let module = AuthModule::new(
            AuthSettings::new(TEST_SECRET),
            DefaultUserHooks::new(Arc::new(repository)),
        )
        .expect("Failed to build auth module");

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let host_routes = Router::new().route("/me", get(me)).route_layer(
            middleware::from_fn_with_state(module.authenticator(), require_auth),
        );
        let router = module.mount(host_routes);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            pool,
            api_client: reqwest::Client::new(),
            authenticator: Authenticator::new(TEST_SECRET.as_bytes()),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the raw response
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/register")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the raw response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Number of stored rows for an email
    pub async fn count_users(&self, email: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count users")
    }
}

async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<Value> {
    Json(json!({
        "id": user.user_id.0,
        "email": user.email.as_str(),
    }))
}
