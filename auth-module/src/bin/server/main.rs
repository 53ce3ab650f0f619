use auth_module::config::Config;
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
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_module=debug,auth_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-server",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        algorithm = %config.auth.algorithm,
        token_lifetime_minutes = config.auth.token_lifetime_minutes,
        "Configuration loaded"
    );

    let settings = AuthSettings::try_from(&config.auth)?;
    let auth = AuthModule::connect(settings, &config.database).await?;

    let host_routes = Router::new()
        .route("/", get(hello))
        .merge(
            Router::new()
                .route("/me", get(me))
                .route_layer(middleware::from_fn_with_state(
                    auth.authenticator(),
                    require_auth,
                )),
        );
    let application = auth.mount(host_routes);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "hello" }))
}

async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<Value> {
    Json(json!({
        "id": user.user_id.0,
        "email": user.email.as_str(),
    }))
}
