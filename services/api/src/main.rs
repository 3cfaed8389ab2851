use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use autovault_api::config::ApiConfig;
use autovault_api::infra::places::GooglePlacesClient;
use autovault_api::infra::realtime::BroadcastHub;
use autovault_api::infra::sms::TwilioSmsGateway;
use autovault_api::router::build_router;
use autovault_api::state::AppState;
use autovault_auth_types::token::CredentialVerifier;
use autovault_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ApiConfig::from_env().context("load configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let verifier = CredentialVerifier::new(&config.jwt_secret, config.jwt_audience.as_deref());
    let http = reqwest::Client::new();
    let sms = TwilioSmsGateway::new(http.clone(), config.twilio_credentials());
    let places = GooglePlacesClient::new(http, config.google_maps_api_key.clone(), None);
    let realtime = BroadcastHub::new(config.realtime_channel_capacity);

    let state = AppState::postgres(db, verifier, sms, places, realtime);
    let router = build_router(state);

    let http_addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    info!("autovault api listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
