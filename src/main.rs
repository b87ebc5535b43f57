//! VIP Bot server entry point
//!
//! Configuration is read from `VIP_BOT__*` environment variables (and `.env`
//! in development). See `vip_bot::config` for the full list.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing::{error, info};

use vip_bot::adapters::coingecko::{CoinGeckoConfig, CoinGeckoPriceSource};
use vip_bot::adapters::http::{app_router, AppState};
use vip_bot::adapters::paystack::{PaystackConfig, PaystackPaymentAdapter};
use vip_bot::adapters::postgres::PostgresMembershipStore;
use vip_bot::adapters::telegram::{self, TelegramMessenger};
use vip_bot::application::handlers::bot::BotCommandHandler;
use vip_bot::application::handlers::membership::{
    ExpirySweep, ExpirySweepConfig, HandlePaymentWebhookHandler, MembershipController,
};
use vip_bot::application::handlers::pricing::{PriceCache, PriceRefresher};
use vip_bot::config::AppConfig;
use vip_bot::domain::membership::WebhookVerifier;
use vip_bot::ports::{MembershipStore, Messenger, PaymentProvider, PriceSource};
use vip_bot::telemetry::try_init_tracing;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing(&config.server.log_level, config.is_production()) {
        eprintln!("Warning: Failed to initialize tracing: {}", e);
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    info!(
        environment = ?config.server.environment,
        port = config.server.port,
        vip_group = config.telegram.vip_group.is_some(),
        "Configuration loaded"
    );

    // Database
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(config.database.url.expose_secret())
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let store: Arc<dyn MembershipStore> = Arc::new(PostgresMembershipStore::new(pool));

    // Outbound collaborators
    let mut telegram_config = telegram::TelegramConfig::new(config.telegram.bot_token.clone())
        .with_base_url(config.telegram.api_base_url.clone())
        .with_timeout(config.telegram.request_timeout());
    if let Some(group) = &config.telegram.vip_group {
        telegram_config = telegram_config.with_vip_group(group.clone());
    }
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(telegram_config)?);

    let paystack_config = PaystackConfig::new(
        config.payment.paystack_secret_key.clone(),
        config.payment.callback_url(),
    )
    .with_base_url(config.payment.api_base_url.clone())
    .with_timeout(config.payment.request_timeout());
    let payments: Arc<dyn PaymentProvider> = Arc::new(PaystackPaymentAdapter::new(paystack_config)?);

    let price_source: Arc<dyn PriceSource> = Arc::new(CoinGeckoPriceSource::new(CoinGeckoConfig {
        api_url: config.pricing.api_url.clone(),
        timeout: config.pricing.request_timeout(),
        ..CoinGeckoConfig::default()
    })?);

    // Application
    let controller = Arc::new(MembershipController::new(
        store.clone(),
        config.membership_policy(),
    ));
    let prices = Arc::new(PriceCache::new(config.pricing.freshness_policy()));

    let webhook_handler = Arc::new(HandlePaymentWebhookHandler::new(
        WebhookVerifier::new(config.payment.paystack_secret_key.clone()),
        controller.clone(),
        messenger.clone(),
    ));
    let bot_handler = Arc::new(BotCommandHandler::new(
        controller.clone(),
        messenger.clone(),
        payments,
        prices.clone(),
    ));

    // Background tasks
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweep = ExpirySweep::new(
        controller.clone(),
        messenger.clone(),
        ExpirySweepConfig {
            interval: config.membership.sweep_interval(),
        },
    );
    let sweep_task = tokio::spawn({
        let shutdown = shutdown_rx.clone();
        async move { sweep.run(shutdown).await }
    });

    let refresher = PriceRefresher::new(price_source, prices, config.pricing.refresh_interval());
    let refresher_task = tokio::spawn({
        let shutdown = shutdown_rx.clone();
        async move { refresher.run(shutdown).await }
    });

    // HTTP
    let state = AppState::new(
        store,
        webhook_handler,
        bot_handler,
        config.telegram.bot_token.clone(),
    );
    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, waiting for background tasks");
    let _ = shutdown_tx.send(true);
    let _ = tokio::join!(sweep_task, refresher_task);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
