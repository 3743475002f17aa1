//! EventSub webhook receiver.
//!
//! Loads configuration from the environment, builds the dispatch table for
//! the bundled event types, and serves the webhook endpoint. When provider
//! credentials are configured it also lists the current subscriptions once
//! at startup and logs quota usage.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eventsub::adapters::http::webhook_routes;
use eventsub::adapters::{
    DispatchTable, HelixConfig, HelixSubscriptionClient, InMemoryMessageTracker,
    NotificationHandler, StaticCredentials,
};
use eventsub::config::AppConfig;
use eventsub::domain::events::{ChannelFollow, ChannelUpdate, StreamOffline, StreamOnline};
use eventsub::domain::Notification;
use eventsub::ports::SubscriptionManager;
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let table = dispatch_table();
    for key in table.supported() {
        tracing::info!(
            subscription_type = %key.event_type,
            subscription_version = %key.version,
            "Registered notification handler"
        );
    }

    let mut handler = NotificationHandler::new(table).on_duplicate(|headers| {
        tracing::info!(
            message_id = %headers.message_id,
            message_retry = headers.message_retry,
            "Ignored redelivered notification"
        );
    });
    match &config.webhook.secret {
        Some(secret) => handler = handler.with_secret(secret.expose_secret().clone()),
        None => tracing::warn!("No webhook secret configured; signatures will not be checked"),
    }
    if config.webhook.deduplicate {
        handler = handler.with_tracker(Arc::new(InMemoryMessageTracker::new()));
    }

    if config.provider.has_credentials() {
        log_subscriptions(&config).await;
    }

    let app = webhook_routes(&config.webhook.path, handler)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, path = %config.webhook.path, "Listening for webhooks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn dispatch_table() -> DispatchTable {
    DispatchTable::builder()
        .on("stream.online", "1", |n: Notification<StreamOnline>| async move {
            tracing::info!(
                broadcaster = %n.event.broadcaster_user_login,
                stream_type = %n.event.stream_type,
                started_at = %n.event.started_at,
                "Stream went online"
            );
        })
        .on("stream.offline", "1", |n: Notification<StreamOffline>| async move {
            tracing::info!(broadcaster = %n.event.broadcaster_user_login, "Stream went offline");
        })
        .on("channel.update", "2", |n: Notification<ChannelUpdate>| async move {
            tracing::info!(
                broadcaster = %n.event.broadcaster_user_login,
                title = %n.event.title,
                category = %n.event.category_name,
                "Channel updated"
            );
        })
        .on("channel.follow", "2", |n: Notification<ChannelFollow>| async move {
            tracing::info!(
                broadcaster = %n.event.broadcaster_user_login,
                follower = %n.event.user_login,
                "New follower"
            );
        })
        .build()
}

async fn log_subscriptions(config: &AppConfig) {
    let (Some(client_id), Some(app_token)) =
        (&config.provider.client_id, &config.provider.app_token)
    else {
        return;
    };

    let client = HelixSubscriptionClient::new(
        HelixConfig::from(&config.provider),
        Arc::new(StaticCredentials::new(
            client_id.clone(),
            app_token.expose_secret().clone(),
        )),
    );

    match client.get_subscriptions(None).await {
        Ok(list) => {
            for sub in &list.data {
                tracing::info!(
                    subscription_id = %sub.id,
                    subscription_type = %sub.event_type,
                    subscription_version = %sub.version,
                    status = %sub.status,
                    callback = %sub.transport.callback,
                    "Existing subscription"
                );
            }
            tracing::info!(
                total = list.total,
                total_cost = list.total_cost,
                max_total_cost = list.max_total_cost,
                "Subscription quota"
            );
        }
        Err(e) => tracing::warn!(error = %e, "Could not list subscriptions"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
