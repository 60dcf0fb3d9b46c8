//! WalkTalk entry-point: loads settings, selects adapters and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
use uuid::Uuid;

use walktalk::domain::User;
use walktalk::domain::ports::{NoOpNotificationGateway, NotificationGateway};
use walktalk::inbound::http::health::HealthState;
use walktalk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use walktalk::outbound::webhook::WebhookNotificationGateway;

use server::{AppSettings, ServerConfig, create_server};

/// Stable identity of the sample walk host.
const SAMPLE_HOST_ID: Uuid = Uuid::from_u128(0x5a3c_7f1e_9d2b_4c8a_b6e4_0f1d_2c3b_4a5e);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let config = server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting walktalk");
    let server = create_server(health_state, config)
        .await
        .wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server stopped with an error")?;
    Ok(())
}

fn load_settings<I>(args: I) -> Result<AppSettings>
where
    I: IntoIterator<Item = std::ffi::OsString>,
{
    AppSettings::load_from_iter(args).map_err(|err| eyre!("failed to load settings: {err}"))
}

async fn server_config(settings: &AppSettings) -> Result<ServerConfig> {
    let mut config = ServerConfig::new(settings.bind_addr())
        .with_creation_config(settings.creation_config())
        .with_join_config(settings.join_config())
        .with_gateway(notification_gateway(settings)?);

    if let Some(database_url) = settings.database_url() {
        let url = database_url.to_owned();
        tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .wrap_err("migration task panicked")?
            .wrap_err("failed to apply migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database configured; walks are kept in memory");
    }

    if settings.seed_sample_walk {
        let host = User::try_from_strings(
            SAMPLE_HOST_ID.to_string(),
            settings.sample_host_name(),
            settings.sample_host_email(),
        )
        .wrap_err("invalid sample host identity")?;
        config = config.with_sample_host(host.walker());
    }

    Ok(config)
}

fn notification_gateway(settings: &AppSettings) -> Result<Arc<dyn NotificationGateway>> {
    let Some(raw) = settings.webhook_url() else {
        info!("no webhook configured; notifications are dropped");
        return Ok(Arc::new(NoOpNotificationGateway));
    };
    let endpoint = Url::parse(raw).wrap_err("invalid webhook URL")?;
    let gateway = WebhookNotificationGateway::new(endpoint, settings.notification_timeout())
        .wrap_err("failed to build webhook client")?;
    Ok(Arc::new(gateway))
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        [
            "WALKTALK_DATABASE_URL",
            "WALKTALK_WEBHOOK_URL",
            "WALKTALK_SEED_SAMPLE_WALK",
            "WALKTALK_SAMPLE_HOST_NAME",
            "WALKTALK_SAMPLE_HOST_EMAIL",
        ]
        .into_iter()
        .map(|key| {
            let value = overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned());
            (key, value)
        })
        .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn bare_settings_select_in_memory_adapters() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_settings([OsString::from("walktalk")]).expect("settings load");
        let config = server_config(&settings).await.expect("config builds");

        assert!(config.db_pool.is_none());
        assert!(config.sample_host.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_webhook_url_stops_startup() {
        let _guard = lock_env(env_with(&[("WALKTALK_WEBHOOK_URL", "not a url")]));

        let settings = load_settings([OsString::from("walktalk")]).expect("settings load");

        assert!(server_config(&settings).await.is_err());
    }
}
