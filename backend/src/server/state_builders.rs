//! Builders for HTTP state over the selected walk repository.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use walktalk::domain::Walker;
use walktalk::domain::ports::WalkRepository;
use walktalk::domain::{WalkJoinService, WalkService};
use walktalk::inbound::http::state::HttpState;
use walktalk::outbound::memory::InMemoryWalkRepository;
use walktalk::outbound::persistence::DieselWalkRepository;

use super::ServerConfig;

/// Build handler state, storing walks in PostgreSQL when a pool is configured
/// and in memory otherwise. Publishes the sample walk when requested.
pub(super) async fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!(repository = "postgres", "walk repository selected");
            let repo = Arc::new(DieselWalkRepository::new(pool.clone()));
            assemble(repo, config, clock).await
        }
        None => {
            info!(repository = "memory", "walk repository selected");
            assemble(Arc::new(InMemoryWalkRepository::new()), config, clock).await
        }
    }
}

async fn assemble<R>(
    repo: Arc<R>,
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState>
where
    R: WalkRepository + 'static,
{
    let walks = Arc::new(WalkService::new(
        repo.clone(),
        clock.clone(),
        config.creation,
    ));
    let joins = Arc::new(WalkJoinService::new(
        repo,
        config.gateway.clone(),
        clock,
        config.joins,
    ));

    if let Some(host) = &config.sample_host {
        seed_sample_walk(&walks, host.clone()).await;
    }

    web::Data::new(HttpState::new(walks.clone(), walks, joins))
}

async fn seed_sample_walk<R>(walks: &WalkService<R>, host: Walker)
where
    R: WalkRepository,
{
    match walks.seed_sample_walk(host).await {
        Ok(Some(summary)) => info!(walk_id = %summary.id, "sample walk published"),
        Ok(None) => {}
        // The server still starts; the sample walk is a convenience.
        Err(err) => warn!(error = %err, "sample walk not published"),
    }
}
