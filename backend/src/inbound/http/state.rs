//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{WalkCommand, WalkJoinCommand, WalkQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub walks: Arc<dyn WalkCommand>,
    pub walks_query: Arc<dyn WalkQuery>,
    pub joins: Arc<dyn WalkJoinCommand>,
}

impl HttpState {
    /// Bundle the walk ports.
    ///
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use walktalk::domain::ports::NoOpNotificationGateway;
    /// use walktalk::domain::{
    ///     WalkCreationConfig, WalkJoinConfig, WalkJoinService, WalkService,
    /// };
    /// use walktalk::inbound::http::state::HttpState;
    /// use walktalk::outbound::memory::InMemoryWalkRepository;
    ///
    /// let repo = Arc::new(InMemoryWalkRepository::new());
    /// let clock = Arc::new(mockable::DefaultClock);
    /// let walks = Arc::new(WalkService::new(
    ///     repo.clone(),
    ///     clock.clone(),
    ///     WalkCreationConfig::default(),
    /// ));
    /// let joins = Arc::new(WalkJoinService::new(
    ///     repo,
    ///     Arc::new(NoOpNotificationGateway),
    ///     clock,
    ///     WalkJoinConfig::default(),
    /// ));
    /// let state = HttpState::new(walks.clone(), walks, joins);
    /// # let _ = state;
    /// ```
    pub fn new(
        walks: Arc<dyn WalkCommand>,
        walks_query: Arc<dyn WalkQuery>,
        joins: Arc<dyn WalkJoinCommand>,
    ) -> Self {
        Self {
            walks,
            walks_query,
            joins,
        }
    }
}
