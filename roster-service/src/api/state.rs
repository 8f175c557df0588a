use std::sync::Arc;

use crate::domain::service::RosterJobService;

/// Shared application state for the roster-service axum router.
pub struct RosterAppState {
    pub roster_service: Arc<RosterJobService>,
}
