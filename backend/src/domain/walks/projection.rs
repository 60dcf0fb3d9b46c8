//! Public walk projection included in outbound notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::WalkId;

/// Subset of a walk that is safe to share with every participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicWalk {
    #[schema(value_type = String, format = Uuid)]
    pub id: WalkId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub area_label: String,
    pub capacity: u32,
}
