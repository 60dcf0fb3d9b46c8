//! Walk HTTP handlers.
//!
//! ```text
//! GET  /api/v1/walks
//! POST /api/v1/walks
//! GET  /api/v1/walks/{walk_id}
//! POST /api/v1/walks/{walk_id}/participants
//! POST /api/v1/walks/{walk_id}/status
//! ```
//!
//! Handlers parse transport input, call one driving port and shape the
//! response. Identity arrives in the request body; there is no session.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    AdvanceWalkRequest, CreateWalkRequest, JoinOutcome, JoinOutcomeKind, JoinRequest, WalkDetail,
    WalkSummary,
};
use crate::domain::walks::{ParticipantCounts, WalkId, WalkStatus};
use crate::domain::{Error, Walker};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Join request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinWalkRequestBody {
    pub joiner: Walker,
}

/// Join response body. Repeat joins answer with `already_joined`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinWalkResponseBody {
    pub outcome: JoinOutcomeKind,
    pub counts: ParticipantCounts,
    pub confirmed: bool,
    /// Names of the notifications emitted by this join.
    #[schema(example = json!(["joined", "capacity_reached"]))]
    pub events: Vec<String>,
}

impl From<JoinOutcome> for JoinWalkResponseBody {
    fn from(outcome: JoinOutcome) -> Self {
        let events = match &outcome {
            JoinOutcome::Joined(receipt) => receipt
                .events
                .iter()
                .map(|event| event.name().to_owned())
                .collect(),
            JoinOutcome::AlreadyJoined { .. } => Vec::new(),
        };
        Self {
            outcome: outcome.kind(),
            counts: outcome.counts(),
            confirmed: outcome.confirmed(),
            events,
        }
    }
}

/// Lifecycle request body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceWalkRequestBody {
    /// One of `canceled`, `started` or `done`.
    pub status: WalkStatus,
}

fn parse_walk_id(raw: &str) -> Result<WalkId, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("walkId must be a UUID").with_details(json!({
            "field": "walkId",
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

/// List walks with occupancy, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/walks",
    responses(
        (status = 200, description = "Walks", body = [WalkSummary]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["walks"],
    operation_id = "listWalks"
)]
#[get("/walks")]
pub async fn list_walks(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<WalkSummary>>> {
    let walks = state.walks_query.list_walks().await?;
    Ok(web::Json(walks))
}

/// Publish a walk. Capacity comes from server configuration.
#[utoipa::path(
    post,
    path = "/api/v1/walks",
    request_body = CreateWalkRequest,
    responses(
        (status = 201, description = "Walk published", body = WalkSummary),
        (status = 400, description = "Invalid walk", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["walks"],
    operation_id = "createWalk"
)]
#[post("/walks")]
pub async fn create_walk(
    state: web::Data<HttpState>,
    payload: web::Json<CreateWalkRequest>,
) -> ApiResult<HttpResponse> {
    let summary = state.walks.create_walk(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(summary))
}

/// One walk with its roster in join order.
#[utoipa::path(
    get,
    path = "/api/v1/walks/{walk_id}",
    params(("walk_id" = String, Path, format = Uuid, description = "Walk identifier")),
    responses(
        (status = 200, description = "Walk detail", body = WalkDetail),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Walk not found", body = Error)
    ),
    tags = ["walks"],
    operation_id = "getWalk"
)]
#[get("/walks/{walk_id}")]
pub async fn get_walk(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<WalkDetail>> {
    let walk_id = parse_walk_id(&path)?;
    let detail = state.walks_query.get_walk(&walk_id).await?;
    Ok(web::Json(detail))
}

/// Join a walk.
#[utoipa::path(
    post,
    path = "/api/v1/walks/{walk_id}/participants",
    params(("walk_id" = String, Path, format = Uuid, description = "Walk identifier")),
    request_body = JoinWalkRequestBody,
    responses(
        (status = 200, description = "Joined, or already a participant", body = JoinWalkResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Walk not found", body = Error),
        (status = 409, description = "Walk full or closed to joins", body = Error),
        (status = 503, description = "Admission contended; retry", body = Error)
    ),
    tags = ["walks"],
    operation_id = "joinWalk"
)]
#[post("/walks/{walk_id}/participants")]
pub async fn join_walk(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<JoinWalkRequestBody>,
) -> ApiResult<web::Json<JoinWalkResponseBody>> {
    let walk_id = parse_walk_id(&path)?;
    let JoinWalkRequestBody { joiner } = payload.into_inner();
    let outcome = state
        .joins
        .attempt_join(JoinRequest { walk_id, joiner })
        .await?;
    Ok(web::Json(JoinWalkResponseBody::from(outcome)))
}

/// Cancel, start or finish a walk.
#[utoipa::path(
    post,
    path = "/api/v1/walks/{walk_id}/status",
    params(("walk_id" = String, Path, format = Uuid, description = "Walk identifier")),
    request_body = AdvanceWalkRequestBody,
    responses(
        (status = 200, description = "Walk updated", body = WalkSummary),
        (status = 400, description = "Status cannot be requested", body = Error),
        (status = 404, description = "Walk not found", body = Error),
        (status = 409, description = "Transition not allowed", body = Error)
    ),
    tags = ["walks"],
    operation_id = "advanceWalk"
)]
#[post("/walks/{walk_id}/status")]
pub async fn advance_walk(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AdvanceWalkRequestBody>,
) -> ApiResult<web::Json<WalkSummary>> {
    let walk_id = parse_walk_id(&path)?;
    let summary = state
        .walks
        .advance_walk(AdvanceWalkRequest {
            walk_id,
            target: payload.status,
        })
        .await?;
    Ok(web::Json(summary))
}

#[cfg(test)]
#[path = "walks_tests.rs"]
mod tests;
