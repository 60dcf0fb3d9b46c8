//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the walk and health endpoints together with the
//! request, response and error schemas they reference. The document is served
//! as JSON at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::domain::ports::{
    CreateWalkRequest, JoinOutcomeKind, ParticipantSummary, WalkDetail, WalkSummary,
    WalkerSummary,
};
use crate::domain::walks::{
    ConversationMode, DogPolicy, Pace, ParticipantCounts, Terrain, WalkStatus,
};
use crate::domain::{Error, ErrorCode, Walker};
use crate::inbound::http::walks::{
    AdvanceWalkRequestBody, JoinWalkRequestBody, JoinWalkResponseBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "WalkTalk API",
        description = "Publish social walks, join them and follow them to confirmation.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::walks::list_walks,
        crate::inbound::http::walks::create_walk,
        crate::inbound::http::walks::get_walk,
        crate::inbound::http::walks::join_walk,
        crate::inbound::http::walks::advance_walk,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Walker,
        WalkerSummary,
        WalkSummary,
        WalkDetail,
        ParticipantSummary,
        ParticipantCounts,
        WalkStatus,
        Pace,
        Terrain,
        ConversationMode,
        DogPolicy,
        CreateWalkRequest,
        JoinWalkRequestBody,
        JoinWalkResponseBody,
        JoinOutcomeKind,
        AdvanceWalkRequestBody,
    )),
    tags(
        (name = "walks", description = "Walk publication, joining and lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
