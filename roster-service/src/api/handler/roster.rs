use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use shared::responses::ApiResponse;
use uuid::Uuid;

use crate::{
    api::state::RosterAppState, domain::request::GenerateRosterRequest,
    error::RosterServiceError,
};

#[utoipa::path(
    post,
    path = "/api/v1/rosters",
    tag = "Rosters",
    request_body = GenerateRosterRequest,
    responses(
        (status = 202, description = "Roster job submitted", body = ApiResponse<shared::types::RosterJob>)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn submit_roster(
    State(state): State<Arc<RosterAppState>>,
    Json(request): Json<GenerateRosterRequest>,
) -> Result<impl IntoResponse, RosterServiceError> {
    let job = state.roster_service.submit(request).await?;

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(job))))
}

#[utoipa::path(
    get,
    path = "/api/v1/rosters/{job_id}/status",
    tag = "Rosters",
    params(
        ("job_id" = Uuid, Path, description = "Roster job ID")
    ),
    responses(
        (status = 200, description = "Roster job status", body = ApiResponse<shared::types::RosterJob>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_status(
    State(state): State<Arc<RosterAppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApiResponse<shared::types::RosterJob>>, RosterServiceError> {
    let job = state.roster_service.get_status(job_id).await?;

    Ok(Json(ApiResponse::ok(job)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rosters/{job_id}/result",
    tag = "Rosters",
    params(
        ("job_id" = Uuid, Path, description = "Roster job ID")
    ),
    responses(
        (status = 200, description = "Roster result with shift assignments", body = ApiResponse<shared::types::RosterResult>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_result(
    State(state): State<Arc<RosterAppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApiResponse<shared::types::RosterResult>>, RosterServiceError> {
    let output = state.roster_service.get_result(job_id).await?;

    Ok(Json(ApiResponse::ok(output)))
}
