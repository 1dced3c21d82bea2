//! Committee and senate division routes

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use super::validation::{division_name, non_empty, required};
use crate::committees::{Committee, SenateDivision};
use crate::slots::{CommitteeId, CommitteeSlot};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommitteeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSenateDivisionRequest {
    pub short_name: Option<String>,
    pub name: Option<String>,
}

/// A committee with its slot rows
#[derive(Debug, Serialize)]
pub struct CommitteeSlotsResponse {
    #[serde(flatten)]
    pub committee: Committee,
    pub slots: Vec<CommitteeSlot>,
}

/// Create committee and senate division routes
pub fn committee_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/committees", post(create_committee_handler))
        .route("/committees/:committee_id", get(get_committee_handler))
        .route("/committees/:committee_id/slots", get(list_slots_handler))
        .route("/senate-divisions", post(create_division_handler))
        .with_state(state)
}

async fn create_committee_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCommitteeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, [(HeaderName, String); 1], Json<Committee>)> {
    state.observe(create_committee(&state, payload).await)
}

async fn create_committee(
    state: &AppState,
    payload: Result<Json<CreateCommitteeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, [(HeaderName, String); 1], Json<Committee>)> {
    let Json(request) = payload?;
    let name = non_empty(request.name, "name")?;
    let description = request.description.unwrap_or_default();

    let committee = state.catalog.create_committee(name, description).await?;
    let location = committee.resource_path();
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(committee),
    ))
}

async fn get_committee_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CommitteeId>, PathRejection>,
) -> ApiResult<Json<Committee>> {
    state.observe(get_committee(&state, path).await.map(Json))
}

async fn get_committee(
    state: &AppState,
    path: Result<Path<CommitteeId>, PathRejection>,
) -> ApiResult<Committee> {
    let Path(committee_id) = path?;
    state
        .catalog
        .get_committee(committee_id)
        .await?
        .ok_or(ApiError::CommitteeNotFound(committee_id))
}

async fn list_slots_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CommitteeId>, PathRejection>,
) -> ApiResult<Json<CommitteeSlotsResponse>> {
    let result = async {
        let committee = get_committee(&state, path).await?;
        let slots = state.slots.list_slots(committee.committee_id).await?;
        Ok::<_, ApiError>(Json(CommitteeSlotsResponse { committee, slots }))
    }
    .await;
    state.observe(result)
}

async fn create_division_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSenateDivisionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SenateDivision>)> {
    let result = async {
        let Json(request) = payload?;
        let short_name = required(request.short_name, "shortName")?;
        let short_name = division_name(&short_name, "shortName")?;
        let name = non_empty(request.name, "name")?;
        let division = state.catalog.create_senate_division(short_name, name).await?;
        Ok::<_, ApiError>((StatusCode::CREATED, Json(division)))
    }
    .await;
    state.observe(result)
}
