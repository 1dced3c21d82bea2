//! # Committee Slot Routes
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | POST   | `/committee-slots` | 201 + `Location` |
//! | GET    | `/committee-slots/:committee_id/:senate_division_short_name` | 200 |
//! | PUT    | `/committee-slots/:committee_id/:senate_division_short_name` | 200 |
//! | DELETE | `/committee-slots/:committee_id/:senate_division_short_name` | 200 |
//!
//! Requests are validated here; nothing reaches the store with a missing or
//! negative `slotRequirements`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use super::validation::{division_name, required};
use crate::slots::{
    CommitteeId, CommitteeSlot, CreateOutcome, DeleteOutcome, SlotError, SlotKey, UpdateOutcome,
};

/// Body of `POST /committee-slots`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub committee_id: Option<CommitteeId>,
    pub senate_division: Option<String>,
    pub slot_requirements: Option<i64>,
}

/// Body of `PUT /committee-slots/:committee_id/:senate_division_short_name`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlotRequest {
    pub slot_requirements: Option<i64>,
}

/// Body returned by a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteSlotResponse {
    pub deleted: bool,
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
}

type SlotPath = Result<Path<(CommitteeId, String)>, PathRejection>;

/// Create committee slot routes
pub fn slot_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/committee-slots", post(create_slot_handler))
        .route(
            "/committee-slots/:committee_id/:senate_division_short_name",
            get(get_slot_handler)
                .put(update_slot_handler)
                .delete(delete_slot_handler),
        )
        .with_state(state)
}

async fn create_slot_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSlotRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, [(HeaderName, String); 1], Json<CreateOutcome>)> {
    state.observe(create_slot(&state, payload).await)
}

async fn create_slot(
    state: &AppState,
    payload: Result<Json<CreateSlotRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, [(HeaderName, String); 1], Json<CreateOutcome>)> {
    let Json(request) = payload?;
    let committee_id = required(request.committee_id, "committeeId")?;
    let division = required(request.senate_division, "senateDivision")?;
    let division = division_name(&division, "senateDivision")?;
    let requirements = slot_requirements(request.slot_requirements)?;

    let outcome = state
        .slots
        .create_slot(SlotKey::new(committee_id, division), requirements)
        .await?;
    state.metrics.increment_slots_created();

    let location = outcome.key.resource_path();
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(outcome),
    ))
}

async fn get_slot_handler(
    State(state): State<Arc<AppState>>,
    path: SlotPath,
) -> ApiResult<Json<CommitteeSlot>> {
    state.observe(get_slot(&state, path).await)
}

async fn get_slot(state: &AppState, path: SlotPath) -> ApiResult<Json<CommitteeSlot>> {
    let key = slot_key(path)?;
    match state.slots.get_slot(&key).await? {
        Some(slot) => Ok(Json(slot)),
        None => Err(SlotError::NotFound(key).into()),
    }
}

async fn update_slot_handler(
    State(state): State<Arc<AppState>>,
    path: SlotPath,
    payload: Result<Json<UpdateSlotRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateOutcome>> {
    state.observe(update_slot(&state, path, payload).await)
}

async fn update_slot(
    state: &AppState,
    path: SlotPath,
    payload: Result<Json<UpdateSlotRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateOutcome>> {
    let key = slot_key(path)?;
    let Json(request) = payload?;
    let requirements = slot_requirements(request.slot_requirements)?;

    if let Some(minimum) = state.slots.policy().min_total_slots {
        check_minimum(state, &key, requirements, minimum).await?;
    }

    let outcome = state.slots.update_slot(key, requirements).await?;
    state.metrics.increment_slots_updated();
    Ok(Json(outcome))
}

async fn delete_slot_handler(
    State(state): State<Arc<AppState>>,
    path: SlotPath,
) -> ApiResult<Json<DeleteSlotResponse>> {
    state.observe(delete_slot(&state, path).await)
}

async fn delete_slot(state: &AppState, path: SlotPath) -> ApiResult<Json<DeleteSlotResponse>> {
    let key = slot_key(path)?;
    let outcome = state.slots.delete_slot(key).await?;
    if outcome.row_count == 0 {
        return Err(SlotError::NotFound(outcome.key).into());
    }

    state.metrics.increment_slots_deleted();
    Ok(Json(DeleteSlotResponse {
        deleted: true,
        outcome,
    }))
}

/// Reject a reduction whose projected aggregate falls below `minimum`.
/// Missing slots fall through so the update itself reports not-found.
async fn check_minimum(
    state: &AppState,
    key: &SlotKey,
    requirements: u32,
    minimum: i64,
) -> ApiResult<()> {
    let Some(current) = state.slots.get_slot(key).await? else {
        return Ok(());
    };
    if requirements >= current.slot_requirements {
        return Ok(());
    }
    let Some(total) = state.slots.committee_total(key.committee_id).await? else {
        return Ok(());
    };

    let projected = total + i64::from(requirements) - i64::from(current.slot_requirements);
    if projected < minimum {
        return Err(ApiError::BelowMinimum { projected, minimum });
    }
    Ok(())
}

fn slot_key(path: SlotPath) -> ApiResult<SlotKey> {
    let Path((committee_id, division)) = path?;
    let division = division_name(&division, "senate_division_short_name")?;
    Ok(SlotKey::new(committee_id, division))
}

fn slot_requirements(value: Option<i64>) -> ApiResult<u32> {
    let value = required(value, "slotRequirements")?;
    u32::try_from(value).map_err(|_| {
        ApiError::Validation(format!(
            "slotRequirements must be between 0 and {}, got {}",
            u32::MAX,
            value
        ))
    })
}
