//! Patient record endpoints. Role checks happen in the route layers, not here.

use crate::api::ApiError;
use crate::auth::Identity;
use crate::models::{Patient, PatientInput};
use crate::patients::PatientStore;
use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

fn patient_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::BadRequest("invalid patient ID"))
}

fn patient_input(
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<PatientInput, ApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|_| ApiError::BadRequest("invalid request payload"))
}

/// Run a store operation on the blocking pool so SQLite never stalls a runtime worker
async fn with_store<T, F>(store: &Arc<PatientStore>, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&PatientStore) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    let result = tokio::task::spawn_blocking(move || op(&store))
        .await
        .context("Patient store task aborted")?;

    Ok(result?)
}

/// POST /patients
pub async fn create_patient(
    State(store): State<Arc<PatientStore>>,
    identity: Identity,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = patient_input(payload)?;
    let staff_id = identity.user_id;
    let id = with_store(&store, move |store| store.create(&input, staff_id)).await?;

    info!(patient_id = id, staff_id = identity.user_id, "Patient created");

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /patients/:id
pub async fn get_patient(
    State(store): State<Arc<PatientStore>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Patient>, ApiError> {
    let id = patient_id(path)?;

    with_store(&store, move |store| store.get(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("patient not found"))
}

/// PUT /patients/:id
pub async fn update_patient(
    State(store): State<Arc<PatientStore>>,
    identity: Identity,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = patient_id(path)?;
    let input = patient_input(payload)?;

    let staff_id = identity.user_id;
    let updated = with_store(&store, move |store| store.update(id, &input, staff_id)).await?;
    if !updated {
        return Err(ApiError::NotFound("patient not found"));
    }

    info!(patient_id = id, staff_id = identity.user_id, "Patient updated");

    Ok(Json(json!({ "message": "patient updated" })))
}

/// DELETE /patients/:id
pub async fn delete_patient(
    State(store): State<Arc<PatientStore>>,
    identity: Identity,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = patient_id(path)?;

    if !with_store(&store, move |store| store.delete(id)).await? {
        return Err(ApiError::NotFound("patient not found"));
    }

    info!(patient_id = id, staff_id = identity.user_id, "Patient deleted");

    Ok(Json(json!({ "message": "patient deleted" })))
}
