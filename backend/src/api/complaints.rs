use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::auth::LoginQuery;
use crate::api::server::AppState;
use crate::db::models::{Complaint, NewComplaint};
use crate::error::AppError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintQuery {
    // Left as text so a malformed id is reported as InvalidId, not a query rejection
    #[serde(default)]
    pub complaint_id: String,
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewComplaint>, JsonRejection>,
) -> Result<Json<Complaint>, AppError> {
    let Json(new_complaint) = payload?;
    let complaint = state.complaints.submit(new_complaint).await?;
    Ok(Json(complaint))
}

pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<Vec<Complaint>>, AppError> {
    let complaints = state.complaints.list_for_user(&query.secret_code).await?;
    Ok(Json(complaints))
}

/// No access control: anyone reaching this route sees every complaint.
pub async fn list_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Complaint>>, AppError> {
    let complaints = state.complaints.list_all().await?;
    Ok(Json(complaints))
}

pub async fn view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ComplaintQuery>,
) -> Result<Json<Complaint>, AppError> {
    let complaint = state.complaints.view(&query.complaint_id).await?;
    Ok(Json(complaint))
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ComplaintQuery>,
) -> Result<Json<Complaint>, AppError> {
    let complaint = state.complaints.resolve(&query.complaint_id).await?;
    Ok(Json(complaint))
}
