use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::server::AppState;
use crate::db::models::{NewUser, User};
use crate::error::AppError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
    #[serde(default)]
    pub secret_code: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(new_user) = payload?;
    let user = state.users.register(new_user).await?;
    Ok(Json(user))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<User>, AppError> {
    let user = state.users.login(&query.secret_code).await?;
    Ok(Json(user))
}
