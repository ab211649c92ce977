use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub secret_code: String,
    pub name: String,
    pub email: String,
    // Back-references, in submission order
    pub complaints: Vec<Uuid>,
}

/// Storage shape of a user: the complaint list lives in a JSON text column.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub secret_code: String,
    pub name: String,
    pub email: String,
    pub complaints: Json<Vec<Uuid>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            secret_code: row.secret_code,
            name: row.name,
            email: row.email,
            complaints: row.complaints.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub rating: i64,
    pub resolved: bool,
    pub user_id: Uuid,
}

/// Registration payload. Everything else on a user is generated server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    pub title: String,
    pub summary: String,
    pub rating: i64,
    pub user_id: Uuid,
}

pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}
