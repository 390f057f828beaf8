//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    /// Birth date
    pub bday: Option<NaiveDate>,
}

/// Create/update author request. Updates replace every field.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuthor {
    pub name: String,
    pub bio: Option<String>,
    pub bday: Option<NaiveDate>,
}
