//! Request and response bodies.
//!
//! JSON field names follow the public API (camelCase); password fields are
//! never serialized back out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::wgsltoy::storage::{ShaderRow, UserRow};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserRegister {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserLogin {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(rename = "emailVerificationStatus")]
    pub email_verification: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            email: row.email,
            email_verification: row.email_verification,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShaderCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub forked_from: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShaderUpdate {
    pub name: Option<String>,
    pub visibility: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shader {
    pub id: String,
    pub location: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub visibility: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forked_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forked_from_location: Option<String>,
    pub tags: Vec<String>,
    pub content: String,
}

impl From<ShaderRow> for Shader {
    fn from(row: ShaderRow) -> Self {
        let location = shader_location(&row.shader_id);
        let forked_from_location = row.forked_from.as_deref().map(shader_location);

        Self {
            id: row.shader_id,
            location,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            name: row.name,
            visibility: row.visibility,
            description: row.description,
            forked_from: row.forked_from,
            forked_from_location,
            tags: row.tags,
            content: row.content,
        }
    }
}

/// Shader metadata without the code, for listings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShaderInfo {
    pub id: String,
    pub location: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub visibility: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forked_from: Option<String>,
    pub tags: Vec<String>,
}

impl From<ShaderRow> for ShaderInfo {
    fn from(row: ShaderRow) -> Self {
        Self {
            location: shader_location(&row.shader_id),
            id: row.shader_id,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            name: row.name,
            visibility: row.visibility,
            description: row.description,
            forked_from: row.forked_from,
            tags: row.tags,
        }
    }
}

pub fn shader_location(shader_id: &str) -> String {
    format!("/shader/{shader_id}")
}
