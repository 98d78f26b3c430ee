//! Postgres queries for user and shader rows.
//!
//! Row lookups never filter on visibility or ownership, the visibility
//! policy is decided in `authz` after the row is fetched.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgDatabaseError, PgPool, Postgres, QueryBuilder};

use crate::wgsltoy::{error::Error, models::ShaderUpdate};

const USER_UNIQUE_EMAIL_CONSTRAINT: &str = "unique_email";
const USER_UNIQUE_USERNAME_CONSTRAINT: &str = "unique_username";

const EMAIL_VERIFICATION_PENDING: &str = "pending";

const SHADER_LIST_LIMIT: i64 = 100;

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub email_verification: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ShaderRow {
    pub shader_id: String,
    pub created_by: String,
    pub visibility: String,
    pub name: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub forked_from: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new shader row; identifiers are generated by the caller.
#[derive(Debug)]
pub struct NewShader {
    pub shader_id: String,
    pub created_by: String,
    pub visibility: String,
    pub name: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub forked_from: Option<String>,
}

pub async fn user_insert(
    pool: &PgPool,
    user_id: &str,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<(), Error> {
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO users (user_id, username, email, email_verification, password, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $6)",
    )
    .bind(user_id)
    .bind(username)
    .bind(email)
    .bind(EMAIL_VERIFICATION_PENDING)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await
    .map_err(map_unique_violation)?;

    Ok(())
}

/// Translate uniqueness violations into caller-facing validation errors,
/// anything else stays internal.
fn map_unique_violation(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(pg_err) = db_err.try_downcast_ref::<PgDatabaseError>() {
            if pg_err.code() == "23505" {
                match pg_err.constraint() {
                    Some(USER_UNIQUE_EMAIL_CONSTRAINT) => {
                        return Error::Validation("Email is already taken!".to_string());
                    }
                    Some(USER_UNIQUE_USERNAME_CONSTRAINT) => {
                        return Error::Validation("Username is already taken!".to_string());
                    }
                    _ => {}
                }
            }
        }
    }

    err.into()
}

pub async fn user_find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRow>, Error> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT user_id, username, email, email_verification, password, created_at, updated_at \
         FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn user_find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<UserRow>, Error> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT user_id, username, email, email_verification, password, created_at, updated_at \
         FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn shader_insert(pool: &PgPool, shader: &NewShader) -> Result<(), Error> {
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO shaders (shader_id, created_by, visibility, name, description, content, tags, forked_from, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)",
    )
    .bind(&shader.shader_id)
    .bind(&shader.created_by)
    .bind(&shader.visibility)
    .bind(&shader.name)
    .bind(&shader.description)
    .bind(&shader.content)
    .bind(&shader.tags)
    .bind(shader.forked_from.as_deref())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn shader_find_by_id(
    pool: &PgPool,
    shader_id: &str,
) -> Result<Option<ShaderRow>, Error> {
    let shader = sqlx::query_as::<_, ShaderRow>(
        "SELECT shader_id, created_by, visibility, name, description, content, tags, forked_from, created_at, updated_at \
         FROM shaders WHERE shader_id = $1",
    )
    .bind(shader_id)
    .fetch_optional(pool)
    .await?;

    Ok(shader)
}

/// Apply a partial update. `None` fields are left unchanged; authorization
/// has already been decided, so the row is addressed by id alone.
pub async fn shader_update(
    pool: &PgPool,
    shader_id: &str,
    changes: &ShaderUpdate,
) -> Result<(), Error> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE shaders SET updated_at = ");
    builder.push_bind(Utc::now());

    if let Some(name) = &changes.name {
        builder.push(", name = ").push_bind(name);
    }
    if let Some(visibility) = &changes.visibility {
        builder.push(", visibility = ").push_bind(visibility);
    }
    if let Some(description) = &changes.description {
        builder.push(", description = ").push_bind(description);
    }
    if let Some(content) = &changes.content {
        builder.push(", content = ").push_bind(content);
    }
    // None means do not change, an empty list clears the tags.
    if let Some(tags) = &changes.tags {
        builder.push(", tags = ").push_bind(tags);
    }

    builder.push(" WHERE shader_id = ").push_bind(shader_id);

    let result = builder.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

pub async fn shader_list_by_owner(
    pool: &PgPool,
    created_by: &str,
) -> Result<Vec<ShaderRow>, Error> {
    let shaders = sqlx::query_as::<_, ShaderRow>(
        "SELECT shader_id, created_by, visibility, name, description, content, tags, forked_from, created_at, updated_at \
         FROM shaders WHERE created_by = $1 ORDER BY updated_at DESC LIMIT $2",
    )
    .bind(created_by)
    .bind(SHADER_LIST_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(shaders)
}
