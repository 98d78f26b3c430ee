use axum::{extract::Extension, http::StatusCode, Json};
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::wgsltoy::{
    error::{Error, ErrorBody},
    guid,
    handlers::run_derivation,
    models::UserRegister,
    password, storage, validation,
};

#[utoipa::path(
    post,
    path = "/user/register",
    request_body = UserRegister,
    responses(
        (status = 201, description = "Registration successful"),
        (status = 400, description = "Validation failure, or username/email already taken", body = ErrorBody),
    ),
    tag = "user"
)]
#[instrument(skip(pool, payload))]
pub async fn register(
    Extension(pool): Extension<PgPool>,
    payload: Option<Json<UserRegister>>,
) -> Result<StatusCode, Error> {
    let Some(Json(user)) = payload else {
        return Err(Error::Validation("Missing payload".to_string()));
    };

    let UserRegister {
        username,
        email,
        password,
    } = user;

    validation::validate_username(&username)?;
    validation::validate_email(&email)?;
    validation::validate_password(&password)?;

    let password_hash = run_derivation(move || password::hash(&password)).await?;

    let user_id = guid::new();
    storage::user_insert(&pool, &user_id, &username, &email, &password_hash).await?;

    debug!("Registered user {username} as {user_id}");

    Ok(StatusCode::CREATED)
}
