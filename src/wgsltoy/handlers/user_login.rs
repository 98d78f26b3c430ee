use axum::{extract::Extension, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

use crate::wgsltoy::{
    error::{Error, ErrorBody},
    handlers::run_derivation,
    models::UserLogin,
    password, storage,
    token::TokenCodec,
};

/// Well-formed record matching no real password, verified on the
/// unknown-username path with the same cost parameters as stored records.
const DECOY_RECORD: &str =
    "$argon2id$v=19$m=65536,t=3,p=1$c29tZXNhbHRzb21lc2FsdA$v0WEzK5VOH7FuNDwAdHSTvGmDvqWIFhmoEQaDh2KSeQ";

#[utoipa::path(
    post,
    path = "/user/login",
    request_body = UserLogin,
    responses(
        (status = 200, description = "Login successful, the session token is the response body", body = String, content_type = "text/plain"),
        (status = 400, description = "Unknown username or wrong password", body = ErrorBody),
    ),
    tag = "user"
)]
#[instrument(skip(pool, tokens, payload))]
pub async fn login(
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenCodec>>,
    payload: Option<Json<UserLogin>>,
) -> Result<String, Error> {
    let Some(Json(login)) = payload else {
        return Err(Error::Validation("Missing payload".to_string()));
    };

    if login.username.is_empty() {
        return Err(Error::Validation("Field 'username' is required!".to_string()));
    }
    if login.password.is_empty() {
        return Err(Error::Validation("Field 'password' is required!".to_string()));
    }

    // Unknown user and wrong password produce the same outcome; the miss
    // path still pays for a derivation so response latency does not reveal
    // whether the username exists.
    let Some(user) = storage::user_find_by_username(&pool, &login.username).await? else {
        let candidate = login.password;
        let _ = run_derivation(move || password::verify(&candidate, DECOY_RECORD)).await;
        return Err(Error::BadLogin);
    };

    let candidate = login.password;
    let record = user.password;
    let is_match = run_derivation(move || password::verify(&candidate, &record)).await?;
    if !is_match {
        return Err(Error::BadLogin);
    }

    tokens.issue(&user.user_id)
}
