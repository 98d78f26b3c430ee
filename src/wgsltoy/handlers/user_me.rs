use axum::{extract::Extension, Json};
use sqlx::PgPool;
use tracing::instrument;

use crate::wgsltoy::{
    error::{Error, ErrorBody},
    identity::CallerIdentity,
    models::User,
    storage,
};

#[utoipa::path(
    get,
    path = "/user/me",
    responses(
        (status = 200, description = "The current user", body = User),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
    ),
    tag = "user"
)]
#[instrument(skip(pool, caller))]
pub async fn me(
    Extension(pool): Extension<PgPool>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<User>, Error> {
    let user = caller.require()?;

    let Some(row) = storage::user_find_by_id(&pool, &user.id).await? else {
        // Token subject no longer has a row, e.g. a deleted account.
        return Err(Error::NotFound);
    };

    Ok(Json(User::from(row)))
}
