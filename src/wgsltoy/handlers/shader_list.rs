use axum::{extract::Extension, Json};
use sqlx::PgPool;
use tracing::instrument;

use crate::wgsltoy::{
    error::{Error, ErrorBody},
    identity::CallerIdentity,
    models::ShaderInfo,
    storage,
};

#[utoipa::path(
    get,
    path = "/user/me/shaders",
    responses(
        (status = 200, description = "The caller's shaders, most recently updated first", body = [ShaderInfo]),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
    ),
    tag = "shader"
)]
#[instrument(skip(pool, caller))]
pub async fn shader_list_own(
    Extension(pool): Extension<PgPool>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<Vec<ShaderInfo>>, Error> {
    let user = caller.require()?;

    let rows = storage::shader_list_by_owner(&pool, &user.id).await?;

    Ok(Json(rows.into_iter().map(ShaderInfo::from).collect()))
}
