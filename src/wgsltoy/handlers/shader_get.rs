use anyhow::anyhow;
use axum::{
    extract::{Extension, Path},
    Json,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::wgsltoy::{
    authz::{self, Access, Visibility},
    error::{Error, ErrorBody},
    guid,
    identity::CallerIdentity,
    models::Shader,
    storage,
};

#[utoipa::path(
    get,
    path = "/shader/{id}",
    params(("id" = String, Path, description = "Shader identifier")),
    responses(
        (status = 200, description = "The shader", body = Shader),
        (status = 404, description = "No such shader, or not visible to the caller", body = ErrorBody),
    ),
    tag = "shader"
)]
#[instrument(skip(pool, caller))]
pub async fn shader_get(
    Path(id): Path<String>,
    Extension(pool): Extension<PgPool>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<Shader>, Error> {
    if !guid::validate(&id) {
        return Err(Error::NotFound);
    }

    let Some(row) = storage::shader_find_by_id(&pool, &id).await? else {
        return Err(Error::NotFound);
    };

    let visibility = Visibility::parse(&row.visibility)
        .ok_or_else(|| anyhow!("unknown visibility {:?} on shader {}", row.visibility, id))?;

    // Decided before any content leaves the handler.
    authz::authorize(&caller, &row.created_by, visibility, Access::Read)?;

    Ok(Json(Shader::from(row)))
}
