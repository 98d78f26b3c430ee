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
    models::{Shader, ShaderUpdate},
    storage, validation,
};

#[utoipa::path(
    put,
    path = "/shader/{id}",
    params(("id" = String, Path, description = "Shader identifier")),
    request_body = ShaderUpdate,
    responses(
        (status = 200, description = "The updated shader", body = Shader),
        (status = 400, description = "Validation failure", body = ErrorBody),
        (status = 401, description = "Write attempted by a non-owner", body = ErrorBody),
        (status = 404, description = "No such shader, or not visible to the caller", body = ErrorBody),
    ),
    tag = "shader"
)]
#[instrument(skip(pool, caller, payload))]
pub async fn shader_update(
    Path(id): Path<String>,
    Extension(pool): Extension<PgPool>,
    Extension(caller): Extension<CallerIdentity>,
    payload: Option<Json<ShaderUpdate>>,
) -> Result<Json<Shader>, Error> {
    if !guid::validate(&id) {
        return Err(Error::NotFound);
    }

    let Some(Json(changes)) = payload else {
        return Err(Error::Validation("Missing payload".to_string()));
    };

    let Some(row) = storage::shader_find_by_id(&pool, &id).await? else {
        return Err(Error::NotFound);
    };

    let visibility = Visibility::parse(&row.visibility)
        .ok_or_else(|| anyhow!("unknown visibility {:?} on shader {}", row.visibility, id))?;

    // Decided before the payload is even validated, a non-owner learns
    // nothing about what an update would have done.
    authz::authorize(&caller, &row.created_by, visibility, Access::Write)?;

    if let Some(name) = &changes.name {
        validation::validate_shader_name(name)?;
    }
    if let Some(visibility) = &changes.visibility {
        validation::validate_shader_visibility(visibility)?;
    }
    if let Some(description) = &changes.description {
        validation::validate_shader_description(description)?;
    }
    if let Some(content) = &changes.content {
        validation::validate_shader_content(content)?;
    }
    if let Some(tags) = &changes.tags {
        validation::validate_shader_tags(tags)?;
    }

    storage::shader_update(&pool, &id, &changes).await?;

    let Some(updated) = storage::shader_find_by_id(&pool, &id).await? else {
        return Err(Error::NotFound);
    };

    Ok(Json(Shader::from(updated)))
}
