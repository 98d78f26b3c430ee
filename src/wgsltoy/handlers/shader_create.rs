use axum::{
    extract::Extension,
    http::{header, HeaderName, StatusCode},
    Json,
};
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::wgsltoy::{
    error::{Error, ErrorBody},
    guid,
    identity::CallerIdentity,
    models::{shader_location, ShaderCreate},
    storage::{self, NewShader},
    validation,
};

#[utoipa::path(
    post,
    path = "/shader",
    request_body = ShaderCreate,
    responses(
        (status = 201, description = "Shader created, its URL is in the Location header"),
        (status = 400, description = "Validation failure", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
    ),
    tag = "shader"
)]
#[instrument(skip(pool, caller, payload))]
pub async fn shader_create(
    Extension(pool): Extension<PgPool>,
    Extension(caller): Extension<CallerIdentity>,
    payload: Option<Json<ShaderCreate>>,
) -> Result<(StatusCode, [(HeaderName, String); 1]), Error> {
    let created_by = caller.require()?.id.clone();

    let Some(Json(shader)) = payload else {
        return Err(Error::Validation("Missing payload".to_string()));
    };

    validation::validate_shader_name(&shader.name)?;
    validation::validate_shader_visibility(&shader.visibility)?;
    validation::validate_shader_description(&shader.description)?;
    validation::validate_shader_content(&shader.content)?;
    validation::validate_shader_tags(&shader.tags)?;
    validation::validate_forked_from(&shader.forked_from)?;

    let forked_from = if shader.forked_from.is_empty() {
        None
    } else {
        Some(shader.forked_from)
    };

    let shader_id = guid::new();
    storage::shader_insert(
        &pool,
        &NewShader {
            shader_id: shader_id.clone(),
            created_by,
            visibility: shader.visibility,
            name: shader.name,
            description: shader.description,
            content: shader.content,
            tags: shader.tags,
            forked_from,
        },
    )
    .await?;

    debug!("Created shader {shader_id}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, shader_location(&shader_id))],
    ))
}
