use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod authz;
pub mod error;
pub mod guid;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod password;
pub mod storage;
pub mod token;
pub mod validation;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "",
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::user_register::register,
        handlers::user_login::login,
        handlers::user_me::me,
        handlers::shader_create::shader_create,
        handlers::shader_get::shader_get,
        handlers::shader_update::shader_update,
        handlers::shader_list::shader_list_own,
    ),
    components(schemas(
        models::UserRegister,
        models::UserLogin,
        models::User,
        models::ShaderCreate,
        models::ShaderUpdate,
        models::Shader,
        models::ShaderInfo,
        error::ErrorBody,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "user", description = "Registration, login and account"),
        (name = "shader", description = "Shader storage and sharing"),
    )
)]
struct ApiDoc;

// axum handler serving the OpenAPI document
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Start the HTTP server.
pub async fn new(port: u16, dsn: String, secret: SecretString) -> Result<()> {
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let tokens = Arc::new(token::TokenCodec::new(&secret)?);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/user/register", post(handlers::register))
        .route("/user/login", post(handlers::login))
        .route("/user/me", get(handlers::me))
        .route("/user/me/shaders", get(handlers::shader_list_own))
        .route("/shader", post(handlers::shader_create))
        .route(
            "/shader/:id",
            get(handlers::shader_get).put(handlers::shader_update),
        )
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(
            // Identity is resolved last in this stack, so it runs with the
            // codec extension in place and before any handler.
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(pool))
                .layer(Extension(tokens))
                .layer(middleware::from_fn(identity::authenticate)),
        );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Gracefully shutdown");
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, request_id)
}
