//! OpenAPI description of the flag API.

use axum::Router;
use utoipa::openapi::server::ServerBuilder;
use utoipa::OpenApi;

use crate::flag::{CreateFlagRequest, ErrorResponse, FlagMap, MessageResponse, UpdateFlagRequest};
use crate::routes;

pub const DOCS_PATH: &str = "/api/v1/api-docs";
pub const OPENAPI_PATH: &str = "/api/v1/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Feature Flag Service",
        version = "1.0.0",
        description = "A simple feature flag service"
    ),
    paths(
        routes::list_flags,
        routes::get_flag,
        routes::update_flag,
        routes::create_flag,
        routes::delete_flag,
    ),
    components(schemas(
        FlagMap,
        UpdateFlagRequest,
        CreateFlagRequest,
        MessageResponse,
        ErrorResponse,
    )),
    tags(
        (name = "flags", description = "Feature flag management")
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI document advertising `server_url` as its server.
pub fn openapi(server_url: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![ServerBuilder::new()
        .url(server_url)
        .description(Some("Development server"))
        .build()]);
    doc
}

/// Routes serving the document, plus Swagger UI when the `swagger-ui`
/// feature is enabled.
#[cfg(feature = "swagger-ui")]
pub fn router(server_url: &str) -> Router {
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, openapi(server_url)))
}

#[cfg(not(feature = "swagger-ui"))]
pub fn router(server_url: &str) -> Router {
    use axum::{routing::get, Json};

    let doc = openapi(server_url);
    Router::new().route(
        OPENAPI_PATH,
        get(move || {
            let doc = doc.clone();
            async move { Json(doc) }
        }),
    )
}
