//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for JurisConnect API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "JurisConnect API",
        version = "0.1.0",
        description = "Staff, role and credential management for a law office",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;
