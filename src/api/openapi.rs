//! OpenAPI documentation for the export service, generated at compile time
//! with utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation for the piff-export REST API
///
/// Served as JSON at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "piff-export REST API",
        description = "Bulk export of PiFF annotation documents and their page images as a zip archive",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:22022", description = "Local development server")
    ),
    paths(
        crate::api::routes::export_piff,
        crate::api::routes::home,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(crate::api::routes::HealthResponse)),
    tags(
        (name = "export", description = "Archive export of every stored picture"),
        (name = "system", description = "Health checks and OpenAPI spec"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the forwarded bearer credential as a security scheme
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}
