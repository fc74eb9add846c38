use crate::dto;
use utoipa::{OpenApi, openapi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Invoice API",
    description = "Records invoices and users, and tracks which users each invoice is assigned to. \
    Every response body is an envelope of the form {statusCode, message, data}."
))]
struct InvoiceServiceApi;

/// Assembles the OpenAPI document from the definitions in the [dto] package and the
/// submodules of [api][crate::api]
fn api_document() -> openapi::OpenApi {
    let mut api_docs = InvoiceServiceApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::invoice::InvoiceApi::openapi());
    api_docs.merge(super::user::UsersApi::openapi());
    api_docs
}

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema
pub fn build_documentation() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_document())
}
