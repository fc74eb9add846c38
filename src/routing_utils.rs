use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};

use crate::dto::assignment::{Assignment, InvoiceAssignment};
use crate::dto::invoice::Invoice;
use crate::dto::user::User;
use serde::Serialize;
#[cfg(test)]
use serde::Deserialize;
use tracing::error;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{ToSchema, openapi};
use validator::ValidationErrors;

/// The uniform body returned by every endpoint, successful or not. The HTTP status of the
/// response always matches `status_code`.
///
/// OpenAPI only knows the concrete envelopes listed in `aliases`. Payload types are named
/// without a module path so the generated references match their component names. A new
/// payload needs an alias here and a matching entry in [crate::dto::OpenApiSchemas].
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Deserialize))]
#[aliases(
    InvoiceEnvelope = Envelope<Invoice>,
    InvoiceListEnvelope = Envelope<Vec<Invoice>>,
    AssignmentEnvelope = Envelope<Assignment>,
    InvoiceAssignmentListEnvelope = Envelope<Vec<InvoiceAssignment>>,
    UserEnvelope = Envelope<User>,
    UserListEnvelope = Envelope<Vec<User>>,
    MessageEnvelope = Envelope<String>,
    ValidationErrorEnvelope = Envelope<ValidationErrorSchema>,
)]
pub struct Envelope<T> {
    #[schema(example = 200)]
    pub status_code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// A 200 envelope carrying data
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// A 200 envelope with a message and no data
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: None,
        }
    }

    fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

/// Response type for a keyed lookup that found nothing
pub struct NotFoundResponse(pub &'static str);

impl IntoResponse for NotFoundResponse {
    fn into_response(self) -> Response {
        Envelope::<()>::with_status(StatusCode::NOT_FOUND, self.0, None).into_response()
    }
}

/// Response type for unexpected failures. The message names the action that failed, and the
/// error chain is returned to the caller as the envelope's data.
pub struct GenericErrorResponse {
    pub message: &'static str,
    pub cause: anyhow::Error,
}

impl GenericErrorResponse {
    pub fn new(message: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            message,
            cause: cause.into(),
        }
    }
}

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("{}: {:#}", self.message, self.cause);
        Envelope::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            self.message,
            Some(format!("{:#}", self.cause)),
        )
        .into_response()
    }
}

/// Response type that wraps validation errors and turns them into an envelope
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        Envelope::with_status(
            StatusCode::BAD_REQUEST,
            "Submitted data was invalid.",
            Some(ValidationErrorSchema(self.0)),
        )
        .into_response()
    }
}

/// Stand-in OpenAPI schema for [ValidationErrors], which maps each invalid field to the
/// rules it broke
#[derive(Serialize, Debug)]
#[serde(transparent)]
pub struct ValidationErrorSchema(ValidationErrors);

impl<'schem> ToSchema<'schem> for ValidationErrorSchema {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "ValidationErrorSchema",
            openapi::ObjectBuilder::new()
                .description(Some("Invalid fields mapped to the validation rules they failed"))
                .into(),
        )
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// response envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        Envelope::with_status(
            StatusCode::BAD_REQUEST,
            "The passed request body contained malformed or unreadable JSON.",
            Some(self.parse_problem),
        )
        .into_response()
    }
}

/// Wrapper for [axum::extract::Path] which reports unparseable path parameters
/// inside the response envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PathErrorResponse))]
pub struct Path<T>(pub T);

/// Response type representing path parameters that could not be parsed
pub struct PathErrorResponse {
    parse_problem: String,
}

impl From<PathRejection> for PathErrorResponse {
    fn from(value: PathRejection) -> Self {
        PathErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for PathErrorResponse {
    fn into_response(self) -> Response {
        Envelope::with_status(
            StatusCode::BAD_REQUEST,
            "The request path contained an invalid parameter.",
            Some(self.parse_problem),
        )
        .into_response()
    }
}
