use crate::routing_utils::{
    AssignmentEnvelope, InvoiceAssignmentListEnvelope, InvoiceEnvelope, InvoiceListEnvelope,
    MessageEnvelope, UserEnvelope, UserListEnvelope, ValidationErrorEnvelope,
    ValidationErrorSchema,
};
use utoipa::OpenApi;

pub mod assignment;
pub mod invoice;
pub mod user;

#[derive(OpenApi)]
#[openapi(components(schemas(
    invoice::NewInvoice,
    invoice::Invoice,
    user::NewUser,
    user::User,
    assignment::AssignmentRequest,
    assignment::Assignment,
    assignment::InvoiceAssignment,
    InvoiceEnvelope,
    InvoiceListEnvelope,
    AssignmentEnvelope,
    InvoiceAssignmentListEnvelope,
    UserEnvelope,
    UserListEnvelope,
    MessageEnvelope,
    ValidationErrorEnvelope,
    ValidationErrorSchema,
)))]
/// Captures OpenAPI schemas and canned responses defined in the DTO module
pub struct OpenApiSchemas;
