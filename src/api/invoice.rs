use crate::domain::assignment::driving_ports::{AssignmentError, UnassignOutcome};
use crate::domain::invoice::driving_ports::InvoiceError;
use crate::external_connections::{ExternalConnectivity, TransactableExternalConnectivity};
use crate::routing_utils::{
    Envelope, GenericErrorResponse, Json, NotFoundResponse, Path, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(
    create_invoice,
    get_invoices,
    get_invoice,
    delete_invoice,
    assign_invoice,
    get_assignments,
    unassign_invoice
))]
/// Defines the OpenAPI documentation for the invoice API
pub struct InvoiceApi;
/// Constant used to group invoice endpoints in OpenAPI documentation
pub const INVOICE_API_GROUP: &str = "Invoices";

/// Builds a router for all the invoice routes, including assignments
pub fn invoice_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            post(
                |State(app_state): AppState,
                 Json(new_invoice): Json<dto::invoice::NewInvoice>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let invoice_service = domain::invoice::InvoiceService {};
                    let invoice_writer = persistence::db_invoice_driven_ports::DbInvoiceWriter;

                    create_invoice(new_invoice, &mut ext_cxn, &invoice_service, &invoice_writer)
                        .await
                },
            )
            .get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let invoice_service = domain::invoice::InvoiceService {};
                let invoice_reader = persistence::db_invoice_driven_ports::DbInvoiceReader;

                get_invoices(&mut ext_cxn, &invoice_service, &invoice_reader).await
            }),
        )
        .route(
            "/assign",
            post(
                |State(app_state): AppState,
                 Json(request): Json<dto::assignment::AssignmentRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let assignment_service = domain::assignment::AssignmentService {};

                    assign_invoice(
                        request,
                        &mut ext_cxn,
                        &assignment_service,
                        &persistence::db_invoice_driven_ports::DbDetectInvoice,
                        &persistence::db_user_driven_ports::DbDetectUser,
                        &persistence::db_assignment_driven_ports::DbAssignmentWriter,
                    )
                    .await
                },
            ),
        )
        .route(
            "/assignments",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let assignment_service = domain::assignment::AssignmentService {};
                let assignment_reader = persistence::db_assignment_driven_ports::DbAssignmentReader;

                get_assignments(&mut ext_cxn, &assignment_service, &assignment_reader).await
            }),
        )
        .route(
            "/unassign",
            post(
                |State(app_state): AppState,
                 Json(request): Json<dto::assignment::AssignmentRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let assignment_service = domain::assignment::AssignmentService {};

                    unassign_invoice(
                        request,
                        &mut ext_cxn,
                        &assignment_service,
                        &persistence::db_invoice_driven_ports::DbDetectInvoice,
                        &persistence::db_user_driven_ports::DbDetectUser,
                        &persistence::db_assignment_driven_ports::DbAssignmentWriter,
                    )
                    .await
                },
            ),
        )
        .route(
            "/:invoice_id",
            get(
                |State(app_state): AppState, Path(invoice_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let invoice_service = domain::invoice::InvoiceService {};
                    let invoice_reader = persistence::db_invoice_driven_ports::DbInvoiceReader;

                    get_invoice(invoice_id, &mut ext_cxn, &invoice_service, &invoice_reader).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(invoice_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let invoice_service = domain::invoice::InvoiceService {};
                    let invoice_writer = persistence::db_invoice_driven_ports::DbInvoiceWriter;

                    delete_invoice(invoice_id, &mut ext_cxn, &invoice_service, &invoice_writer)
                        .await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/api/invoice",
    tag = INVOICE_API_GROUP,
    request_body = NewInvoice,
    responses(
        (status = 200, description = "Invoice created, returned as the envelope's data", body = InvoiceEnvelope),
        (status = 400, description = "Invalid invoice fields", body = ValidationErrorEnvelope,
            example = json!({
                "statusCode": 400,
                "message": "Submitted data was invalid.",
                "data": { "pmc": [{ "code": "length", "message": null, "params": { "value": "", "min": 1 } }] }
            })),
        (status = 500, description = "The invoice could not be stored, for example because the ID is taken", body = MessageEnvelope,
            example = json!({
                "statusCode": 500,
                "message": "Error creating invoice",
                "data": "Inserting invoice 1: duplicate key value violates unique constraint \"invoice_pkey\""
            })),
    ),
)]
/// Creates an invoice
async fn create_invoice(
    new_invoice: dto::invoice::NewInvoice,
    ext_cxn: &mut impl ExternalConnectivity,
    invoice_service: &impl domain::invoice::driving_ports::InvoicePort,
    invoice_write: &impl domain::invoice::driven_ports::InvoiceWriter,
) -> Result<Envelope<dto::invoice::Invoice>, ErrorResponse> {
    info!("Attempt to create {new_invoice}");
    new_invoice
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let domain_invoice = domain::invoice::NewInvoice::from(new_invoice);
    let created_invoice = invoice_service
        .create_invoice(&domain_invoice, ext_cxn, invoice_write)
        .await
        .map_err(|err| GenericErrorResponse::new("Error creating invoice", err))?;

    Ok(Envelope::ok(
        "Invoice created successfully",
        created_invoice.into(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/invoice",
    tag = INVOICE_API_GROUP,
    responses(
        (status = 200, description = "Every invoice, possibly none", body = InvoiceListEnvelope),
        (status = 500, description = "Invoices could not be read", body = MessageEnvelope),
    ),
)]
/// Retrieves every invoice
async fn get_invoices(
    ext_cxn: &mut impl ExternalConnectivity,
    invoice_service: &impl domain::invoice::driving_ports::InvoicePort,
    invoice_read: &impl domain::invoice::driven_ports::InvoiceReader,
) -> Result<Envelope<Vec<dto::invoice::Invoice>>, ErrorResponse> {
    info!("Requested invoices");
    let invoices = invoice_service
        .get_invoices(ext_cxn, invoice_read)
        .await
        .map_err(|err| GenericErrorResponse::new("Error retrieving invoices", err))?;

    let message = if invoices.is_empty() {
        "No invoices found"
    } else {
        "Invoices retrieved successfully"
    };

    Ok(Envelope::ok(
        message,
        invoices.into_iter().map(dto::invoice::Invoice::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/invoice/{invoice_id}",
    tag = INVOICE_API_GROUP,
    params(
        ("invoice_id" = i32, Path, description = "The ID of the invoice to retrieve"),
    ),
    responses(
        (status = 200, description = "The requested invoice", body = InvoiceEnvelope),
        (status = 404, description = "Invoice not found", body = MessageEnvelope,
            example = json!({ "statusCode": 404, "message": "Invoice not found", "data": null })),
        (status = 500, description = "The invoice could not be read", body = MessageEnvelope),
    ),
)]
/// Retrieves a single invoice
async fn get_invoice(
    invoice_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    invoice_service: &impl domain::invoice::driving_ports::InvoicePort,
    invoice_read: &impl domain::invoice::driven_ports::InvoiceReader,
) -> Result<Envelope<dto::invoice::Invoice>, ErrorResponse> {
    info!("Get invoice {invoice_id}");
    let invoice_result = invoice_service
        .get_invoice(invoice_id, ext_cxn, invoice_read)
        .await;

    match invoice_result {
        Ok(invoice) => Ok(Envelope::ok(
            "Invoice retrieved successfully",
            invoice.into(),
        )),
        Err(InvoiceError::InvoiceDoesNotExist(_)) => Err(NotFoundResponse("Invoice not found").into()),
        Err(err) => Err(GenericErrorResponse::new("Error retrieving invoice", err).into()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/invoice/{invoice_id}",
    tag = INVOICE_API_GROUP,
    params(
        ("invoice_id" = i32, Path, description = "The ID of the invoice to delete"),
    ),
    responses(
        (status = 200, description = "Invoice deleted along with its assignments. The envelope carries no data", body = MessageEnvelope,
            example = json!({ "statusCode": 200, "message": "Invoice deleted successfully", "data": null })),
        (status = 404, description = "Invoice not found", body = MessageEnvelope),
        (status = 500, description = "The invoice could not be deleted", body = MessageEnvelope),
    ),
)]
/// Deletes an invoice
async fn delete_invoice(
    invoice_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    invoice_service: &impl domain::invoice::driving_ports::InvoicePort,
    invoice_write: &impl domain::invoice::driven_ports::InvoiceWriter,
) -> Result<Envelope<()>, ErrorResponse> {
    info!("Deleting invoice {invoice_id}");
    let delete_result = invoice_service
        .delete_invoice(invoice_id, ext_cxn, invoice_write)
        .await;

    match delete_result {
        Ok(()) => Ok(Envelope::ok_empty("Invoice deleted successfully")),
        Err(InvoiceError::InvoiceDoesNotExist(_)) => Err(NotFoundResponse("Invoice not found").into()),
        Err(err) => Err(GenericErrorResponse::new("Error deleting invoice", err).into()),
    }
}

/// Converts a failed (un)assignment into the matching response. Missing invoices and users
/// are reported as not found.
fn assignment_error_response(err: AssignmentError, failure_message: &'static str) -> ErrorResponse {
    match err {
        AssignmentError::InvoiceDoesNotExist(_) => NotFoundResponse("Invoice not found").into(),
        AssignmentError::UserDoesNotExist(_) => NotFoundResponse("User not found").into(),
        AssignmentError::PortError(_) => GenericErrorResponse::new(failure_message, err).into(),
    }
}

#[utoipa::path(
    post,
    path = "/api/invoice/assign",
    tag = INVOICE_API_GROUP,
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "The invoice is assigned to the user", body = AssignmentEnvelope),
        (status = 400, description = "Malformed assignment request", body = MessageEnvelope),
        (status = 404, description = "Invoice or user not found", body = MessageEnvelope,
            example = json!({ "statusCode": 404, "message": "User not found", "data": null })),
        (status = 500, description = "The assignment could not be recorded", body = MessageEnvelope),
    ),
)]
/// Assigns an invoice to a user. Assigning a pair that is already assigned succeeds without
/// creating a second assignment.
async fn assign_invoice(
    request: dto::assignment::AssignmentRequest,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    assignment_service: &impl domain::assignment::driving_ports::AssignmentPort,
    invoice_detect: &impl domain::invoice::driven_ports::DetectInvoice,
    user_detect: &impl domain::user::driven_ports::DetectUser,
    assignment_write: &impl domain::assignment::driven_ports::AssignmentWriter,
) -> Result<Envelope<dto::assignment::Assignment>, ErrorResponse> {
    info!(
        "Assigning invoice {} to user {}",
        request.invoice_id, request.user_id
    );
    let assignment = domain::assignment::Assignment::from(request);

    let assigned = assignment_service
        .assign(
            &assignment,
            ext_cxn,
            invoice_detect,
            user_detect,
            assignment_write,
        )
        .await
        .map_err(|err| assignment_error_response(err, "Error assigning invoice to user"))?;

    Ok(Envelope::ok(
        "Invoice assigned to user successfully",
        assigned.into(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/invoice/assignments",
    tag = INVOICE_API_GROUP,
    responses(
        (status = 200, description = "Every assignment, plus a row with a null user for each unassigned invoice", body = InvoiceAssignmentListEnvelope),
        (status = 500, description = "Assignments could not be read", body = MessageEnvelope),
    ),
)]
/// Lists the assignments of every invoice
async fn get_assignments(
    ext_cxn: &mut impl ExternalConnectivity,
    assignment_service: &impl domain::assignment::driving_ports::AssignmentPort,
    assignment_read: &impl domain::assignment::driven_ports::AssignmentReader,
) -> Result<Envelope<Vec<dto::assignment::InvoiceAssignment>>, ErrorResponse> {
    info!("Requested invoice assignments");
    let assignments = assignment_service
        .assignments(ext_cxn, assignment_read)
        .await
        .map_err(|err| GenericErrorResponse::new("Error retrieving invoice assignments", err))?;

    Ok(Envelope::ok(
        "Invoice assignments retrieved successfully",
        assignments
            .into_iter()
            .map(dto::assignment::InvoiceAssignment::from)
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/invoice/unassign",
    tag = INVOICE_API_GROUP,
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "The invoice is no longer assigned to the user (also returned if it never was). The envelope carries no data", body = MessageEnvelope),
        (status = 400, description = "Malformed unassignment request", body = MessageEnvelope),
        (status = 404, description = "Invoice or user not found", body = MessageEnvelope),
        (status = 500, description = "The assignment could not be removed", body = MessageEnvelope),
    ),
)]
/// Removes an invoice's assignment to a user
async fn unassign_invoice(
    request: dto::assignment::AssignmentRequest,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    assignment_service: &impl domain::assignment::driving_ports::AssignmentPort,
    invoice_detect: &impl domain::invoice::driven_ports::DetectInvoice,
    user_detect: &impl domain::user::driven_ports::DetectUser,
    assignment_write: &impl domain::assignment::driven_ports::AssignmentWriter,
) -> Result<Envelope<()>, ErrorResponse> {
    info!(
        "Unassigning invoice {} from user {}",
        request.invoice_id, request.user_id
    );
    let assignment = domain::assignment::Assignment::from(request);

    let outcome = assignment_service
        .unassign(
            &assignment,
            ext_cxn,
            invoice_detect,
            user_detect,
            assignment_write,
        )
        .await
        .map_err(|err| assignment_error_response(err, "Error unassigning invoice from user"))?;

    let message = match outcome {
        UnassignOutcome::Unassigned => "Invoice unassigned from user successfully",
        UnassignOutcome::WasNotAssigned => "Invoice is not assigned to the user",
    };
    Ok(Envelope::ok_empty(message))
}
