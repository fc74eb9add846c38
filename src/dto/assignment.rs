use crate::domain;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO naming an invoice and a user to link or unlink
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Serialize))]
pub struct AssignmentRequest {
    #[schema(example = 1)]
    pub invoice_id: i32,
    #[schema(example = 4)]
    pub user_id: i32,
}

impl From<AssignmentRequest> for domain::assignment::Assignment {
    fn from(value: AssignmentRequest) -> Self {
        domain::assignment::Assignment {
            invoice_id: value.invoice_id,
            user_id: value.user_id,
        }
    }
}

/// DTO for a recorded assignment
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct Assignment {
    #[schema(example = 1)]
    pub invoice_id: i32,
    #[schema(example = 4)]
    pub user_id: i32,
}

impl From<domain::assignment::Assignment> for Assignment {
    fn from(value: domain::assignment::Assignment) -> Self {
        Assignment {
            invoice_id: value.invoice_id,
            user_id: value.user_id,
        }
    }
}

/// DTO for one row of the assignment listing. `userId` is null for invoices
/// nobody is assigned to.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct InvoiceAssignment {
    #[schema(example = 1)]
    pub invoice_id: i32,
    #[schema(example = 4)]
    pub user_id: Option<i32>,
}

impl From<domain::assignment::InvoiceAssignment> for InvoiceAssignment {
    fn from(value: domain::assignment::InvoiceAssignment) -> Self {
        InvoiceAssignment {
            invoice_id: value.invoice_id,
            user_id: value.user_id,
        }
    }
}
