use crate::domain;
use crate::domain::assignment::driving_ports::{AssignmentError, UnassignOutcome};
use crate::external_connections::{
    ExternalConnectivity, TransactableExternalConnectivity, TransactionHandle,
};
use anyhow::Context;
use tracing::{error, info};

/// A link between one invoice and one user
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Assignment {
    pub invoice_id: i32,
    pub user_id: i32,
}

/// One row of the assignment listing. Invoices nobody is assigned to still get a
/// row, with no user.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct InvoiceAssignment {
    pub invoice_id: i32,
    pub user_id: Option<i32>,
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    pub trait AssignmentReader {
        /// Lists every assignment, plus one placeholder row (without a user) for each
        /// invoice that has no assignments. Rows are ordered by invoice ID, then user ID.
        async fn all_assignments(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<InvoiceAssignment>, anyhow::Error>;
    }

    pub trait AssignmentWriter {
        /// Records an assignment. Recording a pair that is already assigned is a no-op.
        async fn assign(
            &self,
            assignment: &Assignment,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;

        /// Removes an assignment, returning false if the pair was not assigned
        async fn unassign(
            &self,
            assignment: &Assignment,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use crate::external_connections::{ExternalConnectivity, TransactableExternalConnectivity};
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum AssignmentError {
        #[error("invoice {0} does not exist")]
        InvoiceDoesNotExist(i32),
        #[error("user {0} does not exist")]
        UserDoesNotExist(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    impl From<domain::invoice::InvoiceExistsErr> for AssignmentError {
        fn from(value: domain::invoice::InvoiceExistsErr) -> Self {
            match value {
                domain::invoice::InvoiceExistsErr::InvoiceDoesNotExist(invoice_id) => {
                    AssignmentError::InvoiceDoesNotExist(invoice_id)
                }
                domain::invoice::InvoiceExistsErr::PortError(err) => {
                    AssignmentError::from(err.context("Looking up invoice for assignment"))
                }
            }
        }
    }

    impl From<domain::user::UserExistsErr> for AssignmentError {
        fn from(value: domain::user::UserExistsErr) -> Self {
            match value {
                domain::user::UserExistsErr::UserDoesNotExist(user_id) => {
                    AssignmentError::UserDoesNotExist(user_id)
                }
                domain::user::UserExistsErr::PortError(err) => {
                    AssignmentError::from(err.context("Looking up user for assignment"))
                }
            }
        }
    }

    /// What happened when asked to remove an assignment
    #[derive(PartialEq, Eq, Debug)]
    pub enum UnassignOutcome {
        Unassigned,
        WasNotAssigned,
    }

    pub trait AssignmentPort {
        async fn assign(
            &self,
            assignment: &Assignment,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            invoice_detect: &impl domain::invoice::driven_ports::DetectInvoice,
            user_detect: &impl domain::user::driven_ports::DetectUser,
            assignment_write: &impl driven_ports::AssignmentWriter,
        ) -> Result<Assignment, AssignmentError>;
        async fn assignments(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            assignment_read: &impl driven_ports::AssignmentReader,
        ) -> Result<Vec<InvoiceAssignment>, anyhow::Error>;
        async fn unassign(
            &self,
            assignment: &Assignment,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            invoice_detect: &impl domain::invoice::driven_ports::DetectInvoice,
            user_detect: &impl domain::user::driven_ports::DetectUser,
            assignment_write: &impl driven_ports::AssignmentWriter,
        ) -> Result<UnassignOutcome, AssignmentError>;
    }
}

pub struct AssignmentService {}

impl driving_ports::AssignmentPort for AssignmentService {
    async fn assign(
        &self,
        assignment: &Assignment,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        invoice_detect: &impl domain::invoice::driven_ports::DetectInvoice,
        user_detect: &impl domain::user::driven_ports::DetectUser,
        assignment_write: &impl driven_ports::AssignmentWriter,
    ) -> Result<Assignment, AssignmentError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("starting transaction for assignment")?;

        domain::invoice::verify_invoice_exists(assignment.invoice_id, &mut txn, invoice_detect)
            .await?;
        domain::user::verify_user_exists(assignment.user_id, &mut txn, user_detect).await?;
        assignment_write
            .assign(assignment, &mut txn)
            .await
            .context("recording assignment")?;

        txn.commit().await.context("committing assignment")?;
        info!(
            "Assigned invoice {} to user {}",
            assignment.invoice_id, assignment.user_id
        );

        Ok(*assignment)
    }

    async fn assignments(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        assignment_read: &impl driven_ports::AssignmentReader,
    ) -> Result<Vec<InvoiceAssignment>, anyhow::Error> {
        let assignments_result = assignment_read.all_assignments(ext_cxn).await;
        if let Err(ref port_err) = assignments_result {
            error!("Assignment fetch failure: {port_err}");
        }

        assignments_result.context("Failed fetching invoice assignments")
    }

    async fn unassign(
        &self,
        assignment: &Assignment,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        invoice_detect: &impl domain::invoice::driven_ports::DetectInvoice,
        user_detect: &impl domain::user::driven_ports::DetectUser,
        assignment_write: &impl driven_ports::AssignmentWriter,
    ) -> Result<UnassignOutcome, AssignmentError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("starting transaction for unassignment")?;

        domain::invoice::verify_invoice_exists(assignment.invoice_id, &mut txn, invoice_detect)
            .await?;
        domain::user::verify_user_exists(assignment.user_id, &mut txn, user_detect).await?;
        let was_assigned = assignment_write
            .unassign(assignment, &mut txn)
            .await
            .context("removing assignment")?;

        txn.commit().await.context("committing unassignment")?;

        if was_assigned {
            Ok(UnassignOutcome::Unassigned)
        } else {
            Ok(UnassignOutcome::WasNotAssigned)
        }
    }
}
