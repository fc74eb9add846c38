use crate::domain;
use crate::domain::assignment::{Assignment, InvoiceAssignment};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

#[derive(FromRow)]
struct InvoiceAssignmentRow {
    invoice_id: i32,
    user_id: Option<i32>,
}

impl From<InvoiceAssignmentRow> for InvoiceAssignment {
    fn from(value: InvoiceAssignmentRow) -> Self {
        InvoiceAssignment {
            invoice_id: value.invoice_id,
            user_id: value.user_id,
        }
    }
}

pub struct DbAssignmentReader;

impl domain::assignment::driven_ports::AssignmentReader for DbAssignmentReader {
    async fn all_assignments(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<InvoiceAssignment>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let assignments = query_as::<_, InvoiceAssignmentRow>(
            "SELECT i.invoice_id, ia.user_id FROM invoice i \
             LEFT JOIN invoice_assignment ia ON ia.invoice_id = i.invoice_id \
             ORDER BY i.invoice_id, ia.user_id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to list invoice assignments")?
        .into_iter()
        .map(InvoiceAssignment::from)
        .collect();

        Ok(assignments)
    }
}

pub struct DbAssignmentWriter;

impl domain::assignment::driven_ports::AssignmentWriter for DbAssignmentWriter {
    async fn assign(
        &self,
        assignment: &Assignment,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        query(
            "INSERT INTO invoice_assignment(invoice_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (invoice_id, user_id) DO NOTHING",
        )
        .bind(assignment.invoice_id)
        .bind(assignment.user_id)
        .execute(cxn.borrow_connection())
        .await
        .context("trying to assign an invoice to a user")?;

        Ok(())
    }

    async fn unassign(
        &self,
        assignment: &Assignment,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result =
            query("DELETE FROM invoice_assignment WHERE invoice_id = $1 AND user_id = $2")
                .bind(assignment.invoice_id)
                .bind(assignment.user_id)
                .execute(cxn.borrow_connection())
                .await
                .context("trying to unassign an invoice from a user")?;

        Ok(delete_result.rows_affected() > 0)
    }
}
