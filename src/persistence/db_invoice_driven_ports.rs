use crate::domain;
use crate::domain::invoice::{Invoice, NewInvoice};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use rust_decimal::Decimal;
use sqlx::{FromRow, query, query_as};

#[derive(FromRow)]
struct InvoiceRow {
    invoice_id: i32,
    pmc: String,
    site_name: String,
    vendor_name: String,
    prior_balance: Decimal,
}

impl From<InvoiceRow> for Invoice {
    fn from(value: InvoiceRow) -> Self {
        Invoice {
            invoice_id: value.invoice_id,
            pmc: value.pmc,
            site_name: value.site_name,
            vendor_name: value.vendor_name,
            prior_balance: value.prior_balance,
        }
    }
}

pub struct DbInvoiceReader;

impl domain::invoice::driven_ports::InvoiceReader for DbInvoiceReader {
    async fn get_all(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Invoice>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let invoices = query_as::<_, InvoiceRow>(
            "SELECT invoice_id, pmc, site_name, vendor_name, prior_balance FROM invoice ORDER BY invoice_id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("Fetching all invoices")?
        .into_iter()
        .map(Invoice::from)
        .collect();

        Ok(invoices)
    }

    async fn get_by_id(
        &self,
        invoice_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Invoice>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let invoice = query_as::<_, InvoiceRow>(
            "SELECT invoice_id, pmc, site_name, vendor_name, prior_balance FROM invoice i WHERE i.invoice_id = $1",
        )
        .bind(invoice_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("Fetching an invoice by id")?;

        Ok(invoice.map(Invoice::from))
    }
}

pub struct DbInvoiceWriter;

impl domain::invoice::driven_ports::InvoiceWriter for DbInvoiceWriter {
    async fn create_invoice(
        &self,
        invoice: &NewInvoice,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Invoice, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = query_as::<_, InvoiceRow>(
            "INSERT INTO invoice(invoice_id, pmc, site_name, vendor_name, prior_balance) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING invoice_id, pmc, site_name, vendor_name, prior_balance",
        )
        .bind(invoice.invoice_id)
        .bind(&invoice.pmc)
        .bind(&invoice.site_name)
        .bind(&invoice.vendor_name)
        .bind(invoice.prior_balance)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("Inserting new invoice")?;

        Ok(created.into())
    }

    async fn delete_invoice(
        &self,
        invoice_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result = query("DELETE FROM invoice WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(cxn.borrow_connection())
            .await
            .context("Removing an invoice from the database")?;

        Ok(delete_result.rows_affected() > 0)
    }
}

pub struct DbDetectInvoice;

impl domain::invoice::driven_ports::DetectInvoice for DbDetectInvoice {
    async fn invoice_exists(
        &self,
        invoice_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        // Inside a transaction the lock keeps the row from being deleted until commit
        let locked_invoice =
            query("SELECT 1 FROM invoice i WHERE i.invoice_id = $1 FOR KEY SHARE")
                .bind(invoice_id)
                .fetch_optional(cxn.borrow_connection())
                .await
                .context("Detecting invoice with ID")?;

        Ok(locked_invoice.is_some())
    }
}
