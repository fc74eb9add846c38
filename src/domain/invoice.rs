use crate::domain::invoice::driving_ports::InvoiceError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::error;

/// An invoice billed by a vendor to a site
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct Invoice {
    pub invoice_id: i32,
    pub pmc: String,
    pub site_name: String,
    pub vendor_name: String,
    pub prior_balance: Decimal,
}

/// Data needed to record a new invoice. The caller picks the invoice's ID.
#[cfg_attr(test, derive(Clone, Debug))]
pub struct NewInvoice {
    pub invoice_id: i32,
    pub pmc: String,
    pub site_name: String,
    pub vendor_name: String,
    pub prior_balance: Decimal,
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    pub trait InvoiceReader {
        async fn get_all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Invoice>, anyhow::Error>;
        async fn get_by_id(
            &self,
            invoice_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Invoice>, anyhow::Error>;
    }

    pub trait InvoiceWriter {
        async fn create_invoice(
            &self,
            invoice: &NewInvoice,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Invoice, anyhow::Error>;

        /// Removes an invoice, returning false if there was no invoice to remove
        async fn delete_invoice(
            &self,
            invoice_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }

    /// Existence check used before writing rows that reference the invoice. When `ext_cxn` is
    /// in a transaction, a invoice that exists cannot be deleted until that transaction ends.
    pub trait DetectInvoice {
        async fn invoice_exists(
            &self,
            invoice_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    #[derive(Debug, Error)]
    pub enum InvoiceError {
        #[error("invoice {0} does not exist")]
        InvoiceDoesNotExist(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    pub trait InvoicePort {
        async fn get_invoices(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            invoice_read: &impl driven_ports::InvoiceReader,
        ) -> Result<Vec<Invoice>, anyhow::Error>;
        async fn get_invoice(
            &self,
            invoice_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            invoice_read: &impl driven_ports::InvoiceReader,
        ) -> Result<Invoice, InvoiceError>;
        async fn create_invoice(
            &self,
            new_invoice: &NewInvoice,
            ext_cxn: &mut impl ExternalConnectivity,
            invoice_write: &impl driven_ports::InvoiceWriter,
        ) -> Result<Invoice, anyhow::Error>;
        async fn delete_invoice(
            &self,
            invoice_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            invoice_write: &impl driven_ports::InvoiceWriter,
        ) -> Result<(), InvoiceError>;
    }
}

pub struct InvoiceService {}

#[derive(Debug, Error)]
pub(super) enum InvoiceExistsErr {
    #[error("invoice with ID {0} does not exist")]
    InvoiceDoesNotExist(i32),

    #[error(transparent)]
    PortError(#[from] anyhow::Error),
}

pub(super) async fn verify_invoice_exists(
    invoice_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    invoice_detect: &impl driven_ports::DetectInvoice,
) -> Result<(), InvoiceExistsErr> {
    let does_invoice_exist = invoice_detect.invoice_exists(invoice_id, ext_cxn).await?;

    if does_invoice_exist {
        Ok(())
    } else {
        Err(InvoiceExistsErr::InvoiceDoesNotExist(invoice_id))
    }
}

impl driving_ports::InvoicePort for InvoiceService {
    async fn get_invoices(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        invoice_read: &impl driven_ports::InvoiceReader,
    ) -> Result<Vec<Invoice>, anyhow::Error> {
        let all_invoices_result = invoice_read.get_all(ext_cxn).await;
        if let Err(ref port_err) = all_invoices_result {
            error!("Invoice fetch failure: {port_err}");
        }

        all_invoices_result.context("Failed fetching invoices")
    }

    async fn get_invoice(
        &self,
        invoice_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        invoice_read: &impl driven_ports::InvoiceReader,
    ) -> Result<Invoice, InvoiceError> {
        invoice_read
            .get_by_id(invoice_id, ext_cxn)
            .await
            .context("Fetching invoice by ID")?
            .ok_or(InvoiceError::InvoiceDoesNotExist(invoice_id))
    }

    async fn create_invoice(
        &self,
        new_invoice: &NewInvoice,
        ext_cxn: &mut impl ExternalConnectivity,
        invoice_write: &impl driven_ports::InvoiceWriter,
    ) -> Result<Invoice, anyhow::Error> {
        invoice_write
            .create_invoice(new_invoice, ext_cxn)
            .await
            .context("Trying to create invoice at service level")
    }

    async fn delete_invoice(
        &self,
        invoice_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        invoice_write: &impl driven_ports::InvoiceWriter,
    ) -> Result<(), InvoiceError> {
        let was_deleted = invoice_write
            .delete_invoice(invoice_id, ext_cxn)
            .await
            .context("deleting an invoice")?;

        if was_deleted {
            Ok(())
        } else {
            Err(InvoiceError::InvoiceDoesNotExist(invoice_id))
        }
    }
}
