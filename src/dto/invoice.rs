use crate::domain;
use derive_more::Display;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Balances are stored as NUMERIC(18, 2), so after rounding to cents they must stay below 10^16
const BALANCE_LIMIT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

fn validate_prior_balance(balance: &Decimal) -> Result<(), ValidationError> {
    let stored_balance = balance.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if stored_balance.abs() >= BALANCE_LIMIT {
        return Err(ValidationError::new("balance_out_of_range"));
    }
    Ok(())
}

/// DTO for creating a new invoice via the API
#[derive(Deserialize, Display, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[display("invoice {invoice_id} from {vendor_name}")]
#[cfg_attr(test, derive(Serialize, Clone, Debug))]
pub struct NewInvoice {
    #[schema(example = 1)]
    pub invoice_id: i32,
    #[validate(length(min = 1))]
    #[schema(example = "P1")]
    pub pmc: String,
    #[validate(length(min = 1))]
    #[schema(example = "S1")]
    pub site_name: String,
    #[validate(length(min = 1))]
    #[schema(example = "V1")]
    pub vendor_name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[validate(custom = "validate_prior_balance")]
    #[schema(value_type = f64, example = 100.00)]
    pub prior_balance: Decimal,
}

impl From<NewInvoice> for domain::invoice::NewInvoice {
    fn from(value: NewInvoice) -> Self {
        domain::invoice::NewInvoice {
            invoice_id: value.invoice_id,
            pmc: value.pmc,
            site_name: value.site_name,
            vendor_name: value.vendor_name,
            prior_balance: value.prior_balance,
        }
    }
}

/// DTO for an invoice returned by the API
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct Invoice {
    #[schema(example = 1)]
    pub invoice_id: i32,
    #[schema(example = "P1")]
    pub pmc: String,
    #[schema(example = "S1")]
    pub site_name: String,
    #[schema(example = "V1")]
    pub vendor_name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64, example = 100.00)]
    pub prior_balance: Decimal,
}

impl From<domain::invoice::Invoice> for Invoice {
    fn from(value: domain::invoice::Invoice) -> Self {
        Invoice {
            invoice_id: value.invoice_id,
            pmc: value.pmc,
            site_name: value.site_name,
            vendor_name: value.vendor_name,
            prior_balance: value.prior_balance,
        }
    }
}
