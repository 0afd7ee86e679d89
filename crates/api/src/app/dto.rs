//! Request DTOs and mapping to engine inputs.

use rust_decimal::Decimal;
use serde::Deserialize;

use sambaza_ledger::{AccountCreationInput, Currency, HeaderCategory};

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub customer_name: String,
    pub amount: Option<Decimal>,
    pub currency: Currency,
    pub header: HeaderCategory,
}

impl CreateAccountRequest {
    pub fn into_input(self) -> AccountCreationInput {
        AccountCreationInput {
            customer_name: self.customer_name,
            amount: self.amount,
            currency: self.currency,
            header: self.header,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub source_account_id: String,
    pub destination_account_id: String,
    pub amount: Decimal,
}
