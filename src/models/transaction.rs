//! Transaction input model

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A transaction as submitted for scoring, already parsed into typed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Transaction type label (CASH_OUT, PAYMENT, CASH_IN, TRANSFER, DEBIT)
    #[serde(rename = "type")]
    pub transaction_type: String,

    /// Simulation time step (one step = one hour)
    pub step: i64,

    /// Transaction amount
    pub amount: f64,

    /// Originator balance before the transaction
    #[serde(rename = "oldbalanceOrg")]
    pub old_balance_org: f64,

    /// Originator balance after the transaction
    #[serde(rename = "newbalanceOrig")]
    pub new_balance_orig: f64,
}

/// Raw form fields exactly as posted
///
/// Every field is optional so that a missing field reaches the parser
/// instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransactionForm {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub step: Option<String>,
    pub amount: Option<String>,
    #[serde(rename = "oldbalanceOrg")]
    pub old_balance_org: Option<String>,
    #[serde(rename = "newbalanceOrig")]
    pub new_balance_orig: Option<String>,
}

impl TryFrom<RawTransactionForm> for TransactionInput {
    type Error = FieldError;

    fn try_from(form: RawTransactionForm) -> Result<Self, Self::Error> {
        let transaction_type = require("type", form.transaction_type)?;
        let step = parse_integer("step", require("step", form.step)?)?;
        let amount = parse_decimal("amount", require("amount", form.amount)?)?;
        let old_balance_org =
            parse_decimal("oldbalanceOrg", require("oldbalanceOrg", form.old_balance_org)?)?;
        let new_balance_orig =
            parse_decimal("newbalanceOrig", require("newbalanceOrig", form.new_balance_orig)?)?;

        Ok(Self {
            transaction_type,
            step,
            amount,
            old_balance_org,
            new_balance_orig,
        })
    }
}

fn require(field: &'static str, value: Option<String>) -> Result<String, FieldError> {
    value.ok_or(FieldError::Missing { field })
}

fn parse_integer(field: &'static str, raw: String) -> Result<i64, FieldError> {
    parse_trimmed::<i64>(&raw).ok_or_else(|| FieldError::Invalid {
        field,
        value: raw,
        reason: "expected an integer".to_string(),
    })
}

fn parse_decimal(field: &'static str, raw: String) -> Result<f64, FieldError> {
    match parse_trimmed::<f64>(&raw) {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(FieldError::Invalid {
            field,
            value: raw,
            reason: "expected a finite number".to_string(),
        }),
        None => Err(FieldError::Invalid {
            field,
            value: raw,
            reason: "expected a decimal number".to_string(),
        }),
    }
}

fn parse_trimmed<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
