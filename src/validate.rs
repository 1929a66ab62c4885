//! Raw record validation.
//!
//! Turns raw textual fields into typed [`TxRecord`]s. Identifier fields wrap
//! modulo their integer width, amounts are quantized to four fractional
//! digits, and rows with an empty transaction id are dropped without error.
//! Any other field that cannot be coerced is a fatal [`ValidationError`].

use serde::Deserialize;
use thiserror::Error;

use crate::Amount;
use crate::model::{ClientId, TxId, TxKind, TxRecord};

/// One input row, fields still unparsed. The amount column may be absent
/// entirely on short rows.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub r#type: String,
    pub client: String,
    pub tx: String,
    pub amount: Option<String>,
}

/// A single field that could not be parsed, with its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadField {
    pub field: &'static str,
    pub value: String,
}

/// Fatal validation failure. Aborts the whole run before any ledger output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unrecognized transaction type '{0}'")]
    UnknownKind(String),

    #[error("{}", render_fields(.0))]
    BadFields(Vec<BadField>),
}

fn render_fields(fields: &[BadField]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|f| format!("{} = '{}'", f.field, f.value))
        .collect();
    format!("invalid field value(s): {}", parts.join(", "))
}

/// Parse an integer field and wrap it into a power-of-two range. Negative
/// inputs wrap to the top of the range.
fn parse_wrapped(field: &str, modulus: i128) -> Option<i128> {
    field.parse::<i128>().ok().map(|v| v.rem_euclid(modulus))
}

/// Validate one raw row.
///
/// Returns `Ok(None)` for rows with an empty transaction id; those vanish
/// before any other field is examined, so garbage elsewhere in such a row is
/// not an error. Every failed field of a retained row is reported, not just
/// the first.
pub fn validate(raw: &RawRecord) -> Result<Option<TxRecord>, ValidationError> {
    if raw.tx.is_empty() {
        return Ok(None);
    }

    let kind = TxKind::parse(&raw.r#type)
        .ok_or_else(|| ValidationError::UnknownKind(raw.r#type.clone()))?;

    let mut bad = Vec::new();

    let client = parse_wrapped(&raw.client, 1 << 16);
    if client.is_none() {
        bad.push(BadField {
            field: "client",
            value: raw.client.clone(),
        });
    }

    let tx = parse_wrapped(&raw.tx, 1 << 32);
    if tx.is_none() {
        bad.push(BadField {
            field: "tx",
            value: raw.tx.clone(),
        });
    }

    let amount_raw = raw.amount.as_deref().unwrap_or("");
    let amount = if amount_raw.is_empty() {
        Some(Amount::ZERO)
    } else {
        amount_raw.parse::<f64>().ok().map(Amount::from_f64)
    };
    if amount.is_none() {
        bad.push(BadField {
            field: "amount",
            value: amount_raw.to_string(),
        });
    }

    match (client, tx, amount) {
        (Some(client), Some(tx), Some(amount)) => Ok(Some(TxRecord {
            kind,
            client: client as ClientId,
            tx: tx as TxId,
            amount,
        })),
        _ => Err(ValidationError::BadFields(bad)),
    }
}
