//! Rule violations the engine absorbs without stopping the run.

use thiserror::Error;

use crate::Amount;
use crate::model::{ClientId, TxId};

/// A record that breaks a ledger rule.
///
/// Never fatal: the record is logged, skipped, and the run continues. Only
/// upstream validation failures abort processing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("transaction id {0} was already used by a deposit or withdrawal")]
    DuplicateTx(TxId),

    #[error("insufficient funds for client {client}: available {available}, requested {requested}")]
    InsufficientFunds {
        client: ClientId,
        available: Amount,
        requested: Amount,
    },

    #[error("no earlier transaction {0} for this client")]
    UnknownTx(TxId),

    #[error("transaction {0} does not reference a deposit or withdrawal")]
    NotDisputable(TxId),

    #[error("transaction {0} is not under dispute")]
    NotDisputed(TxId),

    #[error("client {0} has no account")]
    NoAccount(ClientId),
}
