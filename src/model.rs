//! Core domain types for the ledger.

use crate::Amount;

/// Client identifier, wrapped modulo 2^16 by the validator.
pub type ClientId = u16;

/// Transaction identifier, wrapped modulo 2^32 by the validator.
pub type TxId = u32;

/// The five transaction kinds the ledger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Deposit,
    Withdrawal,
    Dispute,
    Resolve,
    Chargeback,
}

impl TxKind {
    /// Case-sensitive mapping from the input `type` field.
    pub fn parse(s: &str) -> Option<TxKind> {
        match s {
            "deposit" => Some(TxKind::Deposit),
            "withdrawal" => Some(TxKind::Withdrawal),
            "dispute" => Some(TxKind::Dispute),
            "resolve" => Some(TxKind::Resolve),
            "chargeback" => Some(TxKind::Chargeback),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Deposit => "deposit",
            TxKind::Withdrawal => "withdrawal",
            TxKind::Dispute => "dispute",
            TxKind::Resolve => "resolve",
            TxKind::Chargeback => "chargeback",
        }
    }
}

/// The kinds of transaction that move money and can therefore be disputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonetaryKind {
    Deposit,
    Withdrawal,
}

/// A validated transaction record, one per retained input row.
///
/// `amount` is zero when the input field was blank, which is the normal case
/// for dispute, resolve and chargeback rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxRecord {
    pub kind: TxKind,
    pub client: ClientId,
    pub tx: TxId,
    pub amount: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_round_trips() {
        for kind in [
            TxKind::Deposit,
            TxKind::Withdrawal,
            TxKind::Dispute,
            TxKind::Resolve,
            TxKind::Chargeback,
        ] {
            assert_eq!(TxKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn kind_parse_is_case_sensitive() {
        assert_eq!(TxKind::parse("Deposit"), None);
        assert_eq!(TxKind::parse("WITHDRAWAL"), None);
        assert_eq!(TxKind::parse(""), None);
    }
}
