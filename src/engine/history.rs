//! Per-client transaction history.
//!
//! One entry is appended per retained input record. A dispute that matches a
//! prior monetary entry is appended already enriched with the disputed kind
//! and amount; entries are never mutated afterwards. Resolve and chargeback
//! lookups only act on the enriched form.

use crate::Amount;
use crate::model::{MonetaryKind, TxId, TxKind, TxRecord};

/// One log entry for a single client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEntry {
    /// A record as it arrived. Covers every kind, including disputes that
    /// failed to match anything.
    Plain {
        tx: TxId,
        kind: TxKind,
        amount: Amount,
    },
    /// A dispute that matched a monetary record, carrying the amount and
    /// kind of the transaction it disputes.
    OpenDispute {
        tx: TxId,
        disputed: MonetaryKind,
        amount: Amount,
    },
}

impl HistoryEntry {
    pub fn plain(record: &TxRecord) -> Self {
        HistoryEntry::Plain {
            tx: record.tx,
            kind: record.kind,
            amount: record.amount,
        }
    }

    pub fn tx(&self) -> TxId {
        match self {
            HistoryEntry::Plain { tx, .. } | HistoryEntry::OpenDispute { tx, .. } => *tx,
        }
    }
}

/// Append-only log of one client's records, in arrival order.
#[derive(Debug, Default)]
pub struct History(Vec<HistoryEntry>);

impl History {
    pub fn new() -> Self {
        History(Vec::new())
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.0.push(entry);
    }

    /// Most recent entry with a matching transaction id.
    ///
    /// Callers look up before appending the current record's own entry, so
    /// the search covers strictly earlier records. Because a dispute shares
    /// its id with the transaction it disputes and is appended later, the
    /// reverse scan prefers the dispute entry over the original.
    pub fn latest(&self, tx: TxId) -> Option<&HistoryEntry> {
        self.0.iter().rev().find(|entry| entry.tx() == tx)
    }
}
