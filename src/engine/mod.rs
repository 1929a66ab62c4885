//! Ledger state machine.
//!
//! Replays each client's transaction sequence in arrival order, maintaining
//! a per-client account and transaction history. Dispute, resolve and
//! chargeback records reference earlier history entries by transaction id;
//! a dispute's own entry is enriched with the disputed amount and kind so a
//! later resolve or chargeback can act on it.

use std::collections::{HashMap, HashSet};

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Amount;
use crate::model::{ClientId, MonetaryKind, TxId, TxKind, TxRecord};

mod error;
mod history;
mod state;

pub use error::RuleViolation;
pub use history::{History, HistoryEntry};
pub use state::Account;

/// The ledger engine.
///
/// Records are first [`ingest`](Ledger::ingest)ed into per-client queues,
/// then [`settle`](Ledger::settle) replays every queue to completion.
/// Clients replay in order of first appearance in the input, which is also
/// the order the global duplicate-id check observes.
pub struct Ledger {
    /// Ingested records grouped per client, arrival order preserved.
    pending: HashMap<ClientId, Vec<TxRecord>>,
    /// Clients in order of first appearance in the input.
    client_order: Vec<ClientId>,
    accounts: HashMap<ClientId, Account>,
    /// Accounts in creation order, for stable output.
    account_order: Vec<ClientId>,
    /// Transaction ids consumed by a deposit or withdrawal, across all
    /// clients.
    seen: HashSet<TxId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            client_order: Vec::new(),
            accounts: HashMap::new(),
            account_order: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Ingest every record from the stream, then settle.
    pub async fn run(&mut self, mut stream: impl Stream<Item = TxRecord> + Unpin) {
        while let Some(record) = stream.next().await {
            self.ingest(record);
        }
        self.settle();
    }

    /// Queue a validated record for its client, preserving arrival order.
    pub fn ingest(&mut self, record: TxRecord) {
        if !self.pending.contains_key(&record.client) {
            self.client_order.push(record.client);
        }
        self.pending.entry(record.client).or_default().push(record);
    }

    /// Replay every queued client sequence and settle final balances.
    pub fn settle(&mut self) {
        for client in std::mem::take(&mut self.client_order) {
            let records = self.pending.remove(&client).unwrap_or_default();
            self.replay(client, records);
        }
    }

    /// Final account states, in account creation order.
    pub fn accounts(&self) -> impl Iterator<Item = (ClientId, &Account)> + '_ {
        self.account_order
            .iter()
            .filter_map(|id| self.accounts.get(id).map(|account| (*id, account)))
    }

    pub fn account(&self, client: ClientId) -> Option<&Account> {
        self.accounts.get(&client)
    }
}

impl Ledger {
    fn replay(&mut self, client: ClientId, records: Vec<TxRecord>) {
        let mut history = History::new();
        for record in records {
            // The lookup-before-append order is what makes backward searches
            // cover strictly earlier records only.
            let entry = match record.kind {
                TxKind::Deposit => {
                    let result = self.apply_deposit(client, record.tx, record.amount);
                    Self::log_result(&record, &result);
                    HistoryEntry::plain(&record)
                }
                TxKind::Withdrawal => {
                    let result = self.apply_withdrawal(client, record.tx, record.amount);
                    Self::log_result(&record, &result);
                    HistoryEntry::plain(&record)
                }
                TxKind::Dispute => match self.apply_dispute(client, record.tx, &history) {
                    Ok((disputed, amount)) => {
                        Self::log_result::<_, RuleViolation>(&record, &Ok(()));
                        HistoryEntry::OpenDispute {
                            tx: record.tx,
                            disputed,
                            amount,
                        }
                    }
                    Err(violation) => {
                        Self::log_result::<(), _>(&record, &Err(violation));
                        HistoryEntry::plain(&record)
                    }
                },
                TxKind::Resolve => {
                    let result = self.apply_resolve(client, record.tx, &history);
                    Self::log_result(&record, &result);
                    HistoryEntry::plain(&record)
                }
                TxKind::Chargeback => {
                    let result = self.apply_chargeback(client, record.tx, &history);
                    Self::log_result(&record, &result);
                    HistoryEntry::plain(&record)
                }
            };
            history.push(entry);
        }
    }

    fn log_result<T, E: std::fmt::Display>(record: &TxRecord, result: &Result<T, E>) {
        match result {
            Ok(_) => info!(
                kind = record.kind.as_str(),
                client = record.client,
                tx = record.tx,
                amount = %record.amount,
                "applied"
            ),
            Err(reason) => info!(
                kind = record.kind.as_str(),
                client = record.client,
                tx = record.tx,
                reason = %reason,
                "skipped"
            ),
        }
    }

    /// Account for `client`, created on first use.
    fn account_mut(&mut self, client: ClientId) -> &mut Account {
        if !self.accounts.contains_key(&client) {
            self.account_order.push(client);
        }
        self.accounts.entry(client).or_default()
    }

    fn apply_deposit(
        &mut self,
        client: ClientId,
        tx: TxId,
        amount: Amount,
    ) -> Result<(), RuleViolation> {
        if !self.seen.insert(tx) {
            return Err(RuleViolation::DuplicateTx(tx));
        }

        let account = self.account_mut(client);
        account.available += amount;
        account.total += amount;
        Ok(())
    }

    fn apply_withdrawal(
        &mut self,
        client: ClientId,
        tx: TxId,
        amount: Amount,
    ) -> Result<(), RuleViolation> {
        if !self.seen.insert(tx) {
            return Err(RuleViolation::DuplicateTx(tx));
        }

        // The id stays consumed even when the balance check fails below.
        let available = self
            .accounts
            .get(&client)
            .map(|account| account.available)
            .unwrap_or_default();
        if available < amount {
            return Err(RuleViolation::InsufficientFunds {
                client,
                available,
                requested: amount,
            });
        }

        let account = self.account_mut(client);
        account.available -= amount;
        account.total -= amount;
        Ok(())
    }

    /// Dispute the most recent earlier entry with a matching id. On success
    /// the caller appends the enriched entry that resolve/chargeback consult.
    fn apply_dispute(
        &mut self,
        client: ClientId,
        tx: TxId,
        history: &History,
    ) -> Result<(MonetaryKind, Amount), RuleViolation> {
        let entry = history.latest(tx).ok_or(RuleViolation::UnknownTx(tx))?;
        let (disputed, amount) = match *entry {
            HistoryEntry::Plain {
                kind: TxKind::Deposit,
                amount,
                ..
            } => (MonetaryKind::Deposit, amount),
            HistoryEntry::Plain {
                kind: TxKind::Withdrawal,
                amount,
                ..
            } => (MonetaryKind::Withdrawal, amount),
            _ => return Err(RuleViolation::NotDisputable(tx)),
        };

        let account = self
            .accounts
            .get_mut(&client)
            .ok_or(RuleViolation::NoAccount(client))?;

        match disputed {
            MonetaryKind::Deposit => {
                if account.available < amount {
                    warn!(
                        client,
                        tx,
                        available = %account.available,
                        disputed = %amount,
                        "dispute drives available balance negative"
                    );
                }
                account.available -= amount;
            }
            MonetaryKind::Withdrawal => account.available += amount,
        }
        account.held += amount;

        Ok((disputed, amount))
    }

    fn apply_resolve(
        &mut self,
        client: ClientId,
        tx: TxId,
        history: &History,
    ) -> Result<(), RuleViolation> {
        let (disputed, amount) = Self::open_dispute(history, tx)?;
        let account = self
            .accounts
            .get_mut(&client)
            .ok_or(RuleViolation::NoAccount(client))?;

        match disputed {
            MonetaryKind::Deposit => account.available += amount,
            MonetaryKind::Withdrawal => account.available -= amount,
        }
        account.held -= amount;
        Ok(())
    }

    /// Chargeback moves `total` and locks the account, but never restores
    /// `available`.
    fn apply_chargeback(
        &mut self,
        client: ClientId,
        tx: TxId,
        history: &History,
    ) -> Result<(), RuleViolation> {
        let (disputed, amount) = Self::open_dispute(history, tx)?;
        let account = self
            .accounts
            .get_mut(&client)
            .ok_or(RuleViolation::NoAccount(client))?;

        match disputed {
            MonetaryKind::Deposit => account.total -= amount,
            MonetaryKind::Withdrawal => account.total += amount,
        }
        account.held -= amount;
        account.lock();
        Ok(())
    }

    /// Resolve/chargeback lookups act only when the nearest matching entry
    /// is an enriched dispute. Landing on anything else, the original
    /// monetary entry included, is an ignorable violation.
    fn open_dispute(
        history: &History,
        tx: TxId,
    ) -> Result<(MonetaryKind, Amount), RuleViolation> {
        let entry = history.latest(tx).ok_or(RuleViolation::UnknownTx(tx))?;
        match *entry {
            HistoryEntry::OpenDispute {
                disputed, amount, ..
            } => Ok((disputed, amount)),
            HistoryEntry::Plain { .. } => Err(RuleViolation::NotDisputed(tx)),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
