use crate::Amount;

/// A client account.
///
/// `total` is tracked on its own rather than derived from
/// `available + held`: a chargeback moves `total` without a matching
/// `available` adjustment, so the two can drift apart while a withdrawal
/// dispute is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Account {
    pub available: Amount,
    pub held: Amount,
    pub total: Amount,
    pub locked: bool,
}

impl Account {
    /// A lock is permanent for the run, but does not gate later records.
    pub fn lock(&mut self) {
        self.locked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_account_is_empty_and_unlocked() {
        let account = Account::default();
        assert_eq!(account.available, Amount::ZERO);
        assert_eq!(account.held, Amount::ZERO);
        assert_eq!(account.total, Amount::ZERO);
        assert!(!account.locked);
    }

    #[test]
    fn lock_is_sticky() {
        let mut account = Account::default();
        account.lock();
        account.lock();
        assert!(account.locked);
    }
}
