//! Account storage: the mapping from username to balance and profile.

use std::collections::HashMap;

use crate::LedgerError;

/// Extended user details captured at creation time.
///
/// The PIN is stored in plaintext; hardening authentication is out of scope
/// for this system.
#[derive(Clone, Debug)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub pin: String,
}

/// A single user account. The balance is maintained incrementally and is
/// always the sum of the signed amounts recorded for the user.
#[derive(Clone, Debug)]
pub struct Account {
    pub balance_cents: i64,
    pub profile: Profile,
}

/// In-memory account store. Accounts are never deleted.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
}

impl AccountStore {
    /// Inserts a new account with balance 0.
    pub fn create(&mut self, username: &str, profile: Profile) -> Result<(), LedgerError> {
        if self.accounts.contains_key(username) {
            return Err(LedgerError::ExistingKey(username.to_string()));
        }
        self.accounts.insert(
            username.to_string(),
            Account {
                balance_cents: 0,
                profile,
            },
        );
        Ok(())
    }

    pub fn get(&self, username: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(username)
            .ok_or_else(|| LedgerError::KeyNotFound(username.to_string()))
    }

    /// Applies `balance += delta` and returns the new balance.
    ///
    /// No non-negativity check is performed here; callers must validate
    /// before adjusting, or the balance can go negative. Overflow is
    /// rejected and leaves the balance untouched.
    pub fn adjust(&mut self, username: &str, delta_cents: i64) -> Result<i64, LedgerError> {
        let account = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| LedgerError::KeyNotFound(username.to_string()))?;
        let new_balance = account
            .balance_cents
            .checked_add(delta_cents)
            .ok_or_else(|| LedgerError::InvalidInput("balance overflow".to_string()))?;
        account.balance_cents = new_balance;
        Ok(new_balance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Account)> {
        self.accounts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            pin: "1234".to_string(),
        }
    }

    #[test]
    fn create_starts_at_zero() {
        let mut store = AccountStore::default();
        store.create("ada", profile()).unwrap();
        assert_eq!(store.get("ada").unwrap().balance_cents, 0);
    }

    #[test]
    fn duplicate_create_fails() {
        let mut store = AccountStore::default();
        store.create("ada", profile()).unwrap();
        assert_eq!(
            store.create("ada", profile()),
            Err(LedgerError::ExistingKey("ada".to_string()))
        );
    }

    #[test]
    fn adjust_is_unvalidated() {
        let mut store = AccountStore::default();
        store.create("ada", profile()).unwrap();
        assert_eq!(store.adjust("ada", -500).unwrap(), -500);
    }

    #[test]
    fn adjust_rejects_overflow_and_keeps_balance() {
        let mut store = AccountStore::default();
        store.create("ada", profile()).unwrap();
        store.adjust("ada", i64::MAX).unwrap();

        assert_eq!(
            store.adjust("ada", 1),
            Err(LedgerError::InvalidInput("balance overflow".to_string()))
        );
        assert_eq!(store.get("ada").unwrap().balance_cents, i64::MAX);
    }

    #[test]
    fn adjust_unknown_user_fails() {
        let mut store = AccountStore::default();
        assert_eq!(
            store.adjust("ghost", 100),
            Err(LedgerError::KeyNotFound("ghost".to_string()))
        );
    }
}
