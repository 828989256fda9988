//! This crate is the core of the application. The [`Ledger`] struct owns the
//! account balances and the append-only transaction history, and every
//! balance mutation goes through its operations.
//!
//! State is held in process memory only; nothing survives a restart.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

pub use accounts::{Account, AccountStore, Profile};
pub use error::LedgerError;
pub use history::{RecordKind, TransactionLog, TransactionRecord};
pub use summary::DominantSpending;

mod accounts;
mod error;
mod history;
mod summary;

type ResultLedger<T> = Result<T, LedgerError>;

/// Outcome of a deposit or withdrawal.
#[derive(Clone, Copy, Debug)]
pub struct Receipt {
    pub record_id: Uuid,
    pub new_balance_cents: i64,
}

/// Outcome of a transfer: ids of both legs plus both updated balances.
#[derive(Clone, Copy, Debug)]
pub struct TransferReceipt {
    pub out_record_id: Uuid,
    pub in_record_id: Uuid,
    pub from_balance_cents: i64,
    pub to_balance_cents: i64,
}

/// Handles accounts and the transaction history.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: AccountStore,
    history: TransactionLog,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new account with balance 0 and stores the profile.
    pub fn create_user(&mut self, username: &str, profile: Profile) -> ResultLedger<()> {
        validate_pin(&profile.pin)?;
        self.accounts.create(username, profile)?;
        tracing::info!("New user created: {username}");
        Ok(())
    }

    /// Checks the PIN format and that the user exists.
    ///
    /// The stored PIN is not compared; the contract only distinguishes a bad
    /// PIN format from an unknown user.
    pub fn authenticate(&self, username: &str, pin: &str) -> ResultLedger<()> {
        validate_pin(pin)?;
        self.accounts.get(username)?;
        tracing::info!("User {username} authenticated successfully.");
        Ok(())
    }

    /// Adds `amount_cents` to the user's balance and records a deposit.
    pub fn deposit(
        &mut self,
        username: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> ResultLedger<Receipt> {
        validate_amount(amount_cents)?;
        self.accounts.get(username)?;

        let new_balance_cents = self.accounts.adjust(username, amount_cents)?;
        let record_id = Uuid::new_v4();
        self.history.append(TransactionRecord {
            id: record_id,
            kind: RecordKind::Deposit,
            username: username.to_string(),
            amount_cents,
            counterparty: None,
            occurred_at: Utc::now(),
            note,
            category: None,
        });

        tracing::info!("Deposited {amount_cents} to {username}. New balance: {new_balance_cents}");
        Ok(Receipt {
            record_id,
            new_balance_cents,
        })
    }

    /// Subtracts `amount_cents` from the user's balance and records a
    /// withdrawal with a negative amount.
    ///
    /// The funds check and the mutation form one logical step; callers that
    /// share a `Ledger` across tasks must serialize access around the whole
    /// call.
    pub fn withdraw(
        &mut self,
        username: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> ResultLedger<Receipt> {
        validate_amount(amount_cents)?;
        let account = self.accounts.get(username)?;
        if account.balance_cents < amount_cents {
            return Err(LedgerError::InsufficientFunds(username.to_string()));
        }

        let new_balance_cents = self.accounts.adjust(username, -amount_cents)?;
        let record_id = Uuid::new_v4();
        self.history.append(TransactionRecord {
            id: record_id,
            kind: RecordKind::Withdrawal,
            username: username.to_string(),
            amount_cents: -amount_cents,
            counterparty: None,
            occurred_at: Utc::now(),
            note,
            category: None,
        });

        tracing::info!("Withdrew {amount_cents} from {username}. New balance: {new_balance_cents}");
        Ok(Receipt {
            record_id,
            new_balance_cents,
        })
    }

    /// Moves `amount_cents` between two users and records the two linked
    /// legs, sharing one timestamp and note.
    ///
    /// Both adjusts run back to back against the in-memory store; a pure
    /// in-memory write cannot fail once both parties are known to exist, so
    /// no rollback path is needed. A store that can fail mid-operation would
    /// require compensating rollback here.
    pub fn transfer(
        &mut self,
        from_user: &str,
        to_user: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> ResultLedger<TransferReceipt> {
        validate_amount(amount_cents)?;
        let sender = self.accounts.get(from_user)?;
        let sender_balance = sender.balance_cents;
        let receiver = self.accounts.get(to_user)?;
        let receiver_balance = receiver.balance_cents;
        if from_user == to_user {
            return Err(LedgerError::InvalidInput(
                "sender and receiver cannot be the same user".to_string(),
            ));
        }
        if sender_balance < amount_cents {
            return Err(LedgerError::InsufficientFunds(from_user.to_string()));
        }
        // Checked here so the sender is never debited when the credit leg
        // would be rejected.
        if receiver_balance.checked_add(amount_cents).is_none() {
            return Err(LedgerError::InvalidInput("balance overflow".to_string()));
        }

        let from_balance_cents = self.accounts.adjust(from_user, -amount_cents)?;
        let to_balance_cents = self.accounts.adjust(to_user, amount_cents)?;

        let occurred_at = Utc::now();
        let out_record_id = Uuid::new_v4();
        let in_record_id = Uuid::new_v4();
        self.history.append(TransactionRecord {
            id: out_record_id,
            kind: RecordKind::TransferOut,
            username: from_user.to_string(),
            amount_cents: -amount_cents,
            counterparty: Some(to_user.to_string()),
            occurred_at,
            note: note.clone(),
            category: None,
        });
        self.history.append(TransactionRecord {
            id: in_record_id,
            kind: RecordKind::TransferIn,
            username: to_user.to_string(),
            amount_cents,
            counterparty: Some(from_user.to_string()),
            occurred_at,
            note,
            category: None,
        });

        tracing::info!("Transferred {amount_cents} from {from_user} to {to_user}.");
        Ok(TransferReceipt {
            out_record_id,
            in_record_id,
            from_balance_cents,
            to_balance_cents,
        })
    }

    pub fn balance(&self, username: &str) -> ResultLedger<i64> {
        Ok(self.accounts.get(username)?.balance_cents)
    }

    /// All users and their current balances.
    pub fn balances(&self) -> HashMap<String, i64> {
        self.accounts
            .iter()
            .map(|(username, account)| (username.clone(), account.balance_cents))
            .collect()
    }

    /// The user's last `limit` records, newest first.
    pub fn recent_transactions(
        &self,
        username: &str,
        limit: usize,
    ) -> ResultLedger<Vec<TransactionRecord>> {
        self.accounts.get(username)?;
        Ok(self.history.recent(username, limit))
    }

    /// The user's dominant spending category, if any categorized outflows
    /// exist. Ties go to the category whose total was established first.
    pub fn dominant_spending(&self, username: &str) -> ResultLedger<Option<DominantSpending>> {
        self.accounts.get(username)?;
        Ok(summary::dominant_spending(self.history.for_user(username)))
    }

    /// Attaches a category label to already-appended records.
    ///
    /// Idempotent and best-effort: unknown ids and already-categorized
    /// records are skipped. This is the only mutation allowed after a record
    /// is appended, and it never touches balances.
    pub fn attach_category(&mut self, record_ids: &[Uuid], category: &str) {
        for id in record_ids {
            self.history.attach_category(*id, category);
        }
    }

    /// Read access to the full history, mainly for invariant checks in tests.
    pub fn history(&self) -> &TransactionLog {
        &self.history
    }
}

fn validate_amount(amount_cents: i64) -> ResultLedger<()> {
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidInput(
            "amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn validate_pin(pin: &str) -> ResultLedger<()> {
    if pin.len() != 4 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(LedgerError::InvalidInput(
            "PIN must be a 4-digit number".to_string(),
        ));
    }
    Ok(())
}
