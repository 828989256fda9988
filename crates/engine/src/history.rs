//! Append-only transaction history, one log store-wide.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::TransferOut => "transfer_out",
            Self::TransferIn => "transfer_in",
        }
    }
}

/// A single ledger entry. Immutable after creation except for the later
/// one-time assignment of `category`.
///
/// A transfer produces two linked records, one per party, sharing the same
/// timestamp and note and referencing each other through `counterparty`.
#[derive(Clone, Debug)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub kind: RecordKind,
    pub username: String,
    /// Signed: deposits and incoming transfers are positive, withdrawals and
    /// outgoing transfers negative.
    pub amount_cents: i64,
    pub counterparty: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub category: Option<String>,
}

/// Ordered sequence of all records, appended to strictly by the ledger.
#[derive(Debug, Default)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
}

impl TransactionLog {
    pub fn append(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    /// All records for `username` in insertion order.
    ///
    /// Linear scan over the full log; fine at this system's scale.
    pub fn for_user<'a>(
        &'a self,
        username: &'a str,
    ) -> impl Iterator<Item = &'a TransactionRecord> {
        self.records
            .iter()
            .filter(move |record| record.username == username)
    }

    /// The last `n` records for `username`, newest first.
    pub fn recent(&self, username: &str, n: usize) -> Vec<TransactionRecord> {
        let mut records: Vec<_> = self.for_user(username).cloned().collect();
        let skip = records.len().saturating_sub(n);
        records.drain(..skip);
        records.reverse();
        records
    }

    /// Terminal assignment of a category label.
    ///
    /// Idempotent: a no-op when the record is unknown or already categorized.
    pub fn attach_category(&mut self, id: Uuid, category: &str) {
        if let Some(record) = self.records.iter_mut().find(|record| record.id == id) {
            if record.category.is_none() {
                record.category = Some(category.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
