//! Request and response bodies shared between the server and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Request body for `POST /authenticate`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        /// Must be a 4-digit string.
        pub pin: String,
    }

    /// Request body for `POST /create-user`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreateUser {
        pub username: String,
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub phone: String,
        /// Must be a 4-digit string.
        pub pin: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub message: String,
        pub username: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Welcome {
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub username: String,
        pub balance_cents: i64,
    }
}

pub mod transaction {
    use std::collections::HashMap;

    use super::*;
    use crate::analysis::Analysis;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Deposit,
        Withdrawal,
        TransferOut,
        TransferIn,
    }

    /// Request body for `POST /deposit`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub username: String,
        /// Must be > 0. Amounts are integer cents.
        pub amount_cents: i64,
        pub note: Option<String>,
    }

    /// Request body for `POST /withdraw`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WithdrawNew {
        pub username: String,
        /// Must be > 0. Amounts are integer cents.
        pub amount_cents: i64,
        pub note: Option<String>,
    }

    /// Request body for `POST /transfer`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_user: String,
        pub to_user: String,
        /// Must be > 0. Amounts are integer cents.
        pub amount_cents: i64,
        pub note: Option<String>,
    }

    /// Response body for deposits and withdrawals.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationReceipt {
        pub message: String,
        pub username: String,
        pub new_balance_cents: i64,
        /// Present only when a note was given and the advisor answered in
        /// time.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub analysis: Option<Analysis>,
    }

    /// Response body for transfers.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferDone {
        pub message: String,
        /// Both parties' balances after the transfer.
        pub updated_balances: HashMap<String, i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub analysis: Option<Analysis>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Signed amount in integer cents.
        pub amount_cents: i64,
        pub counterparty: Option<String>,
        pub timestamp: DateTime<Utc>,
        pub note: Option<String>,
        pub category: Option<String>,
    }

    /// Response body for `GET /transactions/{username}`, newest first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod analysis {
    use super::*;

    /// Request body for `POST /analyze-transaction`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AnalyzeNote {
        pub note: String,
    }

    /// Result of the categorize -> advise workflow for one note.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Analysis {
        pub note: String,
        pub category: String,
        pub tip: String,
    }

    /// Response body for `GET /spending-summary/{username}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingSummary {
        pub has_data: bool,
        pub category: Option<String>,
        pub total_cents: i64,
        pub tip: String,
    }
}
