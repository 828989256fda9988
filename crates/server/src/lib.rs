use advisor::AdvisorError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::LedgerError;
use serde::Serialize;

pub use server::{ServerState, app, run, run_with_listener, spawn_with_listener};

mod accounts;
mod analysis;
mod server;
mod transactions;

pub mod types {
    pub mod user {
        pub use api_types::user::{BalanceResponse, CreateUser, Credentials, UserCreated, Welcome};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            DepositNew, OperationReceipt, TransactionKind, TransactionView, TransactionsResponse,
            TransferDone, TransferNew, WithdrawNew,
        };
    }

    pub mod analysis {
        pub use api_types::analysis::{Analysis, AnalyzeNote, SpendingSummary};
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Advisor(AdvisorError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::ExistingKey(_)
        | LedgerError::InvalidInput(_)
        | LedgerError::InsufficientFunds(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => (status_for_ledger_error(&err), err.to_string()),
            ServerError::Advisor(err) => {
                tracing::error!("advisor failure surfaced to caller: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<AdvisorError> for ServerError {
    fn from(value: AdvisorError) -> Self {
        Self::Advisor(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ledger_duplicate_maps_to_400() {
        let res = ServerError::from(LedgerError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ledger_insufficient_funds_maps_to_400() {
        let res =
            ServerError::from(LedgerError::InsufficientFunds("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ledger_invalid_input_maps_to_400() {
        let res = ServerError::from(LedgerError::InvalidInput("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn advisor_error_maps_to_500() {
        let res = ServerError::from(AdvisorError::MissingApiKey).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
