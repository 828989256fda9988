//! Deposit, withdraw, transfer and history endpoints.

use std::collections::HashMap;

use api_types::analysis::Analysis;
use api_types::transaction::{
    DepositNew, OperationReceipt, TransactionKind, TransactionView, TransactionsResponse,
    TransferDone, TransferNew, WithdrawNew,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

const HISTORY_LIMIT: usize = 10;

fn map_kind(kind: engine::RecordKind) -> TransactionKind {
    match kind {
        engine::RecordKind::Deposit => TransactionKind::Deposit,
        engine::RecordKind::Withdrawal => TransactionKind::Withdrawal,
        engine::RecordKind::TransferOut => TransactionKind::TransferOut,
        engine::RecordKind::TransferIn => TransactionKind::TransferIn,
    }
}

fn map_record(record: engine::TransactionRecord) -> TransactionView {
    TransactionView {
        id: record.id,
        kind: map_kind(record.kind),
        amount_cents: record.amount_cents,
        counterparty: record.counterparty,
        timestamp: record.occurred_at,
        note: record.note,
        category: record.category,
    }
}

fn map_analysis(analysis: advisor::Analysis) -> Analysis {
    Analysis {
        note: analysis.note,
        category: analysis.category,
        tip: analysis.tip,
    }
}

/// Post-commit categorization of the just-appended records.
///
/// Runs the categorize -> advise workflow strictly after the ledger lock has
/// been released. The work is spawned so it completes even when the client
/// goes away; the category lands on the records through the separate
/// idempotent attach mutation. Failures are logged and swallowed and never
/// touch the financial outcome.
pub(crate) async fn annotate(
    state: &ServerState,
    note: Option<String>,
    record_ids: Vec<Uuid>,
) -> Option<Analysis> {
    let note = match note {
        Some(note) if !note.is_empty() => note,
        _ => return None,
    };
    let advisor = state.advisor.clone()?;
    let ledger = state.ledger.clone();

    let task = tokio::spawn(async move {
        match advisor.analyze(&note).await {
            Ok(analysis) => {
                ledger
                    .write()
                    .await
                    .attach_category(&record_ids, &analysis.category);
                Some(analysis)
            }
            Err(err) => {
                tracing::error!("transaction analysis failed: {err}");
                None
            }
        }
    });

    task.await.ok().flatten().map(map_analysis)
}

pub async fn deposit(
    State(state): State<ServerState>,
    Json(payload): Json<DepositNew>,
) -> Result<Json<OperationReceipt>, ServerError> {
    let receipt = {
        let mut ledger = state.ledger.write().await;
        ledger.deposit(&payload.username, payload.amount_cents, payload.note.clone())?
    };

    let analysis = annotate(&state, payload.note, vec![receipt.record_id]).await;

    Ok(Json(OperationReceipt {
        message: "Deposit successful".to_string(),
        username: payload.username,
        new_balance_cents: receipt.new_balance_cents,
        analysis,
    }))
}

pub async fn withdraw(
    State(state): State<ServerState>,
    Json(payload): Json<WithdrawNew>,
) -> Result<Json<OperationReceipt>, ServerError> {
    let receipt = {
        let mut ledger = state.ledger.write().await;
        ledger.withdraw(&payload.username, payload.amount_cents, payload.note.clone())?
    };

    let analysis = annotate(&state, payload.note, vec![receipt.record_id]).await;

    Ok(Json(OperationReceipt {
        message: "Withdrawal successful".to_string(),
        username: payload.username,
        new_balance_cents: receipt.new_balance_cents,
        analysis,
    }))
}

pub async fn transfer(
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<Json<TransferDone>, ServerError> {
    let receipt = {
        let mut ledger = state.ledger.write().await;
        ledger.transfer(
            &payload.from_user,
            &payload.to_user,
            payload.amount_cents,
            payload.note.clone(),
        )?
    };

    // Both legs receive the same category.
    let analysis = annotate(
        &state,
        payload.note,
        vec![receipt.out_record_id, receipt.in_record_id],
    )
    .await;

    let updated_balances = HashMap::from([
        (payload.from_user, receipt.from_balance_cents),
        (payload.to_user, receipt.to_balance_cents),
    ]);

    Ok(Json(TransferDone {
        message: "Transfer successful".to_string(),
        updated_balances,
        analysis,
    }))
}

/// The user's most recent transactions, newest first.
pub async fn history(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let records = state
        .ledger
        .read()
        .await
        .recent_transactions(&username, HISTORY_LIMIT)?;

    Ok(Json(TransactionsResponse {
        transactions: records.into_iter().map(map_record).collect(),
    }))
}
