//! AI analysis endpoints: single-note analysis and the spending summary.

use advisor::AdvisorError;
use api_types::analysis::{Analysis, AnalyzeNote, SpendingSummary};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState};

/// Runs the categorize -> advise workflow on a free-text note.
///
/// Unlike note categorization on deposits and transfers there is no
/// financial side effect to protect here, so collaborator failures surface
/// to the caller.
pub async fn analyze(
    State(state): State<ServerState>,
    Json(payload): Json<AnalyzeNote>,
) -> Result<Json<Analysis>, ServerError> {
    let advisor = state
        .advisor
        .as_ref()
        .ok_or(ServerError::Advisor(AdvisorError::MissingApiKey))?;

    let analysis = advisor.analyze(&payload.note).await?;

    Ok(Json(Analysis {
        note: analysis.note,
        category: analysis.category,
        tip: analysis.tip,
    }))
}

/// The user's dominant spending category with a one-line tip.
pub async fn spending_summary(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<SpendingSummary>, ServerError> {
    let dominant = state.ledger.read().await.dominant_spending(&username)?;

    let Some(dominant) = dominant else {
        return Ok(Json(SpendingSummary {
            has_data: false,
            category: None,
            total_cents: 0,
            tip: "No spending insights available yet.".to_string(),
        }));
    };

    let tip = match &state.advisor {
        Some(advisor) => {
            match advisor
                .spending_tip(&dominant.category, dominant.total_cents)
                .await
            {
                Ok(tip) => Some(tip),
                Err(err) => {
                    tracing::error!("spending summary advice failed for {username}: {err}");
                    None
                }
            }
        }
        None => None,
    };

    Ok(Json(SpendingSummary {
        has_data: true,
        tip: tip.unwrap_or_else(|| {
            format!("Your highest spending category is {}.", dominant.category)
        }),
        category: Some(dominant.category),
        total_cents: dominant.total_cents,
    }))
}
