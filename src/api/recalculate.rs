use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{Decimal, RecalcScope};
use crate::error::AppError;
use crate::recalc::{RecalcMode, RecalcOptions, RecalculationReport};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateRequest {
    pub mode: Option<RecalcMode>,
    pub tolerance: Option<Decimal>,
    /// Omitted means every sub-account.
    pub subaccounts: Option<Vec<String>>,
}

/// Run a recalculation on demand. Fires the change notifier when balances were rewritten.
pub async fn post_recalculate(
    State(state): State<AppState>,
    Json(request): Json<RecalculateRequest>,
) -> Result<Json<RecalculationReport>, AppError> {
    let scope = match request.subaccounts {
        None => RecalcScope::All,
        Some(ids) if ids.is_empty() => {
            return Err(AppError::BadRequest(
                "subaccounts must not be empty; omit it to cover all sub-accounts".into(),
            ))
        }
        Some(ids) => RecalcScope::subaccounts(ids),
    };

    let options = RecalcOptions {
        mode: request.mode.unwrap_or(state.config.recalc_mode),
        tolerance: request.tolerance.unwrap_or(state.config.drift_tolerance),
    };

    let report = state.recalculator.recalculate(&scope, &options).await?;

    if report.corrections_applied {
        state.notifier.notify_transactions_changed();
    }

    Ok(Json(report))
}
