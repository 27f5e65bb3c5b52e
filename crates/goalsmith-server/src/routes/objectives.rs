use axum::extract::State;
use axum::Json;

use goalsmith_core::GoalsmithError;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ProcessObjectivesBody {
    #[serde(default)]
    pub objectives: Vec<String>,
}

/// POST /api/process-objectives — reformulate a batch of free-text goals
/// into SMART records, one per valid input, in input order.
pub async fn process_objectives(
    State(app): State<AppState>,
    Json(body): Json<ProcessObjectivesBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let valid: Vec<String> = body
        .objectives
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if valid.is_empty() {
        return Err(GoalsmithError::NoObjectives.into());
    }

    let records = app.pipeline.process_batch(&valid).await;

    Ok(Json(serde_json::json!({
        "objectives": records,
        "total_processed": records.len(),
        "message": format!("{} objective(s) processed individually", records.len()),
    })))
}
