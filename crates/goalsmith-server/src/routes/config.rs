use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config — sanitized runtime view of the provider setup.
///
/// Only booleans and the model name: credentials never leave the process.
pub async fn get_config(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::to_value(&app.providers)?))
}
