use axum::extract::State;
use axum::Json;

use goalsmith_core::IkigaiAnswers;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/analyze-ikigai — generate the ikigai narrative from the four
/// reflection answers. Always answers: an unusable provider response
/// degrades to the synthesized narrative.
pub async fn analyze_ikigai(
    State(app): State<AppState>,
    Json(answers): Json<IkigaiAnswers>,
) -> Result<Json<serde_json::Value>, AppError> {
    let analysis = app.pipeline.analyze_ikigai(&answers).await;
    Ok(Json(serde_json::json!({ "analysis": analysis })))
}
