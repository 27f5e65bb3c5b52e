use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;

use goalsmith_core::{GoalsmithError, IkigaiRecord, SmartRecord};

use crate::error::AppError;
use crate::report;
use crate::state::AppState;

pub const REPORT_FILENAME: &str = "goalsmith-report.pdf";

#[derive(serde::Deserialize)]
pub struct GeneratePdfBody {
    #[serde(default)]
    pub objectives: Vec<SmartRecord>,
    #[serde(default)]
    pub ikigai: Option<IkigaiRecord>,
}

/// POST /api/generate-pdf — render the report and hand it back as a
/// download. Rejects a body with neither objectives nor ikigai content.
pub async fn generate_pdf(
    State(_app): State<AppState>,
    Json(body): Json<GeneratePdfBody>,
) -> Result<Response, AppError> {
    let has_ikigai = body.ikigai.as_ref().is_some_and(IkigaiRecord::has_content);
    if body.objectives.is_empty() && !has_ikigai {
        return Err(GoalsmithError::NoReportData.into());
    }

    let bytes = tokio::task::spawn_blocking(move || {
        report::render_report(&body.objectives, body.ikigai.as_ref())
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={REPORT_FILENAME}"),
        )
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .body(Body::from(bytes))
        .map_err(|e| AppError(anyhow::anyhow!("response build error: {e}")))?;

    Ok(response)
}
