use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoalsmithError {
    #[error("no valid objectives provided")]
    NoObjectives,

    #[error("nothing to render: provide objectives or an ikigai reflection first")]
    NoReportData,

    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GoalsmithError>;
