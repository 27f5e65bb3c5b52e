use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GoalRequest
// ---------------------------------------------------------------------------

/// One free-text objective submitted for SMART reformulation.
///
/// Ephemeral: created per incoming objective, consumed once by the pipeline.
/// `ordinal` and `total` carry batch context into the prompt (the first
/// objective is flagged as likely highest priority).
#[derive(Debug, Clone)]
pub struct GoalRequest {
    pub text: String,
    pub ordinal: Option<usize>,
    pub total: Option<usize>,
}

impl GoalRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ordinal: None,
            total: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SmartFields / SmartRecord
// ---------------------------------------------------------------------------

/// The seven fields the normalizer is responsible for.
///
/// Invariant: every field is non-empty and meets its minimum length
/// (see `normalize::Thresholds`). Downstream renderers rely on this and
/// never special-case missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartFields {
    pub goal: String,
    pub specific: String,
    pub measurable: String,
    pub achievable: String,
    pub relevant: String,
    pub time_bound: String,
    pub analysis: String,
}

/// A complete SMART record: the normalizer's seven fields plus the
/// bookkeeping the orchestrator attaches (`objective_id` is the 1-based
/// position in the submitted batch, `original_text` the verbatim input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartRecord {
    pub objective_id: usize,
    pub original_text: String,
    #[serde(flatten)]
    pub smart: SmartFields,
}

// ---------------------------------------------------------------------------
// IkigaiAnswers / IkigaiRecord
// ---------------------------------------------------------------------------

/// The four ikigai reflection answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IkigaiAnswers {
    #[serde(default)]
    pub what_you_love: String,
    #[serde(default)]
    pub what_you_are_good_at: String,
    #[serde(default)]
    pub what_world_needs: String,
    #[serde(default)]
    pub what_you_can_be_paid_for: String,
}

/// The four answers plus the generated (or synthesized) narrative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IkigaiRecord {
    #[serde(flatten)]
    pub answers: IkigaiAnswers,
    #[serde(default)]
    pub analysis: String,
}

impl IkigaiRecord {
    /// Whether there is anything worth rendering in a report.
    pub fn has_content(&self) -> bool {
        !self.answers.what_you_love.trim().is_empty()
            || !self.answers.what_you_are_good_at.trim().is_empty()
            || !self.answers.what_world_needs.trim().is_empty()
            || !self.answers.what_you_can_be_paid_for.trim().is_empty()
            || !self.analysis.trim().is_empty()
    }
}
