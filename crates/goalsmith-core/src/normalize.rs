//! Response normalization: recover a complete [`SmartFields`] from whatever
//! the provider returned.
//!
//! The cascade is an ordered chain of partial parsers tried until one yields
//! a usable `goal`, followed by one shared backfill pass. It is total: for
//! any input (including no input at all) exactly one stage terminates with a
//! complete record, and nothing escapes this module as an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::record::{IkigaiAnswers, SmartFields};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// A provider answer above this many characters (trimmed) is considered
/// substantial; shorter answers trigger one more prompt attempt.
pub const SUBSTANTIAL_RESPONSE_LEN: usize = 50;

/// An extracted `goal` shorter than this (trimmed) is replaced by the
/// original objective text.
pub const MIN_GOAL_LEN: usize = 5;

/// Minimum accepted length per extracted field, by backfill tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub field: usize,
    pub analysis: usize,
}

impl Thresholds {
    pub const STANDARD: Thresholds = Thresholds {
        field: 10,
        analysis: 20,
    };

    /// Tier used by the salvage pass. Currently shares the standard minimums;
    /// kept separate so the tiers can drift independently.
    pub const SALVAGE: Thresholds = Thresholds {
        field: 10,
        analysis: 20,
    };
}

// ---------------------------------------------------------------------------
// SmartField
// ---------------------------------------------------------------------------

/// The seven field slots of a SMART record, with their JSON keys and
/// synthetic templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartField {
    Goal,
    Specific,
    Measurable,
    Achievable,
    Relevant,
    TimeBound,
    Analysis,
}

impl SmartField {
    pub const ALL: [SmartField; 7] = [
        SmartField::Goal,
        SmartField::Specific,
        SmartField::Measurable,
        SmartField::Achievable,
        SmartField::Relevant,
        SmartField::TimeBound,
        SmartField::Analysis,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SmartField::Goal => "goal",
            SmartField::Specific => "specific",
            SmartField::Measurable => "measurable",
            SmartField::Achievable => "achievable",
            SmartField::Relevant => "relevant",
            SmartField::TimeBound => "time_bound",
            SmartField::Analysis => "analysis",
        }
    }

    /// Fixed synthetic template interpolating the original objective text.
    /// Used both for total provider failure and for individual fields the
    /// cascade could not extract.
    pub fn template(self, original: &str) -> String {
        match self {
            SmartField::Goal => original.to_string(),
            SmartField::Specific => format!(
                "Objective to refine: {original}. To be specified with concrete detail on who, what, where, and how."
            ),
            SmartField::Measurable => format!(
                "Success indicators to define for: {original}. Determine quantifiable metrics with concrete numbers, percentages, or amounts."
            ),
            SmartField::Achievable => format!(
                "Assess the feasibility of: {original}. Identify the resources, skills, and support available to reach it realistically."
            ),
            SmartField::Relevant => format!(
                "Clarify why this matters: {original}. Align it with personal values, aspirations, and long-term plans."
            ),
            SmartField::TimeBound => format!(
                "Set a timeline for: {original}. Fix a precise deadline and intermediate milestones to track progress."
            ),
            SmartField::Analysis => format!(
                "Review of the objective: {original}. Key steps: break it into concrete milestones, identify the resources required, anticipate likely obstacles, and track progress regularly."
            ),
        }
    }

    fn min_len(self, tier: Thresholds) -> usize {
        match self {
            SmartField::Analysis => tier.analysis,
            _ => tier.field,
        }
    }
}

// ---------------------------------------------------------------------------
// PartialFields
// ---------------------------------------------------------------------------

/// What a single cascade stage managed to recover. Fields are fully
/// independent; a missing field never blocks the others.
#[derive(Debug, Clone, Default)]
pub struct PartialFields {
    pub goal: Option<String>,
    pub specific: Option<String>,
    pub measurable: Option<String>,
    pub achievable: Option<String>,
    pub relevant: Option<String>,
    pub time_bound: Option<String>,
    pub analysis: Option<String>,
}

impl PartialFields {
    /// Lift a parsed JSON object into partial fields. Accepts only when a
    /// non-empty string `goal` is present; non-string values are ignored.
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let goal = obj.get("goal")?.as_str()?;
        if goal.trim().is_empty() {
            return None;
        }
        let field = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Some(Self {
            goal: Some(goal.to_string()),
            specific: field("specific"),
            measurable: field("measurable"),
            achievable: field("achievable"),
            relevant: field("relevant"),
            time_bound: field("time_bound"),
            analysis: field("analysis"),
        })
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Normalize raw provider text (or its absence) into a complete record.
pub fn normalize_smart(raw: Option<&str>, original: &str) -> SmartFields {
    let Some(raw) = raw else {
        return synthetic_fields(original);
    };
    if raw.trim().is_empty() {
        return synthetic_fields(original);
    }

    let cleaned = strip_code_fences(raw);

    // First-match parser chain: balanced-brace span, whole-text parse,
    // per-field extraction.
    let parsers: [fn(&str) -> Option<PartialFields>; 3] = [
        parse_balanced_object,
        parse_direct,
        extract_with_goal,
    ];
    for parse in parsers {
        if let Some(partial) = parse(&cleaned) {
            return backfill(partial, original, Thresholds::STANDARD);
        }
    }

    // Salvage: the text mentions a quoted goal key, but no parser produced a
    // usable one. Keep whatever individual fields survive and template the
    // rest.
    if cleaned.contains("\"goal\"") {
        return backfill(extract_all_fields(&cleaned), original, Thresholds::SALVAGE);
    }

    // No JSON signal at all: the provider's prose cannot be attributed to
    // any field, so it is discarded.
    synthetic_fields(original)
}

/// Fully synthetic record: every field from its fixed template, the goal
/// being the original text verbatim.
pub fn synthetic_fields(original: &str) -> SmartFields {
    backfill(PartialFields::default(), original, Thresholds::STANDARD)
}

/// Normalize the ikigai narrative: substantial provider text is consumed
/// verbatim (it is free-form Markdown); anything else is replaced by a fixed
/// four-section narrative previewing the answers.
pub fn normalize_ikigai(raw: Option<&str>, answers: &IkigaiAnswers) -> String {
    if let Some(text) = raw {
        let text = text.trim();
        if text.chars().count() > SUBSTANTIAL_RESPONSE_LEN {
            return text.to_string();
        }
    }
    synthetic_ikigai(answers)
}

// ---------------------------------------------------------------------------
// Cascade stages
// ---------------------------------------------------------------------------

/// Strip surrounding code-fence markers (triple backtick, optional language
/// tag) and trim.
fn strip_code_fences(raw: &str) -> String {
    static JSON_FENCE: OnceLock<Regex> = OnceLock::new();
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let json_fence = JSON_FENCE.get_or_init(|| Regex::new(r"(?i)```json\s*").expect("valid regex"));
    let fence = FENCE.get_or_init(|| Regex::new(r"```\s*").expect("valid regex"));

    let cleaned = json_fence.replace_all(raw.trim(), "");
    fence.replace_all(&cleaned, "").trim().to_string()
}

/// Locate the first balanced `{...}` span by tracking nesting depth, so
/// braces embedded in field values survive.
fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_balanced_object(text: &str) -> Option<PartialFields> {
    let span = balanced_object_span(text)?;
    let value: serde_json::Value = serde_json::from_str(span).ok()?;
    PartialFields::from_value(&value)
}

fn parse_direct(text: &str) -> Option<PartialFields> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    PartialFields::from_value(&value)
}

fn extractors() -> &'static [(SmartField, Regex)] {
    static EXTRACTORS: OnceLock<Vec<(SmartField, Regex)>> = OnceLock::new();
    EXTRACTORS.get_or_init(|| {
        SmartField::ALL
            .into_iter()
            .map(|field| {
                let pattern =
                    format!(r#"(?s)"{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, field.key());
                (field, Regex::new(&pattern).expect("valid regex"))
            })
            .collect()
    })
}

/// Extract one quoted field value, decoding the JSON escapes the permissive
/// pattern lets through.
fn extract_field(text: &str, field: SmartField) -> Option<String> {
    let (_, regex) = extractors().iter().find(|(f, _)| *f == field)?;
    let captured = regex.captures(text)?.get(1)?.as_str();
    Some(
        captured
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\t", "\t"),
    )
}

fn extract_all_fields(text: &str) -> PartialFields {
    PartialFields {
        goal: extract_field(text, SmartField::Goal),
        specific: extract_field(text, SmartField::Specific),
        measurable: extract_field(text, SmartField::Measurable),
        achievable: extract_field(text, SmartField::Achievable),
        relevant: extract_field(text, SmartField::Relevant),
        time_bound: extract_field(text, SmartField::TimeBound),
        analysis: extract_field(text, SmartField::Analysis),
    }
}

/// Per-field extraction, accepted only when it recovered a goal.
fn extract_with_goal(text: &str) -> Option<PartialFields> {
    let partial = extract_all_fields(text);
    partial.goal.is_some().then_some(partial)
}

// ---------------------------------------------------------------------------
// Backfill
// ---------------------------------------------------------------------------

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

fn ensure(value: Option<String>, field: SmartField, original: &str, tier: Thresholds) -> String {
    match value {
        Some(v) if char_len(&v) >= field.min_len(tier) => v,
        _ => field.template(original),
    }
}

/// Shared completeness pass: any non-goal field missing or below its minimum
/// is replaced by its template; the goal falls back to the original text
/// when missing or shorter than [`MIN_GOAL_LEN`]. Backfilling an
/// already-complete record is a no-op.
fn backfill(partial: PartialFields, original: &str, tier: Thresholds) -> SmartFields {
    let goal = match partial.goal {
        Some(g) if char_len(&g) >= MIN_GOAL_LEN => g,
        _ => original.to_string(),
    };
    SmartFields {
        goal,
        specific: ensure(partial.specific, SmartField::Specific, original, tier),
        measurable: ensure(partial.measurable, SmartField::Measurable, original, tier),
        achievable: ensure(partial.achievable, SmartField::Achievable, original, tier),
        relevant: ensure(partial.relevant, SmartField::Relevant, original, tier),
        time_bound: ensure(partial.time_bound, SmartField::TimeBound, original, tier),
        analysis: ensure(partial.analysis, SmartField::Analysis, original, tier),
    }
}

// ---------------------------------------------------------------------------
// Ikigai synthesis
// ---------------------------------------------------------------------------

const IKIGAI_PREVIEW_LEN: usize = 100;

fn preview(answer: &str, placeholder: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return placeholder.to_string();
    }
    trimmed.chars().take(IKIGAI_PREVIEW_LEN).collect()
}

fn synthetic_ikigai(answers: &IkigaiAnswers) -> String {
    let love = preview(&answers.what_you_love, "your passions");
    let good_at = preview(&answers.what_you_are_good_at, "your strengths");
    let world_needs = preview(&answers.what_world_needs, "what the world needs");
    let paid_for = preview(&answers.what_you_can_be_paid_for, "your services");

    format!(
        r#"## Your Ikigai

The intersection of what you love ({love}...), what you are good at ({good_at}...), what the world needs ({world_needs}...), and what you can be paid for ({paid_for}...) reveals your own ikigai.

## Analysis and Insights

These four elements complement each other and point to real opportunities. The work is finding the balance between passion, skill, impact and income.

## Concrete Recommendations

1. Explore the intersections between your passions and your skills
2. Identify market needs that match your talents
3. Develop complementary skills that reinforce your ikigai
4. Create opportunities that combine passion with income

## Action Paths

1. Define SMART objectives aligned with your ikigai
2. Look for opportunities that combine all four elements
3. Build a concrete action plan for living your ikigai
4. Review your progress toward it regularly"#
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
