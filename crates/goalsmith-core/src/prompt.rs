use chrono::{Datelike, Utc};

use crate::record::{GoalRequest, IkigaiAnswers};

// ---------------------------------------------------------------------------
// SMART prompt
// ---------------------------------------------------------------------------

/// Build the provider prompt for one objective.
///
/// The prompt states the goal text verbatim, demands a single JSON object
/// with exactly the seven expected string fields, and forbids surrounding
/// prose or markdown fences. When batch context is available the ordinal
/// biases tone: the first objective is flagged as likely highest priority.
pub fn build_smart_prompt(request: &GoalRequest) -> String {
    let year = Utc::now().year();

    let mut context = String::new();
    if let (Some(ordinal), Some(total)) = (request.ordinal, request.total) {
        context = format!(
            "This objective is number {ordinal} of {total} defined by this person. "
        );
        if ordinal == 1 {
            context.push_str("It is the first objective, so likely the highest priority. ");
        } else if ordinal == total {
            context.push_str("It is the last objective defined. ");
        }
    }

    format!(
        r#"You are an expert coach in personal development and goal setting. {context}A person wrote this objective:

"{text}"

ABSOLUTE RULES:
1. Treat THIS objective individually; analyze it in depth for its own domain (career, health, finances, education, personal life).
2. ALWAYS produce complete, detailed answers. Never "to be defined", never empty values.
3. Be concrete, precise and actionable; each field needs at least two full sentences.

Rewrite this objective in SMART form (Specific, Measurable, Achievable, Relevant, Time-bound).

CRITICAL: Respond ONLY with a valid JSON object. No text before, no text after, no markdown, no backticks. Start directly with {{ and end with }}. Exact format:

{{
    "goal": "The objective restated clearly and precisely, specific to THIS objective. Minimum 10 words.",
    "specific": "Detailed description: who, what, where, how, why. Concrete actions for THIS objective. Minimum 20 words.",
    "measurable": "Concrete success indicators with numbers, percentages or quantities. Minimum 20 words.",
    "achievable": "Why THIS objective is realistic: resources, skills and support available. Minimum 20 words.",
    "relevant": "Why THIS objective matters and how it aligns with this person's values and aspirations. Minimum 20 words.",
    "time_bound": "A precise deadline and intermediate milestones, all within {year}. Minimum 20 words.",
    "analysis": "A motivating 5-7 sentence analysis specific to this objective: strengths, practical advice, key steps, risks to avoid. Minimum 50 words."
}}

The current year is {year}; every date must fall in {year}. Respond with the JSON only, nothing else."#,
        text = request.text,
    )
}

// ---------------------------------------------------------------------------
// Ikigai prompt
// ---------------------------------------------------------------------------

/// Build the ikigai narrative prompt. Free-form Markdown sections, not JSON.
pub fn build_ikigai_prompt(answers: &IkigaiAnswers) -> String {
    let year = Utc::now().year();
    format!(
        r#"You are an expert coach in ikigai and personal development. Analyze these answers to reveal this person's ikigai. Be concise but complete:

WHAT I LOVE: {love}

WHAT I AM GOOD AT: {good_at}

WHAT THE WORLD NEEDS: {world_needs}

WHAT I CAN BE PAID FOR: {paid_for}

Structure your answer with these Markdown sections:

## Your Ikigai

[The unique intersection of the four elements, stated as a personal ikigai in 2-3 sentences]

## Analysis and Insights

[The connections between the four elements; what stands out; which opportunities emerge]

## Concrete Recommendations

[3-5 actionable recommendations for living this ikigai day to day]

## Action Paths for {year}

[3-5 concrete actions to take in {year} to align life with this ikigai]

Be inspiring, concrete and actionable, with a positive tone. Every suggested action and date must fall in {year}."#,
        love = answers.what_you_love,
        good_at = answers.what_you_are_good_at,
        world_needs = answers.what_world_needs,
        paid_for = answers.what_you_can_be_paid_for,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smart_prompt_contains_goal_verbatim() {
        let prompt = build_smart_prompt(&GoalRequest::new("Learn to play the cello"));
        assert!(prompt.contains("\"Learn to play the cello\""));
        assert!(prompt.contains("\"time_bound\""));
        assert!(prompt.contains("ONLY with a valid JSON object"));
    }

    #[test]
    fn smart_prompt_flags_first_objective_as_priority() {
        let request = GoalRequest {
            text: "Save money".into(),
            ordinal: Some(1),
            total: Some(4),
        };
        let prompt = build_smart_prompt(&request);
        assert!(prompt.contains("number 1 of 4"));
        assert!(prompt.contains("highest priority"));
    }

    #[test]
    fn smart_prompt_flags_last_objective() {
        let request = GoalRequest {
            text: "Save money".into(),
            ordinal: Some(3),
            total: Some(3),
        };
        let prompt = build_smart_prompt(&request);
        assert!(prompt.contains("the last objective"));
    }

    #[test]
    fn smart_prompt_omits_context_without_ordinal() {
        let prompt = build_smart_prompt(&GoalRequest::new("Save money"));
        assert!(!prompt.contains("objective is number"));
    }

    #[test]
    fn ikigai_prompt_embeds_all_four_answers() {
        let answers = IkigaiAnswers {
            what_you_love: "teaching".into(),
            what_you_are_good_at: "explaining".into(),
            what_world_needs: "patient mentors".into(),
            what_you_can_be_paid_for: "training".into(),
        };
        let prompt = build_ikigai_prompt(&answers);
        for needle in ["teaching", "explaining", "patient mentors", "training"] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
        assert!(prompt.contains("## Your Ikigai"));
    }
}
