//! Orchestration: fan a batch of objectives out over the provider with
//! bounded parallelism, and never let one bad task sink the batch.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::generate::TextGen;
use crate::normalize::{self, SUBSTANTIAL_RESPONSE_LEN};
use crate::prompt::{build_ikigai_prompt, build_smart_prompt};
use crate::record::{GoalRequest, IkigaiAnswers, SmartFields, SmartRecord};

/// Prompt-level attempts per objective. The first substantial answer wins;
/// a short final answer is still handed to the normalizer, since some
/// legitimate short answers exist.
pub const MAX_PROMPT_ATTEMPTS: usize = 2;

/// Upper bound on objectives processed concurrently, to respect upstream
/// rate limits.
pub const MAX_CONCURRENT_OBJECTIVES: usize = 3;

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Drives prompts through a [`TextGen`] and normalizes whatever comes back.
///
/// Cheap to clone; each batch task gets its own clone and owns its prompt,
/// provider calls and normalization end-to-end.
#[derive(Clone)]
pub struct Pipeline {
    generator: Arc<dyn TextGen>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGen>) -> Self {
        Self { generator }
    }

    /// Reformulate a single objective. Infallible: total provider failure
    /// degrades to a fully synthetic record.
    pub async fn transform_objective(&self, request: &GoalRequest) -> SmartFields {
        let prompt = build_smart_prompt(request);

        let mut last: Option<String> = None;
        for attempt in 1..=MAX_PROMPT_ATTEMPTS {
            match self.generator.generate(&prompt).await {
                Some(text) => {
                    let substantial =
                        text.trim().chars().count() > SUBSTANTIAL_RESPONSE_LEN;
                    last = Some(text);
                    if substantial {
                        break;
                    }
                    tracing::debug!(attempt, "provider answer too short, retrying");
                }
                None => {
                    tracing::debug!(attempt, "no provider answer");
                }
            }
        }

        normalize::normalize_smart(last.as_deref(), &request.text)
    }

    /// Process an ordered batch of objectives concurrently.
    ///
    /// Returns exactly one record per input, in input order, regardless of
    /// which task finishes first and regardless of individual task outcomes:
    /// a task lost at the join boundary is replaced by a synthetic record
    /// carrying its own `objective_id`.
    pub async fn process_batch(&self, objectives: &[String]) -> Vec<SmartRecord> {
        let total = objectives.len();
        let cap = total.min(MAX_CONCURRENT_OBJECTIVES).max(1);
        let permits = Arc::new(Semaphore::new(cap));

        let mut handles = Vec::with_capacity(total);
        for (index, text) in objectives.iter().enumerate() {
            let ordinal = index + 1;
            let pipeline = self.clone();
            let permits = Arc::clone(&permits);
            let task_text = text.clone();
            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.expect("semaphore closed");
                let request = GoalRequest {
                    text: task_text,
                    ordinal: Some(ordinal),
                    total: Some(total),
                };
                let smart = pipeline.transform_objective(&request).await;
                SmartRecord {
                    objective_id: ordinal,
                    original_text: request.text,
                    smart,
                }
            });
            handles.push((ordinal, text.clone(), handle));
        }

        // Awaiting the handles in spawn order makes output order equal input
        // order, independent of completion order.
        let mut records = Vec::with_capacity(total);
        for (ordinal, text, handle) in handles {
            match handle.await {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(
                        objective = ordinal,
                        %err,
                        "objective task failed, substituting a synthetic record"
                    );
                    records.push(failed_task_record(ordinal, &text));
                }
            }
        }
        records
    }

    /// Generate the ikigai narrative. Single provider call, no retry loop;
    /// unusable output degrades to the synthesized narrative.
    pub async fn analyze_ikigai(&self, answers: &IkigaiAnswers) -> String {
        let prompt = build_ikigai_prompt(answers);
        let raw = self.generator.generate(&prompt).await;
        normalize::normalize_ikigai(raw.as_deref(), answers)
    }
}

/// Synthetic stand-in for a task that never produced a record, with a note
/// explaining why the analysis is generic.
fn failed_task_record(ordinal: usize, text: &str) -> SmartRecord {
    let mut smart = normalize::synthetic_fields(text);
    smart.analysis.push_str(
        " Note: this objective could not be processed automatically; review and complete it manually.",
    );
    SmartRecord {
        objective_id: ordinal,
        original_text: text.to_string(),
        smart,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted generator: looks the objective text up in the prompt and
    /// answers with a canned record after an optional per-objective delay.
    struct ScriptedGen {
        entries: Vec<(&'static str, u64)>,
        calls: AtomicUsize,
    }

    impl ScriptedGen {
        fn new(entries: Vec<(&'static str, u64)>) -> Self {
            Self {
                entries,
                calls: AtomicUsize::new(0),
            }
        }
    }

    fn canned_record(goal: &str) -> String {
        serde_json::json!({
            "goal": format!("{goal} restated with enough words to count"),
            "specific": "A concrete plan with actions spelled out in detail.",
            "measurable": "Progress tracked with explicit weekly numbers and a target.",
            "achievable": "The resources and time required are already available.",
            "relevant": "It aligns directly with this person's stated priorities.",
            "time_bound": "Finished by mid-December with monthly checkpoints.",
            "analysis": "A solid objective with a clear cadence, realistic scope, and an external checkpoint to keep it honest.",
        })
        .to_string()
    }

    #[async_trait]
    impl TextGen for ScriptedGen {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for (needle, delay_ms) in &self.entries {
                if prompt.contains(needle) {
                    if *delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    }
                    return Some(canned_record(needle));
                }
            }
            None
        }
    }

    /// Generator that never answers.
    struct SilentGen;

    #[async_trait]
    impl TextGen for SilentGen {
        fn name(&self) -> &'static str {
            "silent"
        }
        async fn generate(&self, _prompt: &str) -> Option<String> {
            None
        }
    }

    /// Generator that panics for one objective and answers for the rest.
    struct PanickingGen {
        panic_on: &'static str,
    }

    #[async_trait]
    impl TextGen for PanickingGen {
        fn name(&self) -> &'static str {
            "panicking"
        }
        async fn generate(&self, prompt: &str) -> Option<String> {
            if prompt.contains(self.panic_on) {
                panic!("injected task failure");
            }
            let goal = if prompt.contains("first") { "first" } else { "third" };
            Some(canned_record(goal))
        }
    }

    fn pipeline(generator: impl TextGen + 'static) -> Pipeline {
        Pipeline::new(Arc::new(generator))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn batch_preserves_input_order_under_variable_latency() {
        // The first objective is the slowest; completion order differs from
        // input order.
        let gen = ScriptedGen::new(vec![
            ("alpha objective", 80),
            ("beta objective", 10),
            ("gamma objective", 30),
        ]);
        let records = pipeline(gen)
            .process_batch(&[
                "alpha objective".to_string(),
                "beta objective".to_string(),
                "gamma objective".to_string(),
            ])
            .await;

        assert_eq!(records.len(), 3);
        let ids: Vec<usize> = records.iter().map(|r| r.objective_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(records[0].smart.goal.starts_with("alpha objective"));
        assert!(records[2].smart.goal.starts_with("gamma objective"));
        assert_eq!(records[1].original_text, "beta objective");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn batch_concurrency_is_bounded() {
        struct CountingGen {
            current: AtomicUsize,
            peak: AtomicUsize,
        }

        #[async_trait]
        impl TextGen for CountingGen {
            fn name(&self) -> &'static str {
                "counting"
            }
            async fn generate(&self, _prompt: &str) -> Option<String> {
                let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                self.current.fetch_sub(1, Ordering::SeqCst);
                None
            }
        }

        let gen = Arc::new(CountingGen {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let objectives: Vec<String> = (0..8).map(|i| format!("objective {i}")).collect();
        let records = Pipeline::new(gen.clone()).process_batch(&objectives).await;

        assert_eq!(records.len(), 8);
        assert!(
            gen.peak.load(Ordering::SeqCst) <= MAX_CONCURRENT_OBJECTIVES,
            "peak concurrency {} exceeded the cap",
            gen.peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn panicking_task_degrades_to_synthetic_record() {
        let records = pipeline(PanickingGen {
            panic_on: "second objective",
        })
        .process_batch(&[
            "first objective".to_string(),
            "second objective".to_string(),
            "third objective".to_string(),
        ])
        .await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].objective_id, 2);
        assert_eq!(records[1].original_text, "second objective");
        assert_eq!(records[1].smart.goal, "second objective");
        assert!(records[1].smart.analysis.contains("could not be processed"));
        // Neighbours are unaffected.
        assert!(records[0].smart.goal.starts_with("first"));
        assert!(records[2].smart.goal.starts_with("third"));
    }

    #[tokio::test]
    async fn silent_provider_yields_synthetic_records_after_two_attempts() {
        struct CountingSilent(AtomicUsize);

        #[async_trait]
        impl TextGen for CountingSilent {
            fn name(&self) -> &'static str {
                "counting-silent"
            }
            async fn generate(&self, _prompt: &str) -> Option<String> {
                self.0.fetch_add(1, Ordering::SeqCst);
                None
            }
        }

        let gen = Arc::new(CountingSilent(AtomicUsize::new(0)));
        let smart = Pipeline::new(gen.clone())
            .transform_objective(&GoalRequest::new("Learn Spanish"))
            .await;

        assert_eq!(gen.0.load(Ordering::SeqCst), MAX_PROMPT_ATTEMPTS);
        assert_eq!(smart.goal, "Learn Spanish");
        assert!(smart.specific.contains("Learn Spanish"));
    }

    #[tokio::test]
    async fn short_answer_triggers_retry_but_is_still_used() {
        // Both attempts return the same short fragment; the second is kept
        // and handed to the normalizer.
        struct ShortGen(AtomicUsize);

        #[async_trait]
        impl TextGen for ShortGen {
            fn name(&self) -> &'static str {
                "short"
            }
            async fn generate(&self, _prompt: &str) -> Option<String> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Some(r#""goal": "Tend the allotment weekly""#.to_string())
            }
        }

        let gen = Arc::new(ShortGen(AtomicUsize::new(0)));
        let smart = Pipeline::new(gen.clone())
            .transform_objective(&GoalRequest::new("Garden more"))
            .await;

        assert_eq!(gen.0.load(Ordering::SeqCst), MAX_PROMPT_ATTEMPTS);
        assert_eq!(smart.goal, "Tend the allotment weekly");
        assert!(smart.measurable.contains("Garden more"));
    }

    #[tokio::test]
    async fn ikigai_uses_provider_text_or_synthesizes() {
        struct NarrativeGen;

        #[async_trait]
        impl TextGen for NarrativeGen {
            fn name(&self) -> &'static str {
                "narrative"
            }
            async fn generate(&self, _prompt: &str) -> Option<String> {
                Some(
                    "## Your Ikigai\n\nWhere craft, care and a living wage intersect — \
                     that is where you should spend next year."
                        .to_string(),
                )
            }
        }

        let answers = IkigaiAnswers {
            what_you_love: "woodworking".into(),
            ..Default::default()
        };

        let narrative = pipeline(NarrativeGen).analyze_ikigai(&answers).await;
        assert!(narrative.contains("craft, care and a living wage"));

        let fallback = pipeline(SilentGen).analyze_ikigai(&answers).await;
        assert!(fallback.contains("## Your Ikigai"));
        assert!(fallback.contains("woodworking"));
    }

    #[tokio::test]
    async fn empty_batch_returns_empty_vec() {
        let records = pipeline(SilentGen).process_batch(&[]).await;
        assert!(records.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn scripted_gen_is_called_once_per_objective_when_substantial() {
        let gen = Arc::new(ScriptedGen::new(vec![("alpha", 0), ("beta", 0)]));
        let records = Pipeline::new(gen.clone())
            .process_batch(&["alpha".to_string(), "beta".to_string()])
            .await;
        assert_eq!(records.len(), 2);
        // Substantial answers on the first attempt: no retries.
        assert_eq!(gen.calls.load(Ordering::SeqCst), 2);
    }
}
