use std::sync::Arc;

use patterns_core::{
    generate_structured, CapabilityTier, CopyResult, GenerationRequest, ModelCapability,
    QualityMetrics, Result,
};
use tracing::info;

use crate::prompts::{COPYWRITER_PROMPT, COPY_EVALUATOR_PROMPT};

/// Generate, evaluate, and regenerate at most once when the quality gate fails.
pub struct SequentialGate {
    capability: Arc<dyn ModelCapability>,
}

impl SequentialGate {
    pub fn new(capability: Arc<dyn ModelCapability>) -> Self {
        Self { capability }
    }

    pub async fn run(&self, topic: &str) -> Result<CopyResult> {
        info!("SEQUENTIAL: Writing copy");

        let draft = GenerationRequest::new(
            format!("Write persuasive marketing copy for: {topic}. Focus on benefits and emotional appeal."),
            CapabilityTier::Standard,
        )
        .with_system(COPYWRITER_PROMPT);
        let copy = self.capability.generate_text(&draft).await?;

        let evaluation = GenerationRequest::new(
            format!("Copy to evaluate:\n{copy}"),
            CapabilityTier::Standard,
        )
        .with_system(COPY_EVALUATOR_PROMPT);
        let metrics: QualityMetrics = generate_structured(self.capability.as_ref(), &evaluation).await?;

        let failing = failing_criteria(&metrics);
        if failing.is_empty() {
            info!(
                "SEQUENTIAL: Gate passed (appeal {}/10, clarity {}/10)",
                metrics.emotional_appeal, metrics.clarity
            );
            return Ok(CopyResult { copy, metrics });
        }

        info!("SEQUENTIAL: Gate failed on {} criteria, regenerating once", failing.len());
        let rewrite = GenerationRequest::new(rewrite_prompt(&failing, &copy), CapabilityTier::Standard)
            .with_system(COPYWRITER_PROMPT);
        let improved = self.capability.generate_text(&rewrite).await?;

        // Metrics describe the first draft; the rewrite is not re-scored.
        Ok(CopyResult {
            copy: improved,
            metrics,
        })
    }
}

fn failing_criteria(metrics: &QualityMetrics) -> Vec<&'static str> {
    let mut failing = Vec::new();
    if !metrics.has_call_to_action {
        failing.push("A clear call to action");
    }
    if metrics.emotional_appeal < QualityMetrics::PASSING_SCORE {
        failing.push("Stronger emotional appeal");
    }
    if metrics.clarity < QualityMetrics::PASSING_SCORE {
        failing.push("Improved clarity and directness");
    }
    failing
}

fn rewrite_prompt(failing: &[&str], copy: &str) -> String {
    let criteria = failing
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Rewrite this marketing copy with:\n{criteria}\n\nOriginal copy: {copy}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(cta: bool, appeal: u8, clarity: u8) -> QualityMetrics {
        QualityMetrics {
            has_call_to_action: cta,
            emotional_appeal: appeal,
            clarity,
        }
    }

    #[test]
    fn test_failing_criteria_matches_gate() {
        for cta in [true, false] {
            for appeal in [1, 6, 7, 10] {
                for clarity in [1, 6, 7, 10] {
                    let m = metrics(cta, appeal, clarity);
                    assert_eq!(failing_criteria(&m).is_empty(), m.passes_gate());
                }
            }
        }
    }

    #[test]
    fn test_rewrite_prompt_lists_only_failures() {
        let prompt = rewrite_prompt(&failing_criteria(&metrics(true, 5, 9)), "Buy now!");
        assert!(prompt.contains("Stronger emotional appeal"));
        assert!(!prompt.contains("call to action"));
        assert!(!prompt.contains("clarity"));
        assert!(prompt.ends_with("Original copy: Buy now!"));
    }
}
