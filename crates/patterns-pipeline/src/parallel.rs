use std::sync::Arc;

use patterns_core::{
    generate_structured, CapabilityTier, GenerationRequest, MaintainabilityReview,
    ModelCapability, PatternError, PerformanceReview, Result, ReviewReport, ReviewResult, SecurityReview,
};
use tracing::info;

use crate::prompts::{
    MAINTAINABILITY_REVIEW_PROMPT, PERFORMANCE_REVIEW_PROMPT, REVIEW_SUMMARY_PROMPT,
    SECURITY_REVIEW_PROMPT,
};

/// Three specialist reviews of the same artifact, run concurrently, then summarized.
pub struct ParallelReview {
    capability: Arc<dyn ModelCapability>,
}

impl ParallelReview {
    pub fn new(capability: Arc<dyn ModelCapability>) -> Self {
        Self { capability }
    }

    pub async fn run(&self, artifact: &str) -> Result<ReviewReport> {
        info!("PARALLEL: Starting security, performance and maintainability reviews");

        let prompt = format!("Review this code:\n{artifact}");
        let security = GenerationRequest::new(prompt.as_str(), CapabilityTier::Standard)
            .with_system(SECURITY_REVIEW_PROMPT);
        let performance = GenerationRequest::new(prompt.as_str(), CapabilityTier::Standard)
            .with_system(PERFORMANCE_REVIEW_PROMPT);
        let maintainability = GenerationRequest::new(prompt.as_str(), CapabilityTier::Standard)
            .with_system(MAINTAINABILITY_REVIEW_PROMPT);

        let capability = self.capability.as_ref();
        // try_join! drops the other two branches as soon as one fails.
        let (security, performance, maintainability) = futures::try_join!(
            generate_structured::<SecurityReview>(capability, &security),
            generate_structured::<PerformanceReview>(capability, &performance),
            generate_structured::<MaintainabilityReview>(capability, &maintainability),
        )?;

        let reviews = vec![
            ReviewResult::Security(security),
            ReviewResult::Performance(performance),
            ReviewResult::Maintainability(maintainability),
        ];
        info!("PARALLEL: All reviews complete, summarizing");

        let serialized = serde_json::to_string_pretty(&reviews)
            .map_err(|e| PatternError::Encoding(format!("review results: {e}")))?;
        let synthesis = GenerationRequest::new(
            format!("Synthesize these code review results into a concise summary with key actions:\n{serialized}"),
            CapabilityTier::Standard,
        )
        .with_system(REVIEW_SUMMARY_PROMPT);
        let summary = self.capability.generate_text(&synthesis).await?;

        Ok(ReviewReport { reviews, summary })
    }
}
