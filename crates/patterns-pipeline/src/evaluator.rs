//! Evaluator-optimizer translation loop.
//!
//! ```text
//! Draft ──▶ Evaluate ──accept──▶ Accept
//!              ▲  │
//!              │  └──reject──▶ Refine ──iterations == MAX──▶ Exhausted
//!              └─────────────────┘
//! ```
//!
//! Every `Refine` increments `iterations`, and `Evaluate` is only entered while
//! `iterations < MAX_ITERATIONS`, so the loop ends after at most
//! `MAX_ITERATIONS` refinements.

use std::sync::Arc;

use patterns_core::{
    generate_structured, CapabilityTier, GenerationRequest, ModelCapability, Result,
    TranslationEvaluation, TranslationResult,
};
use tracing::info;

use crate::prompts::{TRANSLATION_EVALUATOR_PROMPT, TRANSLATOR_PROMPT};

pub const MAX_ITERATIONS: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
enum LoopState {
    Draft,
    Evaluate { candidate: String, iterations: u32 },
    Refine { candidate: String, evaluation: TranslationEvaluation, iterations: u32 },
    Accept { candidate: String, iterations: u32 },
    Exhausted { candidate: String },
}

/// Guarded transition out of `Evaluate`.
fn after_evaluation(candidate: String, evaluation: TranslationEvaluation, iterations: u32) -> LoopState {
    if evaluation.is_acceptable() {
        LoopState::Accept { candidate, iterations }
    } else {
        LoopState::Refine { candidate, evaluation, iterations }
    }
}

/// Guarded transition out of `Refine`, given the refined candidate.
fn after_refinement(candidate: String, iterations: u32) -> LoopState {
    let iterations = iterations + 1;
    if iterations < MAX_ITERATIONS {
        LoopState::Evaluate { candidate, iterations }
    } else {
        LoopState::Exhausted { candidate }
    }
}

pub struct TranslationLoop {
    capability: Arc<dyn ModelCapability>,
}

impl TranslationLoop {
    pub fn new(capability: Arc<dyn ModelCapability>) -> Self {
        Self { capability }
    }

    pub async fn run(&self, text: &str, target_language: &str) -> Result<TranslationResult> {
        let mut state = LoopState::Draft;

        loop {
            state = match state {
                LoopState::Draft => {
                    let candidate = self.draft(text, target_language).await?;
                    LoopState::Evaluate { candidate, iterations: 0 }
                }
                LoopState::Evaluate { candidate, iterations } => {
                    let evaluation = self.evaluate(text, &candidate).await?;
                    info!(
                        "EVALUATOR: Iteration {} scored {}/10 (tone: {}, nuance: {}, cultural: {})",
                        iterations,
                        evaluation.quality_score,
                        evaluation.preserves_tone,
                        evaluation.preserves_nuance,
                        evaluation.culturally_accurate
                    );
                    after_evaluation(candidate, evaluation, iterations)
                }
                LoopState::Refine { candidate, evaluation, iterations } => {
                    let refined = self.refine(text, &candidate, &evaluation).await?;
                    after_refinement(refined, iterations)
                }
                LoopState::Accept { candidate, iterations } => {
                    info!("EVALUATOR: Accepted after {} refinements", iterations);
                    return Ok(TranslationResult {
                        result: candidate,
                        iterations,
                    });
                }
                LoopState::Exhausted { candidate } => {
                    info!("EVALUATOR: Budget of {} refinements used, returning last candidate", MAX_ITERATIONS);
                    return Ok(TranslationResult {
                        result: candidate,
                        iterations: MAX_ITERATIONS,
                    });
                }
            };
        }
    }

    async fn draft(&self, text: &str, target_language: &str) -> Result<String> {
        info!("EVALUATOR: Drafting {} translation", target_language);
        let request = GenerationRequest::new(
            format!(
                "Translate this text to {target_language}, preserving tone and cultural nuances. \
                 Write only the translation, without explanations:\n{text}"
            ),
            CapabilityTier::Light,
        )
        .with_system(TRANSLATOR_PROMPT);
        self.capability.generate_text(&request).await
    }

    async fn evaluate(&self, text: &str, candidate: &str) -> Result<TranslationEvaluation> {
        let request = GenerationRequest::new(
            format!("Evaluate this translation:\n\nOriginal: {text}\nTranslation: {candidate}"),
            CapabilityTier::Standard,
        )
        .with_system(TRANSLATION_EVALUATOR_PROMPT);
        generate_structured(self.capability.as_ref(), &request).await
    }

    async fn refine(&self, text: &str, candidate: &str, evaluation: &TranslationEvaluation) -> Result<String> {
        let request = GenerationRequest::new(
            format!(
                "Improve this translation based on the following feedback:\n{}\n{}\n\n\
                 Original: {text}\nCurrent Translation: {candidate}\n\nOnly write the translation.",
                evaluation.issues.join("\n"),
                evaluation.suggestions.join("\n"),
            ),
            CapabilityTier::Standard,
        )
        .with_system(TRANSLATOR_PROMPT);
        self.capability.generate_text(&request).await
    }
}
