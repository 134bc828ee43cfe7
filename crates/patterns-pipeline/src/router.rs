use std::sync::Arc;

use patterns_core::{
    generate_structured, CapabilityTier, Category, ClassificationResult, Complexity,
    GenerationRequest, ModelCapability, Result, RoutedResponse,
};
use tracing::info;

use crate::prompts::{
    CLASSIFIER_PROMPT, GENERAL_SUPPORT_PROMPT, REFUND_SUPPORT_PROMPT, TECHNICAL_SUPPORT_PROMPT,
};

/// Classify a query, then answer it with the instruction and tier its class calls for.
pub struct Router {
    capability: Arc<dyn ModelCapability>,
}

impl Router {
    pub fn new(capability: Arc<dyn ModelCapability>) -> Self {
        Self { capability }
    }

    pub async fn run(&self, query: &str) -> Result<RoutedResponse> {
        info!("ROUTER: Classifying query");

        let request = GenerationRequest::new(
            format!("Classify this customer query:\n{query}"),
            CapabilityTier::Standard,
        )
        .with_system(CLASSIFIER_PROMPT);
        let classification: ClassificationResult =
            generate_structured(self.capability.as_ref(), &request).await?;

        let tier = tier_for(classification.complexity);
        info!(
            "ROUTER: Routing {:?}/{:?} query to {:?} tier",
            classification.category, classification.complexity, tier
        );

        let dispatch = GenerationRequest::new(query, tier).with_system(instruction_for(classification.category));
        let response = self.capability.generate_text(&dispatch).await?;

        Ok(RoutedResponse {
            response,
            classification,
        })
    }
}

pub fn instruction_for(category: Category) -> &'static str {
    match category {
        Category::General => GENERAL_SUPPORT_PROMPT,
        Category::Refund => REFUND_SUPPORT_PROMPT,
        Category::Technical => TECHNICAL_SUPPORT_PROMPT,
    }
}

pub fn tier_for(complexity: Complexity) -> CapabilityTier {
    match complexity {
        Complexity::Simple => CapabilityTier::Light,
        Complexity::Complex => CapabilityTier::Standard,
    }
}
