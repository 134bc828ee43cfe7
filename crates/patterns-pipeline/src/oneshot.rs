use std::sync::Arc;

use patterns_core::{
    generate_structured, CapabilityTier, GenerationRequest, ModelCapability, Result, WeatherReport,
};
use tracing::info;

use crate::prompts::WEATHER_REPORT_PROMPT;

/// Single calls with no coordination around them.
pub struct OneShot {
    capability: Arc<dyn ModelCapability>,
}

impl OneShot {
    pub fn new(capability: Arc<dyn ModelCapability>) -> Self {
        Self { capability }
    }

    pub async fn text(&self, prompt: &str, system: Option<&str>, tier: CapabilityTier) -> Result<String> {
        info!("ONESHOT: Text call on {:?} tier", tier);

        let mut request = GenerationRequest::new(prompt, tier);
        if let Some(system) = system {
            request = request.with_system(system);
        }
        self.capability.generate_text(&request).await
    }

    pub async fn weather_report(&self, date: &str) -> Result<WeatherReport> {
        info!("ONESHOT: Weather report for {date}");

        let request = GenerationRequest::new(
            format!("Generate a random weather report for this date: {date}. Include one entry per hour from 7am to 1pm."),
            CapabilityTier::Light,
        )
        .with_system(WEATHER_REPORT_PROMPT);
        generate_structured(self.capability.as_ref(), &request).await
    }
}
