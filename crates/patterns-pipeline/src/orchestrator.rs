use std::sync::Arc;

use patterns_core::{
    generate_structured, CapabilityTier, ChangeType, FeatureResult, FileChange,
    FileImplementation, FileSpec, GenerationRequest, ImplementationPlan, ModelCapability, Result,
    DEFAULT_MAX_CONCURRENT_WORKERS,
};
use tracing::info;

use crate::fanout::fan_out;
use crate::prompts::{CREATE_WORKER_PROMPT, DELETE_WORKER_PROMPT, MODIFY_WORKER_PROMPT, PLANNER_PROMPT};

/// Plans the files a feature touches, then runs one worker per file.
pub struct FeatureOrchestrator {
    capability: Arc<dyn ModelCapability>,
    max_concurrent_workers: usize,
}

impl FeatureOrchestrator {
    pub fn new(capability: Arc<dyn ModelCapability>) -> Self {
        Self {
            capability,
            max_concurrent_workers: DEFAULT_MAX_CONCURRENT_WORKERS,
        }
    }

    /// Caps how many worker calls are in flight at once. Zero is treated as one.
    pub fn with_max_concurrent_workers(mut self, max: usize) -> Self {
        self.max_concurrent_workers = max.max(1);
        self
    }

    pub async fn run(&self, goal: &str) -> Result<FeatureResult> {
        let plan = self.plan(goal).await?;

        info!(
            "ORCHESTRATOR: Plan has {} files ({:?} complexity), running up to {} workers at once",
            plan.files.len(),
            plan.estimated_complexity,
            self.max_concurrent_workers
        );

        let workers: Vec<_> = plan.files.iter().map(|file| self.implement(file, goal)).collect();
        let changes = fan_out(workers, self.max_concurrent_workers).await?;

        info!("ORCHESTRATOR: {} file changes ready", changes.len());
        Ok(FeatureResult { plan, changes })
    }

    async fn plan(&self, goal: &str) -> Result<ImplementationPlan> {
        info!("ORCHESTRATOR: Planning implementation");

        let request = GenerationRequest::new(
            format!("Analyze this feature request and create an implementation plan:\n{goal}"),
            CapabilityTier::Light,
        )
        .with_system(PLANNER_PROMPT);
        generate_structured(self.capability.as_ref(), &request).await
    }

    async fn implement(&self, file: &FileSpec, goal: &str) -> Result<FileChange> {
        info!("WORKER: {:?} {}", file.change_type, file.path);

        let request = GenerationRequest::new(worker_prompt(file, goal), CapabilityTier::Standard)
            .with_system(worker_instruction(file.change_type));
        let implementation: FileImplementation =
            generate_structured(self.capability.as_ref(), &request).await?;

        Ok(FileChange::new(file.clone(), implementation))
    }
}

pub fn worker_instruction(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Create => CREATE_WORKER_PROMPT,
        ChangeType::Modify => MODIFY_WORKER_PROMPT,
        ChangeType::Delete => DELETE_WORKER_PROMPT,
    }
}

fn worker_prompt(file: &FileSpec, goal: &str) -> String {
    format!(
        "Implement the changes for {} to support:\n{}\n\nConsider the overall feature context:\n{goal}",
        file.path, file.purpose
    )
}
