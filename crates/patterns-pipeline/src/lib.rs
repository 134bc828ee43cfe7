mod evaluator;
mod fanout;
mod oneshot;
mod orchestrator;
mod parallel;
mod prompts;
mod router;
mod sequential;

pub use evaluator::{TranslationLoop, MAX_ITERATIONS};
pub use fanout::fan_out;
pub use oneshot::OneShot;
pub use orchestrator::{worker_instruction, FeatureOrchestrator};
pub use parallel::ParallelReview;
pub use prompts::*;
pub use router::{instruction_for, tier_for, Router};
pub use sequential::SequentialGate;
