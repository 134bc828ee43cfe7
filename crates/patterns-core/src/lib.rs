pub mod capability;
pub mod config;
pub mod error;
pub mod fakes;
pub mod schema;
pub mod types;

pub use capability::{generate_structured, ModelCapability};
pub use config::{PatternsConfig, TierModels, DEFAULT_MAX_CONCURRENT_WORKERS};
pub use error::{PatternError, Result, SchemaViolation};
pub use schema::{Field, FieldType, Schema, Structured};
pub use types::*;
