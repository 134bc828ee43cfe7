use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::schema::{decode, Schema, Structured};
use crate::{GenerationRequest, Result};

/// The generative model boundary every pattern is written against.
#[async_trait]
pub trait ModelCapability: Send + Sync {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String>;

    /// Returns the raw payload the model produced for `schema`.
    /// Validation happens in [`generate_structured`], not here.
    async fn generate_value(&self, request: &GenerationRequest, schema: &Schema) -> Result<Value>;
}

/// Structured generation for any [`Structured`] entity.
///
/// Fails with `SchemaValidation` when the payload is missing a field, carries
/// an out-of-range number, or uses a value outside a closed enumeration.
pub async fn generate_structured<T: Structured>(
    capability: &dyn ModelCapability,
    request: &GenerationRequest,
) -> Result<T> {
    let schema = T::schema();
    let value = capability.generate_value(request, &schema).await?;
    debug!("Structured response for {}: {}", schema.name, value);
    decode(value)
}
