use std::future::Future;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use patterns_core::{
    GenerationRequest, ModelCapability, PatternError, PatternsConfig, Result, Schema,
    SchemaViolation, TierModels,
};
use serde_json::Value;
use tracing::debug;

fn llm_err(e: impl ToString) -> PatternError {
    PatternError::CapabilityUnavailable(e.to_string())
}

fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| PatternError::CapabilityUnavailable("No response content".into()))
}

/// Appends the JSON Schema the reply must follow to the system instruction.
fn structured_instruction(system: Option<&str>, schema: &Schema) -> Result<String> {
    let rendered = serde_json::to_string_pretty(&schema.to_json_schema())
        .map_err(|e| PatternError::Encoding(format!("schema '{}': {e}", schema.name)))?;
    let preamble = system.unwrap_or("You produce structured data.");
    Ok(format!(
        "{preamble}\n\nRespond with a single JSON object that matches this JSON Schema exactly, with no surrounding text:\n{rendered}"
    ))
}

/// A reply that is not JSON at all fails the schema it was asked for.
fn parse_structured(content: &str, schema: &Schema) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| {
        PatternError::schema(
            schema.name,
            vec![SchemaViolation::new(
                "$",
                format!("reply is not valid JSON: {e} - content: {content}"),
            )],
        )
    })
}

/// async-openai retries rate limits and 5xx responses by default; here the
/// first failure is final.
fn no_retry() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Model capability backed by an OpenAI-compatible chat completions API.
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    models: TierModels,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(config: &PatternsConfig) -> Result<Self> {
        config.validate()?;

        let mut openai = OpenAIConfig::new();
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base.clone());
        }

        Ok(Self {
            client: Client::with_config(openai).with_backoff(no_retry()),
            models: config.models.clone(),
            timeout: config.timeout(),
        })
    }

    fn build_request(
        &self,
        request: &GenerationRequest,
        system: Option<&str>,
        json_mode: bool,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(llm_err)?,
            ));
        }
        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.as_str())
                .build()
                .map_err(llm_err)?,
        ));

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.models.model_for(request.tier)).messages(messages);
        if json_mode {
            args.response_format(ResponseFormat::JsonObject);
        }
        args.build().map_err(llm_err)
    }

    async fn with_timeout<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| PatternError::CapabilityTimeout(self.timeout))?
    }

    async fn complete(&self, request: CreateChatCompletionRequest) -> Result<String> {
        self.with_timeout(async {
            let response = self.client.chat().create(request).await.map_err(llm_err)?;
            extract_content(response)
        })
        .await
    }
}

#[async_trait]
impl ModelCapability for LlmClient {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String> {
        debug!(
            "LLM: text call on {:?} tier ({})",
            request.tier,
            self.models.model_for(request.tier)
        );
        let chat = self.build_request(request, request.system_instruction.as_deref(), false)?;
        self.complete(chat).await
    }

    async fn generate_value(&self, request: &GenerationRequest, schema: &Schema) -> Result<Value> {
        debug!(
            "LLM: structured call for {} ({})",
            schema.name,
            self.models.model_for(request.tier)
        );
        let system = structured_instruction(request.system_instruction.as_deref(), schema)?;
        let chat = self.build_request(request, Some(&system), true)?;
        let content = self.complete(chat).await?;
        parse_structured(&content, schema)
    }
}

#[cfg(test)]
mod tests {
    use patterns_core::{CapabilityTier, Structured, TranslationEvaluation};

    use super::*;

    fn client() -> LlmClient {
        let config = PatternsConfig {
            api_base: Some("http://localhost:11434/v1".into()),
            timeout_secs: 1,
            ..PatternsConfig::default()
        };
        LlmClient::new(&config).unwrap()
    }

    #[test]
    fn test_structured_instruction_embeds_schema() {
        let text =
            structured_instruction(Some("You grade translations."), &TranslationEvaluation::schema()).unwrap();
        assert!(text.starts_with("You grade translations."));
        assert!(text.contains("\"qualityScore\""));
        assert!(text.contains("\"maximum\": 10"));
    }

    #[test]
    fn test_request_uses_tier_model() {
        let client = client();
        let request = GenerationRequest::new("hi", CapabilityTier::Light).with_system("be brief");
        let chat = client
            .build_request(&request, request.system_instruction.as_deref(), false)
            .unwrap();
        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.messages.len(), 2);
        assert!(chat.response_format.is_none());

        let request = GenerationRequest::new("hi", CapabilityTier::Standard);
        let chat = client.build_request(&request, None, true).unwrap();
        assert_eq!(chat.model, "gpt-4o");
        assert_eq!(chat.messages.len(), 1);
        assert!(chat.response_format.is_some());
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let client = client();
        let err = client
            .with_timeout(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PatternError::CapabilityTimeout(d) if d == Duration::from_secs(1)));
    }

    #[test]
    fn test_non_json_reply_fails_requested_schema() {
        let schema = TranslationEvaluation::schema();
        let err = parse_structured("Sure! Here is the evaluation: great", &schema).unwrap_err();
        match err {
            PatternError::SchemaValidation { schema, violations } => {
                assert_eq!(schema, "translation_evaluation");
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].path, "$");
                assert!(violations[0].reason.starts_with("reply is not valid JSON"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_reply_is_parsed_before_validation() {
        let schema = TranslationEvaluation::schema();
        let value = parse_structured(r#"{"qualityScore": 9}"#, &schema).unwrap();
        assert_eq!(value["qualityScore"], 9);
    }

    #[test]
    fn test_backoff_gives_up_immediately() {
        use backoff::backoff::Backoff;

        let mut backoff = no_retry();
        std::thread::sleep(Duration::from_millis(1));
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PatternsConfig {
            timeout_secs: 0,
            ..PatternsConfig::default()
        };
        assert!(LlmClient::new(&config).is_err());
    }
}
