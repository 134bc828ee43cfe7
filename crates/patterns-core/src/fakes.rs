//! In-memory model capability for tests.
//!
//! `ScriptedCapability` answers text calls and structured calls (keyed by
//! schema name) from caller-supplied responders, optionally after a delay,
//! and records every request it sees.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::capability::ModelCapability;
use crate::schema::Schema;
use crate::{GenerationRequest, PatternError, Result};

type Responder<T> = Box<dyn Fn(&GenerationRequest) -> Result<T> + Send + Sync>;

/// Delay key used for text calls.
pub const TEXT: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Text,
    Structured(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub request: GenerationRequest,
}

#[derive(Default)]
pub struct ScriptedCapability {
    text: Option<Responder<String>>,
    structured: HashMap<&'static str, Responder<Value>>,
    delays: HashMap<&'static str, Duration>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ScriptedCapability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text<F>(mut self, responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<String> + Send + Sync + 'static,
    {
        self.text = Some(Box::new(responder));
        self
    }

    pub fn on_structured<F>(mut self, schema: &'static str, responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<Value> + Send + Sync + 'static,
    {
        self.structured.insert(schema, Box::new(responder));
        self
    }

    /// Answers successive calls for `schema` with `values` in order, repeating
    /// the last one once the list runs out.
    pub fn with_sequence(self, schema: &'static str, values: Vec<Value>) -> Self {
        let next = AtomicUsize::new(0);
        self.on_structured(schema, move |_| {
            let i = next.fetch_add(1, Ordering::SeqCst);
            values
                .get(i)
                .or_else(|| values.last())
                .cloned()
                .ok_or_else(|| PatternError::CapabilityUnavailable(format!("empty script for {schema}")))
        })
    }

    /// Delays calls for `key` (a schema name, or [`TEXT`]).
    pub fn with_delay(mut self, key: &'static str, delay: Duration) -> Self {
        self.delays.insert(key, delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn text_calls(&self) -> Vec<GenerationRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.kind == CallKind::Text)
            .map(|c| c.request)
            .collect()
    }

    pub fn structured_calls(&self, schema: &str) -> Vec<GenerationRequest> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c.kind, CallKind::Structured(name) if name == schema))
            .map(|c| c.request)
            .collect()
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn record(&self, kind: CallKind, request: &GenerationRequest) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                kind,
                request: request.clone(),
            });
        }
    }

    async fn enter(&self, key: &str) -> InFlight {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(Arc::clone(&self.in_flight));

        match self.delays.get(key) {
            Some(delay) => tokio::time::sleep(*delay).await,
            None => tokio::task::yield_now().await,
        }
        guard
    }
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ModelCapability for ScriptedCapability {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String> {
        self.record(CallKind::Text, request);
        let _guard = self.enter(TEXT).await;

        let responder = self
            .text
            .as_ref()
            .ok_or_else(|| PatternError::CapabilityUnavailable("no scripted text response".into()))?;
        responder(request)
    }

    async fn generate_value(&self, request: &GenerationRequest, schema: &Schema) -> Result<Value> {
        self.record(CallKind::Structured(schema.name), request);
        let _guard = self.enter(schema.name).await;

        let responder = self.structured.get(schema.name).ok_or_else(|| {
            PatternError::CapabilityUnavailable(format!("no scripted response for {}", schema.name))
        })?;
        responder(request)
    }
}
