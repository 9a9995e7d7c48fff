//! [`ContentSynthesizer`] over a chat-completions provider.

use async_trait::async_trait;
use tdm_core::synthesis::{ContentSynthesizer, ShapeHint, SynthesisCall, SynthesisError};

use crate::api::{ChatApi, ChatMessage, ChatRequest};
use crate::extract::extract_records;

const SYSTEM_PROMPT: &str = "You generate realistic synthetic test data. \
Respond with a JSON array of objects and nothing else.";

pub struct LlmSynthesizer {
    api: ChatApi,
}

impl LlmSynthesizer {
    pub fn new(api: ChatApi) -> Self {
        Self { api }
    }
}

/// Chat request for one synthesis call.
pub fn build_request(call: &SynthesisCall) -> ChatRequest {
    let system = match &call.shape {
        ShapeHint::Typed { type_name, .. } => {
            format!("{SYSTEM_PROMPT} Each object is one {type_name} record.")
        }
        ShapeHint::Document { .. } => SYSTEM_PROMPT.to_string(),
    };
    ChatRequest {
        model: call.model.clone(),
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(call.instruction.clone()),
        ],
        temperature: call.temperature,
    }
}

#[async_trait]
impl ContentSynthesizer for LlmSynthesizer {
    async fn synthesize(
        &self,
        call: &SynthesisCall,
    ) -> Result<Vec<serde_json::Value>, SynthesisError> {
        let request = build_request(call);
        tracing::debug!(
            model = %request.model,
            expected_records = call.expected_records,
            "Submitting synthesis request"
        );

        // Client-side timeouts surface as provider errors.
        let text = self
            .api
            .complete(&request)
            .await
            .map_err(|e| SynthesisError::Provider(e.to_string()))?;

        let records = extract_records(&text)?;
        tracing::debug!(received = records.len(), "Synthesis response decoded");
        Ok(records)
    }
}
