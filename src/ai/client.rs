use crate::ai::provider::{ChatSession, FragmentStream, GenerationProvider, OutputSchema};
use crate::error::ProviderError;
use crate::logger;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{future, Stream, StreamExt};
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use serde::Serialize;
use serde_json::Value;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const STRUCTURED_SYSTEM_PROMPT: &str =
    "You are a study assistant that produces structured study material. Respond with JSON only.";

#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}

/// OpenRouter-backed provider. Built once at start-up and shared by handle.
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    http: reqwest::Client,
    api_key: String,
    config: ModelConfig,
}

impl OpenRouterClient {
    pub fn new(api_key: String, config: ModelConfig) -> Result<Self, ProviderError> {
        let client =
            openrouter_api::OpenRouterClient::<openrouter_api::Unconfigured>::from_api_key(
                api_key.as_str(),
            )
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            client,
            http: reqwest::Client::new(),
            api_key,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

fn structured_prompt(prompt: &str, schema: &OutputSchema) -> String {
    format!(
        r#"{}

IMPORTANT:

- Respond ONLY with JSON (no markdown, no extra text) that validates against this JSON Schema:
{}
"#,
        prompt,
        schema.to_json_schema()
    )
}

#[async_trait]
impl GenerationProvider for OpenRouterClient {
    async fn generate(&self, prompt: &str, schema: &OutputSchema) -> Result<String, ProviderError> {
        let messages = vec![
            Message::text("system", STRUCTURED_SYSTEM_PROMPT),
            Message::text("user", &structured_prompt(prompt, schema)),
        ];

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        };

        let response = self
            .client
            .chat()
            .map_err(|e| ProviderError::Api(e.to_string()))?
            .chat_completion(request)
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        let choice = response
            .choices
            .first()
            .ok_or(ProviderError::EmptyResponse)?;

        match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => Ok(text.clone()),
            openrouter_api::MessageContent::Parts(parts) => {
                let text_parts: Vec<String> = parts
                    .iter()
                    .filter_map(|p| {
                        if let openrouter_api::ContentPart::Text(tc) = p {
                            Some(tc.text.clone())
                        } else {
                            None
                        }
                    })
                    .collect();
                Ok(text_parts.join("\n"))
            }
        }
    }

    fn create_session(&self, system_prompt: &str) -> Box<dyn ChatSession> {
        Box::new(OpenRouterChatSession {
            http: self.http.clone(),
            api_key: self.api_key.clone(),
            config: self.config.clone(),
            history: Arc::new(Mutex::new(vec![WireMessage::new("system", system_prompt)])),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl WireMessage {
    fn new(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StreamRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

type History = Arc<Mutex<Vec<WireMessage>>>;

/// Stateful conversation over the streaming chat-completions endpoint.
pub struct OpenRouterChatSession {
    http: reqwest::Client,
    api_key: String,
    config: ModelConfig,
    history: History,
}

#[async_trait]
impl ChatSession for OpenRouterChatSession {
    async fn send_streaming(&mut self, message: &str) -> Result<FragmentStream, ProviderError> {
        let mut messages = self
            .history
            .lock()
            .map(|h| h.clone())
            .map_err(|_| ProviderError::Stream("chat history lock poisoned".to_string()))?;
        messages.push(WireMessage::new("user", message));

        let request = StreamRequest {
            model: &self.config.model,
            messages: &messages,
            stream: true,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(OPENROUTER_CHAT_URL)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let fragments = fragments_from_sse(response.bytes_stream());
        Ok(RecordingStream::new(fragments, Arc::clone(&self.history), message).boxed())
    }
}

/// Turn a raw SSE byte stream into text fragments. `data: [DONE]` ends the stream.
fn fragments_from_sse<S, B, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    bytes
        .eventsource()
        .take_while(|event| {
            future::ready(!matches!(event, Ok(e) if e.data.trim() == "[DONE]"))
        })
        .filter_map(|event| {
            future::ready(match event {
                Ok(event) => parse_stream_chunk(&event.data).transpose(),
                Err(e) => Some(Err(ProviderError::Stream(e.to_string()))),
            })
        })
        .boxed()
}

fn parse_stream_chunk(data: &str) -> Result<Option<String>, ProviderError> {
    let trimmed = data.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| ProviderError::Stream(format!("failed to parse SSE JSON: {}", e)))?;

    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        return Err(ProviderError::Stream(message.to_string()));
    }

    let content = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("delta"))
        .and_then(|delta| delta.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty());

    Ok(content.map(str::to_string))
}

/// Passes fragments through and, once the stream ends cleanly, records the
/// exchange in the session history so the next turn carries context.
struct RecordingStream {
    inner: FragmentStream,
    history: History,
    user_message: Option<String>,
    reply: String,
    failed: bool,
}

impl RecordingStream {
    fn new(inner: FragmentStream, history: History, user_message: &str) -> Self {
        Self {
            inner,
            history,
            user_message: Some(user_message.to_string()),
            reply: String::new(),
            failed: false,
        }
    }
}

impl Stream for RecordingStream {
    type Item = Result<String, ProviderError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(fragment))) => {
                this.reply.push_str(&fragment);
                Poll::Ready(Some(Ok(fragment)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.failed = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                if !this.failed
                    && let Some(user_message) = this.user_message.take()
                {
                    match this.history.lock() {
                        Ok(mut history) => {
                            history.push(WireMessage::new("user", user_message));
                            history.push(WireMessage::new(
                                "assistant",
                                std::mem::take(&mut this.reply),
                            ));
                        }
                        Err(_) => logger::log("Chat history lock poisoned; exchange not recorded"),
                    }
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
