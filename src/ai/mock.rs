//! Scripted provider and chat session for tests.

use crate::ai::provider::{ChatSession, FragmentStream, GenerationProvider, OutputSchema};
use crate::error::ProviderError;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replies to `generate` calls in order. Errors are given as plain messages.
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    schemas: Mutex<Vec<OutputSchema>>,
    session: MockChatSession,
}

impl MockProvider {
    pub fn with_replies(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn with_session(session: MockChatSession) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn schemas(&self) -> Vec<OutputSchema> {
        self.schemas.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn generate(&self, prompt: &str, schema: &OutputSchema) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.schemas.lock().unwrap().push(schema.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Api(message)),
            None => Err(ProviderError::EmptyResponse),
        }
    }

    fn create_session(&self, _system_prompt: &str) -> Box<dyn ChatSession> {
        Box::new(self.session.clone())
    }
}

pub enum ChatScript {
    /// Fragments yielded in order; an `Err` item fails the stream at that point.
    Stream(Vec<Result<String, String>>),
    /// The provider rejects the message before any fragment arrives.
    Refuse(String),
}

/// Clones share the script queue and the record of sent messages.
#[derive(Default, Clone)]
pub struct MockChatSession {
    scripts: Arc<Mutex<VecDeque<ChatScript>>>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockChatSession {
    pub fn scripted(scripts: Vec<ChatScript>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.into())),
            sent: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSession for MockChatSession {
    async fn send_streaming(&mut self, message: &str) -> Result<FragmentStream, ProviderError> {
        self.sent.lock().unwrap().push(message.to_string());
        let script = self.scripts.lock().unwrap().pop_front();
        match script {
            Some(ChatScript::Stream(items)) => Ok(futures::stream::iter(
                items
                    .into_iter()
                    .map(|item| item.map_err(ProviderError::Stream)),
            )
            .boxed()),
            Some(ChatScript::Refuse(message)) => Err(ProviderError::Api(message)),
            None => Ok(futures::stream::empty().boxed()),
        }
    }
}
