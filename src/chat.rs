//! Chat transcript and the streaming assembly of assistant replies.

use crate::ai::ChatSession;
use crate::error::StreamingFailure;
use crate::logger;
use crate::models::ChatTurn;
use futures::StreamExt;
use std::sync::Arc;

pub const GREETING: &str = "Hello! How can I help you study today?";
pub const SYSTEM_PROMPT: &str = "You are a helpful and friendly study assistant. Your goal is to explain concepts clearly and concisely.";
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Immutable snapshot of the conversation. Every change produces a new
/// snapshot, so a renderer holding an older one never sees it mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Arc<[ChatTurn]>,
}

impl Transcript {
    pub fn seeded() -> Self {
        Self {
            turns: Arc::from(vec![ChatTurn::assistant(GREETING)]),
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// True when both handles point at the same snapshot.
    pub fn same_snapshot(&self, other: &Transcript) -> bool {
        Arc::ptr_eq(&self.turns, &other.turns)
    }

    pub fn appended(&self, turn: ChatTurn) -> Self {
        let mut turns = self.turns.to_vec();
        turns.push(turn);
        Self {
            turns: Arc::from(turns),
        }
    }

    pub fn replace_tail(&self, turn: ChatTurn) -> Self {
        let mut turns = self.turns.to_vec();
        match turns.last_mut() {
            Some(last) => *last = turn,
            None => turns.push(turn),
        }
        Self {
            turns: Arc::from(turns),
        }
    }
}

/// Progress of one exchange as reported by the provider.
#[derive(Debug)]
pub enum ChatEvent {
    Fragment(String),
    Finished,
    Failed(StreamingFailure),
}

#[derive(Debug)]
pub struct ChatState {
    transcript: Transcript,
    pending: bool,
    session_ready: bool,
    streamed: String,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub scroll_y: u16,
    pub max_scroll: u16,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::seeded(),
            pending: false,
            session_ready: false,
            streamed: String::new(),
            input_buffer: String::new(),
            cursor_position: 0,
            scroll_y: 0,
            max_scroll: 0,
        }
    }

    /// Mark the provider session as available.
    pub fn attach_session(&mut self) {
        self.session_ready = true;
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_ready(&self) -> bool {
        self.session_ready
    }

    /// Start an exchange. Returns the message to send, or `None` when the text
    /// is blank, an exchange is already pending, or no session is attached.
    pub fn begin_exchange(&mut self, text: &str) -> Option<String> {
        if text.trim().is_empty() || self.pending || !self.session_ready {
            return None;
        }

        self.transcript = self.transcript.appended(ChatTurn::user(text));
        self.pending = true;
        self.streamed.clear();
        self.transcript = self.transcript.appended(ChatTurn::assistant(""));
        self.input_buffer.clear();
        self.cursor_position = 0;

        Some(text.to_string())
    }

    /// Start an exchange with the current input buffer.
    pub fn submit_input(&mut self) -> Option<String> {
        let text = self.input_buffer.clone();
        self.begin_exchange(&text)
    }

    /// Fold one provider event into the transcript. Events arriving while no
    /// exchange is pending are dropped.
    pub fn apply(&mut self, event: ChatEvent) {
        if !self.pending {
            return;
        }

        match event {
            ChatEvent::Fragment(fragment) => {
                self.streamed.push_str(&fragment);
                self.transcript = self
                    .transcript
                    .replace_tail(ChatTurn::assistant(self.streamed.clone()));
            }
            ChatEvent::Finished => {
                self.pending = false;
            }
            ChatEvent::Failed(failure) => {
                logger::log(&format!("Error sending message: {}", failure));
                self.transcript = self.transcript.appended(ChatTurn::assistant(APOLOGY));
                self.pending = false;
            }
        }
    }

    /// Run a whole exchange against `session`, applying fragments as they arrive.
    pub async fn send_message(&mut self, session: &mut dyn ChatSession, text: &str) {
        let Some(message) = self.begin_exchange(text) else {
            return;
        };
        stream_exchange(session, &message, |event| self.apply(event)).await;
    }
}

/// Drive one exchange, reporting fragments in receipt order. Exactly one
/// `Finished` or `Failed` is reported last.
pub async fn stream_exchange(
    session: &mut dyn ChatSession,
    message: &str,
    mut on_event: impl FnMut(ChatEvent),
) {
    let mut fragments = match session.send_streaming(message).await {
        Ok(fragments) => fragments,
        Err(e) => {
            on_event(ChatEvent::Failed(e.into()));
            return;
        }
    };

    while let Some(item) = fragments.next().await {
        match item {
            Ok(fragment) => on_event(ChatEvent::Fragment(fragment)),
            Err(e) => {
                on_event(ChatEvent::Failed(e.into()));
                return;
            }
        }
    }

    on_event(ChatEvent::Finished);
}
