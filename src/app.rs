use crate::chat::{ChatEvent, ChatState};
use crate::db::KeyValueStore;
use crate::error::{GenerationFailure, GenerationKind, ProviderError};
use crate::flashcards::{FlashcardSession, PresetDialogs};
use crate::logger;
use crate::models::{AiRequest, AiResponse, Module, Theme};
use crate::quiz::QuizSession;
use crate::settings;
use crate::ui::ChatRenderCache;
use crossbeam_channel::Sender;

/// Overlay shown above the active module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    SaveSet { input: String, cursor: usize },
    ConfirmDelete { name: String },
    Notice(String),
}

pub struct App {
    pub module: Module,
    pub theme: Theme,
    pub chat: ChatState,
    pub quiz: QuizSession,
    pub flashcards: FlashcardSession,
    pub modal: Option<Modal>,
    pub chat_cache: ChatRenderCache,
    pub should_quit: bool,
    store: Box<dyn KeyValueStore>,
    ai_tx: Sender<AiRequest>,
}

impl App {
    pub fn new(store: Box<dyn KeyValueStore>, ai_tx: Sender<AiRequest>) -> Self {
        let theme = settings::load_theme(store.as_ref());
        let flashcards = FlashcardSession::with_store(store.as_ref());
        Self {
            module: Module::default(),
            theme,
            chat: ChatState::new(),
            quiz: QuizSession::new(),
            flashcards,
            modal: None,
            chat_cache: ChatRenderCache::default(),
            should_quit: false,
            store,
            ai_tx,
        }
    }

    /// Hand a request to the worker. On failure the caller must fail the
    /// module that is now waiting.
    pub fn send(&self, request: AiRequest) -> Result<(), ProviderError> {
        self.ai_tx.send(request).map_err(|_| {
            logger::log("AI worker is gone, request dropped");
            ProviderError::Worker("request channel closed".to_string())
        })
    }

    /// Fold one worker result into the module that asked for it.
    pub fn apply_response(&mut self, response: AiResponse) {
        match response {
            AiResponse::Quiz(result) => self.quiz.complete_generation(result),
            AiResponse::Flashcards(result) => self.flashcards.complete_generation(result),
            AiResponse::Chat(event) => self.chat.apply(event),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = settings::toggle_theme(self.store.as_mut(), self.theme);
    }

    pub fn send_chat(&mut self) {
        if let Some(message) = self.chat.submit_input()
            && let Err(e) = self.send(AiRequest::SendChat { message })
        {
            self.chat.apply(ChatEvent::Failed(e.into()));
        }
    }

    pub fn request_quiz(&mut self) {
        if let Some(topic) = self.quiz.submit_topic()
            && let Err(e) = self.send(AiRequest::GenerateQuiz { topic })
        {
            self.quiz
                .complete_generation(Err(GenerationFailure::new(GenerationKind::Quiz, e)));
        }
    }

    pub fn request_flashcards(&mut self) {
        if let Some(topic) = self.flashcards.submit_topic()
            && let Err(e) = self.send(AiRequest::GenerateFlashcards { topic })
        {
            self.flashcards
                .complete_generation(Err(GenerationFailure::new(GenerationKind::Flashcards, e)));
        }
    }

    /// Run the save flow with the name typed into the save modal, or with no
    /// name when the modal was cancelled.
    pub fn save_flashcards(&mut self, name: Option<String>) {
        let mut dialogs = PresetDialogs {
            answer: name,
            ..PresetDialogs::default()
        };
        self.flashcards.save_with(&mut dialogs, self.store.as_mut());
        self.modal = dialogs.alerts.pop().map(Modal::Notice);
    }

    pub fn delete_flashcards(&mut self, name: &str, confirmed: bool) {
        let mut dialogs = PresetDialogs::confirming(confirmed);
        self.flashcards
            .delete_with(name, &mut dialogs, self.store.as_mut());
        self.modal = None;
    }
}
