pub mod ai;
pub mod ai_worker;
pub mod app;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod flashcards;
pub mod input;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod settings;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use ai::{
    ChatSession, DEFAULT_MODEL, GenerationProvider, ModelConfig, OpenRouterClient,
    generate_flashcards, generate_quiz,
};
pub use chat::{ChatEvent, ChatState, Transcript};
pub use config::AppConfig;
pub use error::{GenerationFailure, ProviderError, StorageError, StreamingFailure, ValidationFailure};
pub use flashcards::FlashcardSession;
pub use models::{Flashcard, QuizQuestion, SavedFlashcardSet};
pub use quiz::{QuizPhase, QuizSession};
