pub mod client;
pub mod generator;
#[cfg(test)]
pub mod mock;
pub mod provider;

// Public API exports
pub use client::{ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use generator::{generate_flashcards, generate_quiz};
pub use provider::{ChatSession, FragmentStream, GenerationProvider, OutputSchema};
