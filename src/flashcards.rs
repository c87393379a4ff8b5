//! Flashcard browsing and the saved-set collection.

use crate::db::KeyValueStore;
use crate::error::{GenerationFailure, StorageError, ValidationFailure};
use crate::logger;
use crate::models::{Flashcard, SavedFlashcardSet};

pub const SAVED_SETS_KEY: &str = "studyBuddy_flashcardSets";
pub const SAVE_PROMPT: &str = "Enter a name for this flashcard set:";

pub fn delete_prompt(name: &str) -> String {
    format!(
        "Are you sure you want to delete the set \"{}\"? This action cannot be undone.",
        name
    )
}

pub fn saved_notice(name: &str) -> String {
    format!("Set \"{}\" saved successfully!", name)
}

/// Blocking user interaction used by the save and delete flows.
pub trait Dialogs {
    fn prompt(&mut self, message: &str) -> Option<String>;
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Dialogs whose answers were collected ahead of time, e.g. from a modal.
/// Alerts are kept for the caller to display.
#[derive(Debug, Default, Clone)]
pub struct PresetDialogs {
    pub answer: Option<String>,
    pub confirmed: bool,
    pub asked: Vec<String>,
    pub alerts: Vec<String>,
}

impl PresetDialogs {
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }

    pub fn confirming(confirmed: bool) -> Self {
        Self {
            confirmed,
            ..Self::default()
        }
    }
}

impl Dialogs for PresetDialogs {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.asked.push(message.to_string());
        self.answer.take()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.confirmed
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

fn read_sets(store: &dyn KeyValueStore) -> Result<Vec<SavedFlashcardSet>, StorageError> {
    match store.get(SAVED_SETS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Load the saved collection. Anything unreadable loads as empty.
pub fn load_saved_sets(store: &dyn KeyValueStore) -> Vec<SavedFlashcardSet> {
    read_sets(store).unwrap_or_else(|e| {
        logger::log(&format!("Failed to load flashcard sets: {}", e));
        Vec::new()
    })
}

/// Write the whole collection back.
pub fn persist_saved_sets(
    store: &mut dyn KeyValueStore,
    sets: &[SavedFlashcardSet],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(sets)?;
    store.set(SAVED_SETS_KEY, &raw)
}

#[derive(Debug, Default)]
pub struct FlashcardSession {
    topic: String,
    cards: Vec<Flashcard>,
    current: usize,
    flipped: bool,
    loading: bool,
    error: Option<String>,
    saved: Vec<SavedFlashcardSet>,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub focused_set: usize,
}

impl FlashcardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with the saved collection read from `store`.
    pub fn with_store(store: &dyn KeyValueStore) -> Self {
        Self {
            saved: load_saved_sets(store),
            ..Self::default()
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn has_cards(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.cards.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn saved_sets(&self) -> &[SavedFlashcardSet] {
        &self.saved
    }

    /// "Card i of n" for the card viewer.
    pub fn position_label(&self) -> String {
        format!("Card {} of {}", self.current + 1, self.cards.len())
    }

    pub fn begin_generation(&mut self, topic: &str) -> Option<String> {
        if topic.trim().is_empty() || self.loading {
            return None;
        }

        self.topic = topic.to_string();
        self.loading = true;
        self.error = None;
        self.cards.clear();
        self.current = 0;
        self.flipped = false;

        Some(self.topic.clone())
    }

    pub fn submit_topic(&mut self) -> Option<String> {
        let topic = self.input_buffer.clone();
        let requested = self.begin_generation(&topic)?;
        self.input_buffer.clear();
        self.cursor_position = 0;
        Some(requested)
    }

    pub fn complete_generation(&mut self, result: Result<Vec<Flashcard>, GenerationFailure>) {
        if !self.loading {
            logger::log("Ignoring flashcard result received outside generation");
            return;
        }
        self.loading = false;

        match result {
            Ok(cards) => self.cards = cards,
            Err(failure) => {
                self.error = Some(failure.to_string());
            }
        }
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.cards.len() {
            self.current += 1;
            self.flipped = false;
        }
    }

    pub fn prev(&mut self) {
        if self.current > 0 {
            self.current -= 1;
            self.flipped = false;
        }
    }

    pub fn flip(&mut self) {
        if self.has_cards() {
            self.flipped = !self.flipped;
        }
    }

    /// Replace the current cards with a saved set. Returns false when no set
    /// has exactly that name.
    pub fn load_set(&mut self, name: &str) -> bool {
        let Some(set) = self.saved.iter().find(|s| s.name == name) else {
            return false;
        };
        self.topic = set.topic.clone();
        self.cards = set.flashcards.clone();
        self.current = 0;
        self.flipped = false;
        self.error = None;
        true
    }

    /// Drop the current cards and go back to topic entry.
    pub fn reset(&mut self) {
        if self.loading {
            return;
        }
        self.topic.clear();
        self.cards.clear();
        self.current = 0;
        self.flipped = false;
        self.error = None;
        self.focused_set = 0;
    }

    fn name_taken(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.saved.iter().any(|s| s.name.to_lowercase() == wanted)
    }

    /// Save the current cards under `name`. The in-memory collection keeps the
    /// new set even if writing it out fails.
    pub fn save_as(
        &mut self,
        name: &str,
        store: &mut dyn KeyValueStore,
    ) -> Result<String, ValidationFailure> {
        if self.cards.is_empty() || self.topic.is_empty() {
            return Err(ValidationFailure::NothingToSave);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationFailure::EmptyName);
        }
        if self.name_taken(name) {
            return Err(ValidationFailure::DuplicateName(name.to_string()));
        }

        self.saved.push(SavedFlashcardSet {
            name: name.to_string(),
            topic: self.topic.clone(),
            flashcards: self.cards.clone(),
        });
        self.write_back(store);
        Ok(name.to_string())
    }

    pub fn save_with(&mut self, dialogs: &mut dyn Dialogs, store: &mut dyn KeyValueStore) {
        if self.cards.is_empty() || self.topic.is_empty() {
            return;
        }
        let name = dialogs.prompt(SAVE_PROMPT).unwrap_or_default();
        match self.save_as(&name, store) {
            Ok(saved) => dialogs.alert(&saved_notice(&saved)),
            Err(failure) => dialogs.alert(&failure.to_string()),
        }
    }

    /// Remove the set named exactly `name`. Returns false if none matched.
    pub fn delete(&mut self, name: &str, store: &mut dyn KeyValueStore) -> bool {
        let before = self.saved.len();
        self.saved.retain(|s| s.name != name);
        if self.saved.len() == before {
            return false;
        }
        self.focused_set = self.focused_set.min(self.saved.len().saturating_sub(1));
        self.write_back(store);
        true
    }

    pub fn delete_with(
        &mut self,
        name: &str,
        dialogs: &mut dyn Dialogs,
        store: &mut dyn KeyValueStore,
    ) -> bool {
        if !dialogs.confirm(&delete_prompt(name)) {
            return false;
        }
        self.delete(name, store)
    }

    fn write_back(&self, store: &mut dyn KeyValueStore) {
        if let Err(e) = persist_saved_sets(store, &self.saved) {
            logger::log(&format!("Failed to save flashcard sets: {}", e));
        }
    }

    pub fn focused_set_name(&self) -> Option<&str> {
        self.saved.get(self.focused_set).map(|s| s.name.as_str())
    }

    pub fn focus_next_set(&mut self) {
        if self.focused_set + 1 < self.saved.len() {
            self.focused_set += 1;
        }
    }

    pub fn focus_prev_set(&mut self) {
        self.focused_set = self.focused_set.saturating_sub(1);
    }
}
