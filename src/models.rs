use crate::chat::ChatEvent;
use crate::error::GenerationFailure;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// A multiple-choice question. The option count is fixed by the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: String,
}

impl QuizQuestion {
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFlashcardSet {
    pub name: String,
    pub topic: String,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Module {
    #[default]
    Chat,
    Quiz,
    Flashcards,
}

impl Module {
    pub const ALL: [Module; 3] = [Module::Chat, Module::Quiz, Module::Flashcards];

    pub fn label(&self) -> &'static str {
        match self {
            Module::Chat => "AI Chat",
            Module::Quiz => "Quiz",
            Module::Flashcards => "Flashcards",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Module::Chat => Module::Quiz,
            Module::Quiz => Module::Flashcards,
            Module::Flashcards => Module::Chat,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Module::Chat => Module::Flashcards,
            Module::Quiz => Module::Chat,
            Module::Flashcards => Module::Quiz,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug)]
pub enum AiRequest {
    GenerateQuiz { topic: String },
    GenerateFlashcards { topic: String },
    SendChat { message: String },
}

#[derive(Debug)]
pub enum AiResponse {
    Quiz(Result<Vec<QuizQuestion>, GenerationFailure>),
    Flashcards(Result<Vec<Flashcard>, GenerationFailure>),
    Chat(ChatEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_cycle() {
        let mut module = Module::default();
        assert_eq!(module, Module::Chat);
        for _ in 0..Module::ALL.len() {
            module = module.next();
        }
        assert_eq!(module, Module::Chat);
        assert_eq!(Module::Chat.prev(), Module::Flashcards);
    }

    #[test]
    fn test_theme_roundtrip() {
        assert_eq!(Theme::parse(Theme::Dark.as_str()), Some(Theme::Dark));
        assert_eq!(Theme::parse(Theme::Light.as_str()), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_saved_set_json_shape() {
        let set = SavedFlashcardSet {
            name: "Cells".to_string(),
            topic: "Biology".to_string(),
            flashcards: vec![Flashcard {
                term: "Mitochondria".to_string(),
                definition: "Powerhouse of the cell".to_string(),
            }],
        };
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["name"], "Cells");
        assert_eq!(json["flashcards"][0]["term"], "Mitochondria");
    }

    #[test]
    fn test_quiz_question_serializes_camel_case() {
        let q = QuizQuestion {
            question: "2+2?".to_string(),
            options: ["3", "4", "5", "6"].map(String::from),
            correct_answer: "4".to_string(),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["correctAnswer"], "4");
        assert!(q.offers("5"));
        assert!(!q.offers("7"));
    }
}
