use crate::ai::provider::{GenerationProvider, OutputSchema, SchemaField};
use crate::error::{GenerationFailure, GenerationKind};
use crate::logger;
use crate::models::{Flashcard, QuizQuestion};
use serde::Deserialize;

pub const QUIZ_QUESTION_COUNT: usize = 5;
pub const QUIZ_OPTION_COUNT: usize = 4;
pub const FLASHCARD_COUNT: usize = 10;

/// Strip markdown fences and surrounding prose, keeping the outermost JSON array.
fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find('[')
        && let Some(end) = cleaned.rfind(']')
        && start < end
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

pub fn quiz_prompt(topic: &str) -> String {
    format!(
        "Generate a {}-question multiple-choice quiz about {}. Provide {} options for each question. Indicate the correct answer for each.",
        QUIZ_QUESTION_COUNT, topic, QUIZ_OPTION_COUNT
    )
}

pub fn flashcards_prompt(topic: &str) -> String {
    format!(
        "Generate {} flashcards for the topic: {}. Each flashcard should have a term and a concise definition.",
        FLASHCARD_COUNT, topic
    )
}

pub fn quiz_schema() -> OutputSchema {
    OutputSchema::array_of(vec![
        SchemaField::string("question", "The quiz question."),
        SchemaField::string_array(
            "options",
            QUIZ_OPTION_COUNT,
            "An array of 4 possible answers.",
        ),
        SchemaField::string(
            "correctAnswer",
            "The correct answer from the options array.",
        ),
    ])
}

pub fn flashcards_schema() -> OutputSchema {
    OutputSchema::array_of(vec![
        SchemaField::string(
            "term",
            "The term or question for the front of the flashcard.",
        ),
        SchemaField::string(
            "definition",
            "The definition or answer for the back of the flashcard.",
        ),
    ])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizQuestionRaw {
    question: String,
    options: Vec<String>,
    correct_answer: String,
}

impl QuizQuestionRaw {
    fn into_question(self, index: usize) -> Result<QuizQuestion, GenerationFailure> {
        let option_count = self.options.len();
        let options: [String; QUIZ_OPTION_COUNT] = self.options.try_into().map_err(|_| {
            GenerationFailure::shape(
                GenerationKind::Quiz,
                format!(
                    "question {} has {} options, expected {}",
                    index + 1,
                    option_count,
                    QUIZ_OPTION_COUNT
                ),
            )
        })?;

        if !options.contains(&self.correct_answer) {
            return Err(GenerationFailure::shape(
                GenerationKind::Quiz,
                format!(
                    "question {} names correct answer {:?} which is not one of its options",
                    index + 1,
                    self.correct_answer
                ),
            ));
        }

        Ok(QuizQuestion {
            question: self.question,
            options,
            correct_answer: self.correct_answer,
        })
    }
}

pub fn parse_quiz(response: &str) -> Result<Vec<QuizQuestion>, GenerationFailure> {
    let cleaned = clean_json_response(response);
    let raw: Vec<QuizQuestionRaw> = serde_json::from_str(&cleaned)
        .map_err(|e| GenerationFailure::new(GenerationKind::Quiz, e))?;

    if raw.len() != QUIZ_QUESTION_COUNT {
        return Err(GenerationFailure::shape(
            GenerationKind::Quiz,
            format!(
                "expected {} questions, got {}",
                QUIZ_QUESTION_COUNT,
                raw.len()
            ),
        ));
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, q)| q.into_question(i))
        .collect()
}

pub fn parse_flashcards(response: &str) -> Result<Vec<Flashcard>, GenerationFailure> {
    let cleaned = clean_json_response(response);
    let cards: Vec<Flashcard> = serde_json::from_str(&cleaned)
        .map_err(|e| GenerationFailure::new(GenerationKind::Flashcards, e))?;

    if cards.is_empty() {
        return Err(GenerationFailure::shape(
            GenerationKind::Flashcards,
            "response contained no flashcards",
        ));
    }
    if cards.len() != FLASHCARD_COUNT {
        logger::log(&format!(
            "Flashcard response had {} cards (asked for {})",
            cards.len(),
            FLASHCARD_COUNT
        ));
    }

    Ok(cards)
}

fn log_failure(failure: &GenerationFailure) {
    logger::log(&format!("Error generating {}: {}", failure.kind, failure.cause));
}

/// Ask the provider for a quiz on `topic`. The topic is forwarded verbatim.
pub async fn generate_quiz(
    provider: &dyn GenerationProvider,
    topic: &str,
) -> Result<Vec<QuizQuestion>, GenerationFailure> {
    logger::log(&format!("Requesting quiz for topic {:?}", topic));
    let response = provider
        .generate(&quiz_prompt(topic), &quiz_schema())
        .await
        .map_err(|e| GenerationFailure::new(GenerationKind::Quiz, e))
        .inspect_err(log_failure)?;

    logger::log(&format!("Raw quiz response: {}", response));
    parse_quiz(&response).inspect_err(log_failure)
}

/// Ask the provider for a flashcard set on `topic`.
pub async fn generate_flashcards(
    provider: &dyn GenerationProvider,
    topic: &str,
) -> Result<Vec<Flashcard>, GenerationFailure> {
    logger::log(&format!("Requesting flashcards for topic {:?}", topic));
    let response = provider
        .generate(&flashcards_prompt(topic), &flashcards_schema())
        .await
        .map_err(|e| GenerationFailure::new(GenerationKind::Flashcards, e))
        .inspect_err(log_failure)?;

    logger::log(&format!("Raw flashcard response: {}", response));
    parse_flashcards(&response).inspect_err(log_failure)
}
