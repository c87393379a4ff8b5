//! Quiz session: generation, answering, scoring and review.

use crate::error::GenerationFailure;
use crate::logger;
use crate::models::QuizQuestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    Idle,
    Generating,
    Active,
    Submitted,
}

/// How an option is shown once the quiz is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionClass {
    Correct,
    Wrong,
    Neutral,
}

/// Review classification for one option. The correct option always wins, so a
/// correctly answered question shows that option as `Correct`.
pub fn classify_option(question: &QuizQuestion, option: &str, answer: Option<&str>) -> OptionClass {
    if option == question.correct_answer {
        OptionClass::Correct
    } else if answer == Some(option) {
        OptionClass::Wrong
    } else {
        OptionClass::Neutral
    }
}

/// Number of answers equal to the question's correct answer.
pub fn score_answers(quiz: &[QuizQuestion], answers: &[Option<String>]) -> usize {
    quiz.iter()
        .zip(answers)
        .filter(|(q, a)| a.as_deref() == Some(q.correct_answer.as_str()))
        .count()
}

#[derive(Debug, Default)]
pub struct QuizSession {
    phase: QuizPhase,
    topic: String,
    quiz: Vec<QuizQuestion>,
    answers: Vec<Option<String>>,
    score: Option<usize>,
    error: Option<String>,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub focused_question: usize,
    pub focused_option: usize,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.quiz
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    /// Frozen score, available once submitted.
    pub fn score(&self) -> Option<usize> {
        self.score
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.phase == QuizPhase::Generating
    }

    /// Enter `Generating` for `topic`. Returns the topic to request, or `None`
    /// when the topic is blank or a request is already in flight.
    pub fn begin_generation(&mut self, topic: &str) -> Option<String> {
        if topic.trim().is_empty() || self.phase == QuizPhase::Generating {
            return None;
        }

        self.topic = topic.to_string();
        self.quiz.clear();
        self.answers.clear();
        self.score = None;
        self.error = None;
        self.focused_question = 0;
        self.focused_option = 0;
        self.phase = QuizPhase::Generating;

        Some(self.topic.clone())
    }

    /// Start generation for the topic typed into the input buffer.
    pub fn submit_topic(&mut self) -> Option<String> {
        let topic = self.input_buffer.clone();
        let requested = self.begin_generation(&topic)?;
        self.input_buffer.clear();
        self.cursor_position = 0;
        Some(requested)
    }

    pub fn complete_generation(&mut self, result: Result<Vec<QuizQuestion>, GenerationFailure>) {
        if self.phase != QuizPhase::Generating {
            logger::log("Ignoring quiz result received outside generation");
            return;
        }

        match result {
            Ok(quiz) => {
                self.answers = vec![None; quiz.len()];
                self.quiz = quiz;
                self.score = None;
                self.phase = QuizPhase::Active;
            }
            Err(failure) => {
                self.quiz.clear();
                self.answers.clear();
                self.error = Some(failure.to_string());
                self.phase = QuizPhase::Idle;
            }
        }
    }

    /// Record `option` as the answer to question `index`.
    pub fn select_answer(&mut self, index: usize, option: &str) {
        if self.phase != QuizPhase::Active {
            return;
        }
        let Some(question) = self.quiz.get(index) else {
            return;
        };
        if !question.offers(option) {
            return;
        }
        self.answers[index] = Some(option.to_string());
    }

    /// Freeze the score. Only valid while answering.
    pub fn submit(&mut self) -> Option<usize> {
        if self.phase != QuizPhase::Active {
            return None;
        }
        let score = score_answers(&self.quiz, &self.answers);
        self.score = Some(score);
        self.phase = QuizPhase::Submitted;
        logger::log(&format!("Quiz submitted: {}/{}", score, self.quiz.len()));
        Some(score)
    }

    /// Discard the current quiz and go back to topic entry.
    pub fn reset(&mut self) {
        if self.phase == QuizPhase::Generating {
            return;
        }
        self.phase = QuizPhase::Idle;
        self.topic.clear();
        self.quiz.clear();
        self.answers.clear();
        self.score = None;
        self.focused_question = 0;
        self.focused_option = 0;
    }

    pub fn classify(&self, index: usize, option: &str) -> OptionClass {
        match self.quiz.get(index) {
            Some(question) => classify_option(question, option, self.answer(index)),
            None => OptionClass::Neutral,
        }
    }

    pub fn focus_next_question(&mut self) {
        if self.focused_question + 1 < self.quiz.len() {
            self.focused_question += 1;
            self.focused_option = 0;
        }
    }

    pub fn focus_prev_question(&mut self) {
        if self.focused_question > 0 {
            self.focused_question -= 1;
            self.focused_option = 0;
        }
    }

    pub fn focus_next_option(&mut self) {
        if let Some(question) = self.quiz.get(self.focused_question) {
            self.focused_option = (self.focused_option + 1) % question.options.len();
        }
    }

    pub fn focus_prev_option(&mut self) {
        if let Some(question) = self.quiz.get(self.focused_question) {
            let len = question.options.len();
            self.focused_option = (self.focused_option + len - 1) % len;
        }
    }

    /// Answer the focused question with the focused option.
    pub fn select_focused(&mut self) {
        let Some(option) = self
            .quiz
            .get(self.focused_question)
            .and_then(|q| q.options.get(self.focused_option))
            .cloned()
        else {
            return;
        };
        self.select_answer(self.focused_question, &option);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationKind, ProviderError};

    fn question(text: &str, options: [&str; 4], correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: options.map(String::from),
            correct_answer: correct.to_string(),
        }
    }

    fn sample_quiz() -> Vec<QuizQuestion> {
        vec![
            question("Capital of France?", ["Paris", "Rome", "Madrid", "Berlin"], "Paris"),
            question("2 + 2?", ["3", "4", "5", "6"], "4"),
            question("Colour of the sky?", ["Red", "Green", "Blue", "Yellow"], "Blue"),
        ]
    }

    fn active_session() -> QuizSession {
        let mut session = QuizSession::new();
        session.begin_generation("general knowledge").unwrap();
        session.complete_generation(Ok(sample_quiz()));
        session
    }

    #[test]
    fn test_begin_generation_requires_topic() {
        let mut session = QuizSession::new();
        assert!(session.begin_generation("   ").is_none());
        assert_eq!(session.phase(), QuizPhase::Idle);

        assert_eq!(session.begin_generation("Rust").as_deref(), Some("Rust"));
        assert_eq!(session.phase(), QuizPhase::Generating);
        assert!(session.begin_generation("Go").is_none());
        assert_eq!(session.topic(), "Rust");
    }

    #[test]
    fn test_submit_topic_clears_input() {
        let mut session = QuizSession::new();
        session.input_buffer = "Photosynthesis".to_string();
        session.cursor_position = 14;
        assert_eq!(session.submit_topic().as_deref(), Some("Photosynthesis"));
        assert!(session.input_buffer.is_empty());
        assert_eq!(session.cursor_position, 0);
    }

    #[test]
    fn test_successful_generation_activates_quiz() {
        let session = active_session();
        assert_eq!(session.phase(), QuizPhase::Active);
        assert_eq!(session.questions().len(), 3);
        assert_eq!(session.answers(), &[None, None, None]);
        assert!(session.score().is_none());
    }

    #[test]
    fn test_failed_generation_returns_to_idle_with_message() {
        let mut session = QuizSession::new();
        session.begin_generation("nonsense").unwrap();
        session.complete_generation(Err(GenerationFailure::new(
            GenerationKind::Quiz,
            ProviderError::EmptyResponse,
        )));

        assert_eq!(session.phase(), QuizPhase::Idle);
        assert!(session.questions().is_empty());
        assert_eq!(
            session.error(),
            Some("Failed to generate quiz. Please check the topic and try again.")
        );

        session.begin_generation("history").unwrap();
        assert!(session.error().is_none());
    }

    #[test]
    fn test_completion_outside_generating_is_ignored() {
        let mut session = active_session();
        session.select_answer(0, "Paris");
        session.complete_generation(Ok(vec![]));
        assert_eq!(session.questions().len(), 3);
        assert_eq!(session.answer(0), Some("Paris"));
    }

    #[test]
    fn test_select_answer_overwrites_single_index() {
        let mut session = active_session();
        session.select_answer(1, "3");
        session.select_answer(1, "4");
        assert_eq!(session.answers(), &[None, Some("4".to_string()), None]);
    }

    #[test]
    fn test_select_answer_rejects_invalid_input() {
        let mut session = active_session();
        session.select_answer(7, "Paris");
        session.select_answer(0, "Lyon");
        assert_eq!(session.answers(), &[None, None, None]);

        let mut idle = QuizSession::new();
        idle.select_answer(0, "Paris");
        assert!(idle.answers().is_empty());
    }

    #[test]
    fn test_scoring_counts_exact_matches() {
        let mut session = active_session();
        session.select_answer(0, "Paris");
        session.select_answer(1, "5");
        session.select_answer(2, "Blue");

        assert_eq!(session.submit(), Some(2));
        assert_eq!(session.phase(), QuizPhase::Submitted);
        assert_eq!(session.score(), Some(2));
    }

    #[test]
    fn test_score_is_frozen_after_submit() {
        let mut session = active_session();
        session.select_answer(0, "Paris");
        session.submit();

        session.select_answer(1, "4");
        assert_eq!(session.answer(1), None);
        assert_eq!(session.submit(), None);
        assert_eq!(session.score(), Some(1));
    }

    #[test]
    fn test_unanswered_quiz_scores_zero() {
        let mut session = active_session();
        assert_eq!(session.submit(), Some(0));
    }

    #[test]
    fn test_classify_option() {
        let q = question("2 + 2?", ["3", "4", "5", "6"], "4");

        assert_eq!(classify_option(&q, "4", Some("4")), OptionClass::Correct);
        assert_eq!(classify_option(&q, "4", Some("5")), OptionClass::Correct);
        assert_eq!(classify_option(&q, "5", Some("5")), OptionClass::Wrong);
        assert_eq!(classify_option(&q, "3", Some("5")), OptionClass::Neutral);
        assert_eq!(classify_option(&q, "3", None), OptionClass::Neutral);
        assert_eq!(classify_option(&q, "4", None), OptionClass::Correct);
        // Pure: same inputs, same output.
        assert_eq!(classify_option(&q, "5", Some("5")), classify_option(&q, "5", Some("5")));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = active_session();
        session.select_answer(0, "Paris");
        session.submit();
        session.reset();

        assert_eq!(session.phase(), QuizPhase::Idle);
        assert!(session.topic().is_empty());
        assert!(session.questions().is_empty());
        assert!(session.answers().is_empty());
        assert!(session.score().is_none());
    }

    #[test]
    fn test_reset_ignored_while_generating() {
        let mut session = QuizSession::new();
        session.begin_generation("Rust").unwrap();
        session.reset();
        assert!(session.is_generating());
    }

    #[test]
    fn test_focus_navigation_and_selection() {
        let mut session = active_session();
        session.focus_prev_option();
        assert_eq!(session.focused_option, 3);
        session.focus_next_option();
        assert_eq!(session.focused_option, 0);

        session.focus_next_question();
        session.focus_next_option();
        session.select_focused();
        assert_eq!(session.answer(1), Some("4"));

        session.focus_next_question();
        session.focus_next_question();
        assert_eq!(session.focused_question, 2);
        session.focus_prev_question();
        assert_eq!(session.focused_question, 1);
        assert_eq!(session.focused_option, 0);
    }

    #[test]
    fn test_score_answers_with_example() {
        let quiz = vec![
            question("a", ["Paris", "x", "y", "z"], "Paris"),
            question("b", ["4", "5", "y", "z"], "4"),
            question("c", ["Blue", "x", "y", "z"], "Blue"),
        ];
        let answers = vec![
            Some("Paris".to_string()),
            Some("5".to_string()),
            Some("Blue".to_string()),
        ];
        assert_eq!(score_answers(&quiz, &answers), 2);
    }
}
