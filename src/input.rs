use crate::app::{App, Modal};
use crate::models::Module;
use crate::quiz::QuizPhase;
use crate::utils::{delete_before_cursor, insert_at_cursor, move_cursor_left, move_cursor_right};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Apply one key press to the application.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.modal.is_some() {
        handle_modal_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Tab => {
            app.module = app.module.next();
            return;
        }
        KeyCode::BackTab => {
            app.module = app.module.prev();
            return;
        }
        KeyCode::Char('t') if ctrl => {
            app.toggle_theme();
            return;
        }
        _ => {}
    }

    match app.module {
        Module::Chat => handle_chat_key(app, key),
        Module::Quiz => handle_quiz_key(app, key),
        Module::Flashcards => handle_flashcards_key(app, key),
    }
}

/// Shared single-line editing. Returns true when the key was consumed.
fn edit_text(buffer: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    match key.code {
        KeyCode::Char(c) => insert_at_cursor(buffer, cursor, c),
        KeyCode::Backspace => delete_before_cursor(buffer, cursor),
        KeyCode::Left => move_cursor_left(buffer, cursor),
        KeyCode::Right => move_cursor_right(buffer, cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.chars().count(),
        _ => return false,
    }
    true
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.send_chat(),
        KeyCode::Up => app.chat.scroll_y = app.chat.scroll_y.saturating_sub(1),
        KeyCode::Down => app.chat.scroll_y = (app.chat.scroll_y + 1).min(app.chat.max_scroll),
        KeyCode::PageUp => app.chat.scroll_y = app.chat.scroll_y.saturating_sub(10),
        KeyCode::PageDown => {
            app.chat.scroll_y = app.chat.scroll_y.saturating_add(10).min(app.chat.max_scroll)
        }
        _ => {
            let chat = &mut app.chat;
            edit_text(&mut chat.input_buffer, &mut chat.cursor_position, key);
        }
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match app.quiz.phase() {
        QuizPhase::Idle | QuizPhase::Generating => {
            if key.code == KeyCode::Enter {
                app.request_quiz();
            } else {
                let quiz = &mut app.quiz;
                edit_text(&mut quiz.input_buffer, &mut quiz.cursor_position, key);
            }
        }
        QuizPhase::Active => match key.code {
            KeyCode::Up => app.quiz.focus_prev_question(),
            KeyCode::Down => app.quiz.focus_next_question(),
            KeyCode::Left => app.quiz.focus_prev_option(),
            KeyCode::Right => app.quiz.focus_next_option(),
            KeyCode::Enter | KeyCode::Char(' ') => app.quiz.select_focused(),
            KeyCode::Char('s') => {
                app.quiz.submit();
            }
            _ => {}
        },
        QuizPhase::Submitted => match key.code {
            KeyCode::Up => app.quiz.focus_prev_question(),
            KeyCode::Down => app.quiz.focus_next_question(),
            KeyCode::Char('n') => app.quiz.reset(),
            _ => {}
        },
    }
}

fn handle_flashcards_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if app.flashcards.has_cards() {
        match key.code {
            KeyCode::Left => app.flashcards.prev(),
            KeyCode::Right => app.flashcards.next(),
            KeyCode::Enter | KeyCode::Char(' ') => app.flashcards.flip(),
            KeyCode::Char('s') => {
                app.modal = Some(Modal::SaveSet {
                    input: String::new(),
                    cursor: 0,
                })
            }
            KeyCode::Char('n') => app.flashcards.reset(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Enter => app.request_flashcards(),
        KeyCode::Up => app.flashcards.focus_prev_set(),
        KeyCode::Down => app.flashcards.focus_next_set(),
        KeyCode::Char('l') if ctrl => {
            if let Some(name) = app.flashcards.focused_set_name().map(str::to_string) {
                app.flashcards.load_set(&name);
            }
        }
        KeyCode::Char('d') if ctrl => {
            if let Some(name) = app.flashcards.focused_set_name().map(str::to_string) {
                app.modal = Some(Modal::ConfirmDelete { name });
            }
        }
        _ => {
            let cards = &mut app.flashcards;
            edit_text(&mut cards.input_buffer, &mut cards.cursor_position, key);
        }
    }
}

fn handle_modal_key(app: &mut App, key: KeyEvent) {
    let Some(modal) = app.modal.as_mut() else {
        return;
    };

    match modal {
        Modal::SaveSet { input, cursor } => match key.code {
            KeyCode::Enter => {
                let name = input.clone();
                app.save_flashcards(Some(name));
            }
            KeyCode::Esc => app.save_flashcards(None),
            _ => {
                edit_text(input, cursor, key);
            }
        },
        Modal::ConfirmDelete { name } => {
            let name = name.clone();
            match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.delete_flashcards(&name, true)
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                    app.delete_flashcards(&name, false)
                }
                _ => {}
            }
        }
        Modal::Notice(_) => app.modal = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::db::MemoryStore;
    use crate::models::{AiRequest, AiResponse, Flashcard, QuizQuestion, Theme};
    use crossbeam_channel::Receiver;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    fn test_app() -> (App, Receiver<AiRequest>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::new(Box::new(MemoryStore::new()), tx);
        app.chat.attach_session();
        (app, rx)
    }

    fn quiz() -> Vec<QuizQuestion> {
        (0..5)
            .map(|i| QuizQuestion {
                question: format!("Q{}", i),
                options: ["a", "b", "c", "d"].map(String::from),
                correct_answer: "b".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_ctrl_c_quits_even_with_modal() {
        let (mut app, _rx) = test_app();
        app.modal = Some(Modal::Notice("hi".to_string()));
        handle_key(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_cycles_modules() {
        let (mut app, _rx) = test_app();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.module, Module::Quiz);
        handle_key(&mut app, press(KeyCode::BackTab));
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.module, Module::Flashcards);
    }

    #[test]
    fn test_ctrl_t_toggles_theme() {
        let (mut app, _rx) = test_app();
        handle_key(&mut app, ctrl('t'));
        assert_eq!(app.theme, Theme::Light);
    }

    #[test]
    fn test_can_type_t_and_c_in_chat() {
        let (mut app, _rx) = test_app();
        type_text(&mut app, "tc");
        assert_eq!(app.chat.input_buffer, "tc");
        assert_eq!(app.theme, Theme::Dark);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_chat_enter_sends_message() {
        let (mut app, rx) = test_app();
        type_text(&mut app, "What is DNA?");
        handle_key(&mut app, press(KeyCode::Enter));

        assert!(app.chat.is_pending());
        assert!(matches!(rx.try_recv(), Ok(AiRequest::SendChat { message }) if message == "What is DNA?"));

        type_text(&mut app, "more");
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(rx.try_recv().is_err());
        assert_eq!(app.chat.input_buffer, "more");
    }

    #[test]
    fn test_chat_cursor_editing() {
        let (mut app, _rx) = test_app();
        type_text(&mut app, "Helo");
        handle_key(&mut app, press(KeyCode::Left));
        type_text(&mut app, "l");
        assert_eq!(app.chat.input_buffer, "Hello");
        handle_key(&mut app, press(KeyCode::End));
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.chat.input_buffer, "Hell");
        assert_eq!(app.chat.cursor_position, 4);
    }

    #[test]
    fn test_chat_scroll_is_bounded() {
        let (mut app, _rx) = test_app();
        app.chat.max_scroll = 3;
        for _ in 0..5 {
            handle_key(&mut app, press(KeyCode::Down));
        }
        assert_eq!(app.chat.scroll_y, 3);
        handle_key(&mut app, press(KeyCode::PageUp));
        assert_eq!(app.chat.scroll_y, 0);
    }

    #[test]
    fn test_quiz_flow_by_keys() {
        let (mut app, rx) = test_app();
        app.module = Module::Quiz;
        type_text(&mut app, "letters");
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(matches!(rx.try_recv(), Ok(AiRequest::GenerateQuiz { topic }) if topic == "letters"));

        app.apply_response(AiResponse::Quiz(Ok(quiz())));
        handle_key(&mut app, press(KeyCode::Right));
        handle_key(&mut app, press(KeyCode::Enter));
        handle_key(&mut app, press(KeyCode::Down));
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert_eq!(app.quiz.answer(0), Some("b"));
        assert_eq!(app.quiz.answer(1), Some("a"));

        handle_key(&mut app, press(KeyCode::Char('s')));
        assert_eq!(app.quiz.score(), Some(1));

        handle_key(&mut app, press(KeyCode::Char('n')));
        assert_eq!(app.quiz.phase(), QuizPhase::Idle);
    }

    #[test]
    fn test_flashcard_viewer_keys() {
        let (mut app, _rx) = test_app();
        app.module = Module::Flashcards;
        type_text(&mut app, "cells");
        handle_key(&mut app, press(KeyCode::Enter));
        app.apply_response(AiResponse::Flashcards(Ok(vec![
            Flashcard {
                term: "A".to_string(),
                definition: "1".to_string(),
            },
            Flashcard {
                term: "B".to_string(),
                definition: "2".to_string(),
            },
        ])));

        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert!(app.flashcards.is_flipped());
        handle_key(&mut app, press(KeyCode::Right));
        assert_eq!(app.flashcards.current_index(), 1);
        assert!(!app.flashcards.is_flipped());

        handle_key(&mut app, press(KeyCode::Char('s')));
        type_text(&mut app, "Cells");
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(matches!(app.modal, Some(Modal::Notice(_))));
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert!(app.modal.is_none());
        assert_eq!(app.flashcards.saved_sets().len(), 1);

        handle_key(&mut app, press(KeyCode::Char('n')));
        assert!(!app.flashcards.has_cards());

        handle_key(&mut app, ctrl('l'));
        assert_eq!(app.flashcards.cards().len(), 2);
        handle_key(&mut app, press(KeyCode::Char('n')));

        handle_key(&mut app, ctrl('d'));
        assert_eq!(
            app.modal,
            Some(Modal::ConfirmDelete {
                name: "Cells".to_string()
            })
        );
        handle_key(&mut app, press(KeyCode::Char('n')));
        assert_eq!(app.flashcards.saved_sets().len(), 1);

        handle_key(&mut app, ctrl('d'));
        handle_key(&mut app, press(KeyCode::Char('y')));
        assert!(app.flashcards.saved_sets().is_empty());
    }

    #[test]
    fn test_modal_blocks_module_switch() {
        let (mut app, _rx) = test_app();
        app.modal = Some(Modal::Notice("Saved".to_string()));
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.module, Module::Chat);
        assert!(app.modal.is_none());
    }
}
