use crate::models::Theme;
use crate::quiz::{OptionClass, QuizPhase, QuizSession};
use crate::ui::draw_input_box;
use crate::ui::layout::calculate_module_chunks;
use crate::ui::theme::Palette;
use crate::utils::{calculate_max_scroll, estimate_text_height};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

fn option_style(class: OptionClass, palette: &Palette) -> Style {
    match class {
        OptionClass::Correct => Style::default()
            .fg(palette.success)
            .add_modifier(Modifier::BOLD),
        OptionClass::Wrong => Style::default()
            .fg(palette.error)
            .add_modifier(Modifier::CROSSED_OUT),
        OptionClass::Neutral => Style::default().fg(palette.muted),
    }
}

/// Question list for answering (no classification) or review.
fn question_lines(session: &QuizSession, palette: &Palette) -> (Text<'static>, usize) {
    let reviewing = session.phase() == QuizPhase::Submitted;
    let mut text = Text::default();
    let mut focus_line = 0;

    for (index, question) in session.questions().iter().enumerate() {
        let focused = index == session.focused_question;
        if focused {
            focus_line = text.lines.len();
        }
        let marker = if focused { "▶ " } else { "  " };
        text.push_line(Line::from(Span::styled(
            format!("{}{}. {}", marker, index + 1, question.question),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        for (opt_index, option) in question.options.iter().enumerate() {
            let selected = session.answer(index) == Some(option.as_str());
            let bullet = if selected { "●" } else { "○" };
            let label = format!("    {} {}) {}", bullet, OPTION_LABELS[opt_index], option);

            let style = if reviewing {
                option_style(session.classify(index, option), palette)
            } else if focused && opt_index == session.focused_option {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::REVERSED)
            } else if selected {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.text)
            };
            text.push_line(Line::from(Span::styled(label, style)));
        }
        text.push_line(Line::from(""));
    }

    (text, focus_line)
}

/// Question list with the score on top once submitted. The returned line
/// index still points at the focused question.
fn body_lines(session: &QuizSession, palette: &Palette) -> (Text<'static>, usize) {
    let (mut text, mut focus_line) = question_lines(session, palette);
    if let Some(score) = session.score() {
        let header = [
            Line::from(Span::styled(
                format!("You scored {} out of {}!", score, session.questions().len()),
                Style::default()
                    .fg(palette.success)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        focus_line += header.len();
        text.lines.splice(0..0, header);
    }
    (text, focus_line)
}

pub fn draw_quiz(f: &mut Frame, area: Rect, session: &QuizSession, theme: Theme) {
    let palette = Palette::for_theme(theme);
    let taking_topic = matches!(session.phase(), QuizPhase::Idle | QuizPhase::Generating);
    let layout = calculate_module_chunks(area, if taking_topic { 3 } else { 0 });

    let title = if session.topic().is_empty() {
        "Quiz Generator".to_string()
    } else {
        format!("Quiz: {}", session.topic())
    };
    let header = Paragraph::new(title)
        .style(palette.title())
        .block(Block::default().borders(Borders::ALL).border_style(palette.border(false)));
    f.render_widget(header, layout.header_area);

    let body_block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(!taking_topic));

    match session.phase() {
        QuizPhase::Idle => {
            let mut text = Text::from(Line::from(Span::styled(
                "Enter a topic to generate a 5-question multiple-choice quiz.",
                palette.hint(),
            )));
            if let Some(error) = session.error() {
                text.push_line(Line::from(""));
                text.push_line(Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(palette.error),
                )));
            }
            f.render_widget(
                Paragraph::new(text).wrap(Wrap { trim: true }).block(body_block),
                layout.body_area,
            );
        }
        QuizPhase::Generating => {
            let waiting = Paragraph::new(Span::styled(
                "Generating quiz...",
                Style::default().fg(palette.warning).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .block(body_block);
            f.render_widget(waiting, layout.body_area);
        }
        QuizPhase::Active | QuizPhase::Submitted => {
            let (text, focus_line) = body_lines(session, &palette);

            let visible = layout.body_area.height.saturating_sub(2) as usize;
            let width = layout.body_area.width.saturating_sub(2) as usize;
            let max_scroll = calculate_max_scroll(estimate_text_height(&text, width), visible);
            let scroll = (focus_line as u16).min(max_scroll);

            f.render_widget(
                Paragraph::new(text)
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0))
                    .block(body_block),
                layout.body_area,
            );
        }
    }

    if taking_topic {
        draw_input_box(
            f,
            layout.input_area,
            " Topic ",
            &session.input_buffer,
            session.cursor_position,
            "e.g. 'The Roman Empire'",
            !session.is_generating(),
            &palette,
        );
    }

    let help = match session.phase() {
        QuizPhase::Idle | QuizPhase::Generating => "Enter generate quiz",
        QuizPhase::Active => "↑/↓ question  ←/→ option  Enter select  s submit",
        QuizPhase::Submitted => "↑/↓ review  n create another quiz",
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(palette.muted)),
        layout.status_area,
    );
}
