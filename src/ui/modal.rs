use crate::app::Modal;
use crate::flashcards::{SAVE_PROMPT, delete_prompt};
use crate::ui::draw_input_box;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn modal_block(title: &str, palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(palette.border(true))
        .style(palette.base())
}

pub fn draw_modal(f: &mut Frame, area: Rect, modal: &Modal, palette: &Palette) {
    let popup = centered_rect(60, 30, area);
    f.render_widget(Clear, popup);

    match modal {
        Modal::SaveSet { input, cursor } => {
            let block = modal_block("Save Set", palette);
            let inner = block.inner(popup);
            f.render_widget(block, popup);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(2),
                    Constraint::Length(3),
                    Constraint::Min(0),
                ])
                .split(inner);
            f.render_widget(Paragraph::new(SAVE_PROMPT).wrap(Wrap { trim: true }), chunks[0]);
            draw_input_box(f, chunks[1], " Name ", input, *cursor, "", true, palette);
            f.render_widget(
                Paragraph::new(hint_line(&[("Enter", "Save"), ("Esc", "Cancel")], palette)),
                chunks[2],
            );
        }
        Modal::ConfirmDelete { name } => {
            let text = vec![
                Line::from(delete_prompt(name)),
                Line::from(""),
                hint_line(&[("y", "Delete"), ("n/Esc", "Keep")], palette),
            ];
            let paragraph = Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .block(modal_block("Delete Set", palette));
            f.render_widget(paragraph, popup);
        }
        Modal::Notice(message) => {
            let text = vec![
                Line::from(message.as_str()),
                Line::from(""),
                Line::from(Span::styled("Press any key", palette.hint())),
            ];
            let paragraph = Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .block(modal_block("Notice", palette));
            f.render_widget(paragraph, popup);
        }
    }
}

fn hint_line(pairs: &[(&str, &str)], palette: &Palette) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, action) in pairs {
        spans.push(Span::styled(key.to_string(), palette.key()));
        spans.push(Span::styled(format!(" {}  ", action), Style::default().fg(palette.muted)));
    }
    Line::from(spans)
}
