use crate::flashcards::FlashcardSession;
use crate::models::Theme;
use crate::ui::draw_input_box;
use crate::ui::layout::calculate_module_chunks;
use crate::ui::theme::Palette;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn saved_set_items(session: &FlashcardSession, width: usize, palette: &Palette) -> Vec<ListItem<'static>> {
    if session.saved_sets().is_empty() {
        return vec![ListItem::new("No saved sets yet").style(palette.hint())];
    }

    session
        .saved_sets()
        .iter()
        .enumerate()
        .map(|(i, set)| {
            let label = truncate_string(
                &format!("{} ({} cards) - Topic: {}", set.name, set.flashcards.len(), set.topic),
                width,
            );
            let style = if i == session.focused_set {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(palette.text)
            };
            ListItem::new(label).style(style)
        })
        .collect()
}

fn draw_card(f: &mut Frame, area: Rect, session: &FlashcardSession, palette: &Palette) {
    let Some(card) = session.current_card() else {
        return;
    };

    let (label, body, colour) = if session.is_flipped() {
        ("Definition", card.definition.as_str(), palette.assistant)
    } else {
        ("Term", card.term.as_str(), palette.accent)
    };

    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(label.to_string(), palette.hint())));
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        body.to_string(),
        Style::default().fg(colour).add_modifier(Modifier::BOLD),
    )));

    let card_widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", session.position_label()))
                .border_style(palette.border(true)),
        );
    f.render_widget(card_widget, area);
}

pub fn draw_flashcards(f: &mut Frame, area: Rect, session: &FlashcardSession, theme: Theme) {
    let palette = Palette::for_theme(theme);
    let viewing = session.has_cards();
    let layout = calculate_module_chunks(area, if viewing { 0 } else { 3 });

    let title = if session.topic().is_empty() || session.is_loading() {
        "Flashcard Generator".to_string()
    } else {
        format!("Flashcards: {}", session.topic())
    };
    let header = Paragraph::new(title)
        .style(palette.title())
        .block(Block::default().borders(Borders::ALL).border_style(palette.border(false)));
    f.render_widget(header, layout.header_area);

    if viewing {
        draw_card(f, layout.body_area, session, &palette);
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(layout.body_area);

        let status = if session.is_loading() {
            Line::from(Span::styled(
                "Generating flashcards...",
                Style::default().fg(palette.warning).add_modifier(Modifier::ITALIC),
            ))
        } else if let Some(error) = session.error() {
            Line::from(Span::styled(error.to_string(), Style::default().fg(palette.error)))
        } else {
            Line::from(Span::styled(
                "Enter a topic to generate 10 flashcards.",
                palette.hint(),
            ))
        };
        f.render_widget(
            Paragraph::new(status)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(palette.border(false))),
            chunks[0],
        );

        let width = chunks[1].width.saturating_sub(2) as usize;
        let saved = List::new(saved_set_items(session, width, &palette)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" My Saved Sets ")
                .border_style(palette.border(false)),
        );
        f.render_widget(saved, chunks[1]);

        draw_input_box(
            f,
            layout.input_area,
            " Topic ",
            &session.input_buffer,
            session.cursor_position,
            "e.g. 'JavaScript Concepts'",
            !session.is_loading(),
            &palette,
        );
    }

    let help = if viewing {
        "Space flip  ←/→ prev/next  s save set  n create new set"
    } else {
        "Enter generate  ↑/↓ saved set  Ctrl+L load  Ctrl+D delete"
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(palette.muted)),
        layout.status_area,
    );
}
