pub mod layout;
mod chat;
mod flashcards;
mod modal;
mod quiz;
mod sidebar;
pub mod theme;

pub use chat::{ChatRenderCache, draw_chat};
pub use flashcards::draw_flashcards;
pub use quiz::draw_quiz;

use crate::app::App;
use crate::models::Module;
use crate::utils::{byte_offset, calculate_wrapped_cursor_position};
use layout::calculate_app_chunks;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use theme::Palette;

/// Bordered text input. The terminal cursor is placed only when `active`.
#[allow(clippy::too_many_arguments)]
pub fn draw_input_box(
    f: &mut Frame,
    area: Rect,
    title: &str,
    buffer: &str,
    cursor: usize,
    placeholder: &str,
    active: bool,
    palette: &Palette,
) {
    if area.height == 0 {
        return;
    }

    let content = if buffer.is_empty() {
        Line::from(Span::styled(placeholder.to_string(), palette.hint()))
    } else {
        Line::from(Span::styled(buffer.to_string(), Style::default().fg(palette.text)))
    };

    let input = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(palette.border(active)),
    );
    f.render_widget(input, area);

    if active {
        let inner_width = area.width.saturating_sub(2) as usize;
        let (line, column) =
            calculate_wrapped_cursor_position(buffer, byte_offset(buffer, cursor), inner_width);
        let x = area.x + 1 + column as u16;
        let y = area.y + 1 + line as u16;
        if x < area.right().saturating_sub(1) && y < area.bottom().saturating_sub(1) {
            f.set_cursor_position(Position::new(x, y));
        }
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let palette = Palette::for_theme(app.theme);
    let area = f.area();
    f.render_widget(Block::default().style(palette.base()), area);

    let layout = calculate_app_chunks(area);
    sidebar::draw_sidebar(f, layout.sidebar_area, app.module, app.theme, &palette);

    match app.module {
        Module::Chat => draw_chat(
            f,
            layout.main_area,
            &mut app.chat,
            &mut app.chat_cache,
            app.theme,
        ),
        Module::Quiz => draw_quiz(f, layout.main_area, &app.quiz, app.theme),
        Module::Flashcards => draw_flashcards(f, layout.main_area, &app.flashcards, app.theme),
    }

    let help = Line::from(vec![
        Span::styled("Tab", palette.key()),
        Span::styled(" switch module  ", palette.hint()),
        Span::styled("Ctrl+T", palette.key()),
        Span::styled(" theme  ", palette.hint()),
        Span::styled("Ctrl+C", palette.key()),
        Span::styled(" quit", palette.hint()),
    ]);
    f.render_widget(Paragraph::new(help), layout.help_area);

    if let Some(modal) = &app.modal {
        modal::draw_modal(f, area, modal, &palette);
    }
}
