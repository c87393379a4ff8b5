use crate::models::{Module, Theme};
use crate::ui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

fn module_items(active: Module, palette: &Palette) -> Vec<ListItem<'static>> {
    Module::ALL
        .iter()
        .map(|module| {
            if *module == active {
                ListItem::new(format!("▶ {}", module.label())).style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                )
            } else {
                ListItem::new(format!("  {}", module.label())).style(Style::default().fg(palette.text))
            }
        })
        .collect()
}

pub fn draw_sidebar(f: &mut Frame, area: Rect, active: Module, theme: Theme, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let title = Paragraph::new("Study Buddy")
        .style(palette.title())
        .block(Block::default().borders(Borders::ALL).border_style(palette.border(false)));
    f.render_widget(title, chunks[0]);

    let modules = List::new(module_items(active, palette)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Modules ")
            .border_style(palette.border(true)),
    );
    f.render_widget(modules, chunks[1]);

    let theme_label = match theme {
        Theme::Dark => "Light mode",
        Theme::Light => "Dark mode",
    };
    let theme_entry = Paragraph::new(Line::from(vec![
        Span::styled("Ctrl+T ", palette.key()),
        Span::from(theme_label),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(palette.border(false)));
    f.render_widget(theme_entry, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tests::render_to_string;

    #[test]
    fn test_active_module_is_marked() {
        let palette = Palette::for_theme(Theme::Dark);
        let screen = render_to_string(30, 12, |f| {
            let area = f.area();
            draw_sidebar(f, area, Module::Quiz, Theme::Dark, &palette)
        });
        assert!(screen.contains("▶ Quiz"));
        assert!(screen.contains("  AI Chat"));
        assert!(screen.contains("Light mode"));
    }
}
