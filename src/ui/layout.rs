use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const SIDEBAR_WIDTH: u16 = 22;

pub struct AppLayout {
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub help_area: Rect,
}

/// Areas inside a module view: title, body, input box and status line.
pub struct ModuleLayout {
    pub header_area: Rect,
    pub body_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
}

pub fn calculate_app_chunks(area: Rect) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    AppLayout {
        sidebar_area: columns[0],
        main_area: columns[1],
        help_area: rows[1],
    }
}

pub fn calculate_module_chunks(area: Rect, input_height: u16) -> ModuleLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(area);

    ModuleLayout {
        header_area: chunks[0],
        body_area: chunks[1],
        input_area: chunks[2],
        status_area: chunks[3],
    }
}

/// A rectangle of the given percentages centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout() {
        let layout = calculate_app_chunks(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.sidebar_area.width, SIDEBAR_WIDTH);
        assert_eq!(layout.main_area.width, 100 - SIDEBAR_WIDTH);
        assert_eq!(layout.help_area.height, 1);
        assert_eq!(layout.main_area.height, 39);
    }

    #[test]
    fn test_module_layout() {
        let layout = calculate_module_chunks(Rect::new(0, 0, 80, 30), 3);
        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.body_area.height, 23);
    }

    #[test]
    fn test_module_layout_without_input() {
        let layout = calculate_module_chunks(Rect::new(0, 0, 80, 30), 0);
        assert_eq!(layout.input_area.height, 0);
        assert_eq!(layout.body_area.height, 26);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert!(popup.x >= 20 && popup.y >= 15);
    }
}
