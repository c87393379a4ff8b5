use crate::chat::{ChatState, Transcript};
use crate::models::{ChatRole, Theme};
use crate::ui::layout::calculate_module_chunks;
use crate::ui::theme::Palette;
use crate::ui::draw_input_box;
use crate::utils::{calculate_max_scroll, estimate_text_height, render_markdown};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Rendered transcript lines, rebuilt only when the snapshot or theme changes.
#[derive(Default)]
pub struct ChatRenderCache {
    snapshot: Option<Transcript>,
    theme: Theme,
    lines: Vec<Line<'static>>,
}

impl ChatRenderCache {
    pub fn lines_for(&mut self, transcript: &Transcript, theme: Theme) -> &[Line<'static>] {
        let fresh = self
            .snapshot
            .as_ref()
            .is_some_and(|cached| cached.same_snapshot(transcript))
            && self.theme == theme;
        if !fresh {
            self.lines = build_transcript_lines(transcript, &Palette::for_theme(theme));
            self.snapshot = Some(transcript.clone());
            self.theme = theme;
        }
        &self.lines
    }
}

/// Markdown parsing happens here, so callers go through the cache.
fn build_transcript_lines(transcript: &Transcript, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for turn in transcript.turns() {
        match turn.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(palette.user).add_modifier(Modifier::BOLD),
                )));
                for line in turn.text.lines() {
                    lines.push(Line::from(format!("  {}", line)));
                }
            }
            ChatRole::Assistant => {
                // The empty placeholder is covered by the thinking indicator.
                if turn.text.is_empty() {
                    continue;
                }
                lines.push(Line::from(Span::styled(
                    "Study Buddy:",
                    Style::default()
                        .fg(palette.assistant)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in render_markdown(&turn.text) {
                    let mut spans: Vec<Span<'static>> = vec![Span::from("  ")];
                    spans.extend(line.spans);
                    lines.push(Line::from(spans));
                }
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

pub fn draw_chat(
    f: &mut Frame,
    area: Rect,
    chat: &mut ChatState,
    cache: &mut ChatRenderCache,
    theme: Theme,
) {
    let palette = Palette::for_theme(theme);
    let layout = calculate_module_chunks(area, 3);

    let header = Paragraph::new("AI Study Chat")
        .style(palette.title())
        .block(Block::default().borders(Borders::ALL).border_style(palette.border(false)));
    f.render_widget(header, layout.header_area);

    let transcript = chat.transcript();
    let mut message_lines: Vec<Line<'static>> = cache.lines_for(&transcript, theme).to_vec();

    let streaming_started = transcript.last().is_some_and(|t| !t.text.is_empty());
    if chat.is_pending() && !streaming_started {
        message_lines.push(Line::from(Span::styled(
            "Study Buddy is thinking...",
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let visible_height = layout.body_area.height.saturating_sub(2) as usize;
    let text_width = layout.body_area.width.saturating_sub(2) as usize;
    let content = Text::from(message_lines);
    let content_height = estimate_text_height(&content, text_width);
    // Word wrapping needs more rows than the character estimate.
    let buffered_height = content_height + content_height / 4;
    let max_scroll = calculate_max_scroll(buffered_height, visible_height);
    chat.max_scroll = max_scroll;

    let scroll = if chat.is_pending() {
        max_scroll
    } else {
        chat.scroll_y.min(max_scroll)
    };
    chat.scroll_y = scroll;

    let messages = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false)),
        );
    f.render_widget(messages, layout.body_area);

    let placeholder = if chat.is_ready() {
        "Ask me anything..."
    } else {
        "Connecting to the assistant..."
    };
    draw_input_box(
        f,
        layout.input_area,
        " Message ",
        &chat.input_buffer,
        chat.cursor_position,
        placeholder,
        !chat.is_pending() && chat.is_ready(),
        &palette,
    );

    let status = if chat.is_pending() {
        "Waiting for reply"
    } else {
        "Enter to send, ↑/↓ to scroll"
    };
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(palette.muted)),
        layout.status_area,
    );
}
