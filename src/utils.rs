pub mod markdown;

pub use markdown::render_markdown;

use ratatui::text::Text;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shorten `s` to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Byte offset of the `cursor`-th character, clamped to the end of `text`.
pub fn byte_offset(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

pub fn insert_at_cursor(buffer: &mut String, cursor: &mut usize, ch: char) {
    let idx = byte_offset(buffer, *cursor);
    buffer.insert(idx, ch);
    *cursor += 1;
}

pub fn delete_before_cursor(buffer: &mut String, cursor: &mut usize) {
    if *cursor == 0 {
        return;
    }
    let idx = byte_offset(buffer, *cursor - 1);
    buffer.remove(idx);
    *cursor -= 1;
}

pub fn move_cursor_left(buffer: &str, cursor: &mut usize) {
    *cursor = cursor.saturating_sub(1).min(buffer.chars().count());
}

pub fn move_cursor_right(buffer: &str, cursor: &mut usize) {
    if *cursor < buffer.chars().count() {
        *cursor += 1;
    }
}

/// Visual lines of `text` at `max_width`, as ratatui wraps with `trim: true`.
/// Each entry is (trimmed line, start byte, end byte).
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            lines.push((current.trim_end().to_string(), start, idx));
            current.clear();
            width = 0;
            start = idx + 1;
            continue;
        }

        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width && width > 0 {
            lines.push((current.trim_end().to_string(), start, idx));
            current = ch.to_string();
            width = ch_width;
            start = idx;
        } else {
            current.push(ch);
            width += ch_width;
        }
    }

    if !current.is_empty() || text.ends_with('\n') {
        lines.push((current.trim_end().to_string(), start, text.len()));
    }

    lines
}

/// (line, column) of the cursor at byte `cursor_index` once `text` is wrapped
/// to `max_width` columns.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 {
        return (0, 0);
    }

    let wrapped = simulate_wrapped_lines(text, max_width);

    for (line_idx, (_, start, end)) in wrapped.iter().enumerate() {
        if cursor_index >= *start && cursor_index <= *end {
            let col = text.get(*start..cursor_index).map(|s| s.width()).unwrap_or(0);
            return (line_idx, col);
        }
    }

    match wrapped.last() {
        Some((visible, _, _)) => (wrapped.len() - 1, visible.width()),
        None => (0, 0),
    }
}

/// Rough number of terminal rows `text` needs when wrapped to `width`.
pub fn estimate_text_height(text: &Text, width: usize) -> usize {
    if width == 0 {
        return text.lines.len();
    }
    text.lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

pub fn calculate_max_scroll(content_height: usize, visible_height: usize) -> u16 {
    content_height
        .saturating_sub(visible_height)
        .min(u16::MAX as usize) as u16
}
