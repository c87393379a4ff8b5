use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

lazy_static::lazy_static! {
    static ref NUMBERED: Regex = Regex::new(r"^(\d+)[.)]\s+(.*)$").expect("numbered list pattern");
    static ref INLINE: Regex =
        Regex::new(r"\*\*(?P<bold>.+?)\*\*|\*(?P<italic>[^*]+?)\*|`(?P<code>[^`]+)`")
            .expect("inline pattern");
}

fn heading_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

fn code_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Render assistant markdown into styled lines.
///
/// Handles headings, bullet and numbered lists, fenced code blocks, block
/// quotes, pipe tables and inline bold / italic / code. Anything else is
/// passed through as plain text.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let trimmed = raw.trim();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            i += 1;
            continue;
        }
        if in_fence {
            out.push(Line::from(Span::styled(format!("    {}", raw), code_style())));
            i += 1;
            continue;
        }

        if is_table_row(raw) && lines.get(i + 1).is_some_and(|next| is_table_separator(next)) {
            let header = split_cells(raw);
            i += 2;
            let mut rows = Vec::new();
            while let Some(row) = lines.get(i).filter(|l| is_table_row(l) && !is_table_separator(l)) {
                rows.push(split_cells(row));
                i += 1;
            }
            push_table(&header, &rows, &mut out);
            continue;
        }

        out.push(render_line(raw, trimmed));
        i += 1;
    }

    out
}

fn render_line(raw: &str, trimmed: &str) -> Line<'static> {
    let heading = trimmed
        .strip_prefix("### ")
        .or_else(|| trimmed.strip_prefix("## "))
        .or_else(|| trimmed.strip_prefix("# "));
    if let Some(heading) = heading {
        return Line::from(Span::styled(heading.to_string(), heading_style()));
    }

    if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return prefixed("  • ".to_string(), item);
    }

    if let Some(caps) = NUMBERED.captures(trimmed)
        && let (Some(num), Some(item)) = (caps.get(1), caps.get(2))
    {
        return prefixed(format!("  {}. ", num.as_str()), item.as_str());
    }

    if let Some(quote) = trimmed.strip_prefix("> ") {
        let mut line = prefixed("  │ ".to_string(), quote);
        line.style = Style::default().add_modifier(Modifier::ITALIC);
        return line;
    }

    if trimmed.is_empty() {
        Line::from("")
    } else {
        Line::from(parse_inline(raw))
    }
}

fn prefixed(prefix: String, body: &str) -> Line<'static> {
    let mut spans = vec![Span::from(prefix)];
    spans.extend(parse_inline(body));
    Line::from(spans)
}

/// Split `text` into plain and styled spans for **bold**, *italic* and `code`.
fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }

        let styled = if let Some(m) = caps.name("bold") {
            Span::styled(m.as_str().to_string(), Style::default().add_modifier(Modifier::BOLD))
        } else if let Some(m) = caps.name("italic") {
            Span::styled(m.as_str().to_string(), Style::default().add_modifier(Modifier::ITALIC))
        } else if let Some(m) = caps.name("code") {
            Span::styled(m.as_str().to_string(), code_style())
        } else {
            Span::from(whole.as_str().to_string())
        };
        spans.push(styled);
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::from(text[last..].to_string()));
    }
    if spans.is_empty() {
        spans.push(Span::from(text.to_string()));
    }

    spans
}

fn is_table_row(line: &str) -> bool {
    line.trim().contains('|')
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|') && trimmed.contains('-')
        && trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Tables become one "Header: value" block per row so they wrap in narrow panes.
fn push_table(header: &[String], rows: &[Vec<String>], out: &mut Vec<Line<'static>>) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    if rows.is_empty() {
        out.push(Line::from(Span::styled(header.join(" │ "), bold)));
        return;
    }

    for (n, row) in rows.iter().enumerate() {
        if n > 0 {
            out.push(Line::from(""));
        }
        for (col, cell) in row.iter().enumerate() {
            let name = header.get(col).map(String::as_str).unwrap_or("?");
            let mut spans = vec![Span::styled(format!("{}: ", name), bold)];
            spans.extend(parse_inline(cell));
            out.push(Line::from(spans));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(lines: &[Line]) -> String {
        lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_plain_text_passes_through() {
        let result = render_markdown("Mitochondria make ATP");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_string(), "Mitochondria make ATP");
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let result = render_markdown("Line 1\n\nLine 2");
        assert_eq!(result.len(), 3);
        assert_eq!(result[1].to_string(), "");
    }

    #[test]
    fn test_inline_styles() {
        let result = render_markdown("Water is **polar** and *cohesive*, see `H2O`");
        let spans = &result[0].spans;
        assert_eq!(spans[0].content, "Water is ");
        assert_eq!(spans[1].content, "polar");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "cohesive");
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(spans.last().unwrap().content, "H2O");
    }

    #[test]
    fn test_single_bold_span() {
        let result = render_markdown("**bold**");
        assert_eq!(result[0].spans.len(), 1);
        assert!(result[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_headings() {
        for input in ["# Cells", "## Cells", "### Cells"] {
            let result = render_markdown(input);
            assert_eq!(result[0].spans[0].content, "Cells");
            assert!(result[0].spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
        }
    }

    #[test]
    fn test_lists() {
        let result = render_markdown("- Nucleus\n* Ribosome\n1. Prophase\n2) Metaphase");
        assert_eq!(result.len(), 4);
        assert!(result[0].to_string().starts_with("  • Nucleus"));
        assert!(result[1].to_string().contains("Ribosome"));
        assert_eq!(result[2].to_string(), "  1. Prophase");
        assert_eq!(result[3].to_string(), "  2. Metaphase");
    }

    #[test]
    fn test_code_fence_is_not_parsed() {
        let result = render_markdown("```\nlet **x** = 1;\n```\nafter");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].to_string(), "    let **x** = 1;");
        assert_eq!(result[1].to_string(), "after");
    }

    #[test]
    fn test_block_quote() {
        let result = render_markdown("> To be or not to be");
        assert!(result[0].to_string().contains("To be or not to be"));
        assert!(result[0].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_table_rows_become_labelled_blocks() {
        let result = render_markdown("| Organelle | Role |\n|---|:---:|\n| Nucleus | DNA |\n| Ribosome | Protein |");
        let text = joined(&result);
        assert!(text.contains("Organelle: Nucleus"));
        assert!(text.contains("Role: Protein"));
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_header_only_table() {
        let result = render_markdown("| A | B |\n|---|---|");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_string(), "A │ B");
    }

    #[test]
    fn test_table_separator_detection() {
        assert!(is_table_separator("| --- | :---: |"));
        assert!(!is_table_separator("| A | B |"));
        assert!(!is_table_separator("|  |"));
        assert_eq!(split_cells("| Hello | World |"), vec!["Hello", "World"]);
    }
}
