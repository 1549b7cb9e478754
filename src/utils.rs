use chrono::{DateTime, Local, NaiveDate, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `s` to at most `max_width` columns, ending in "..." when cut.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Visual lines as ratatui's `Wrap { trim: true }` lays them out: trimmed
/// text plus the byte range of the source each line covers.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut line_start = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            lines.push((current_line.trim_end().to_string(), line_start, idx));
            current_line.clear();
            current_width = 0;
            line_start = idx + 1;
            continue;
        }

        let char_width = ch.width().unwrap_or(1);
        if current_width + char_width > max_width && current_width > 0 {
            lines.push((current_line.trim_end().to_string(), line_start, idx));
            current_line = ch.to_string();
            current_width = char_width;
            line_start = idx;
        } else {
            current_line.push(ch);
            current_width += char_width;
        }
    }

    if !current_line.is_empty() || text.ends_with('\n') {
        lines.push((current_line.trim_end().to_string(), line_start, text.len()));
    }

    lines
}

/// Screen (line, column) of a byte cursor inside wrapped text. Columns are
/// display widths, so wide characters count double.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 {
        return (0, 0);
    }

    let wrapped_lines = simulate_wrapped_lines(text, max_width);

    for (line_idx, (_, start, end)) in wrapped_lines.iter().enumerate() {
        if cursor_index >= *start && cursor_index <= *end {
            let col = text
                .get(*start..cursor_index)
                .map(|s| s.width())
                .unwrap_or(0);
            return (line_idx, col);
        }
    }

    match wrapped_lines.last() {
        Some((visible, _, _)) => (wrapped_lines.len() - 1, visible.width()),
        None => (0, 0),
    }
}

/// Wall-clock time of an entry in the local timezone, e.g. "08:05".
pub fn format_entry_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn format_day(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// Number of filled cells for a percentage bar of `width` cells.
pub fn filled_cells(percent: f64, width: usize) -> usize {
    if percent.is_nan() || percent <= 0.0 {
        return 0;
    }
    ((percent.min(100.0) / 100.0) * width as f64).round() as usize
}
