//! Text utilities for TUI rendering.

use ratatui::text::Line;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal column width of `text`.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Wrap text to `width` columns, prefixing every produced line with `indent`.
///
/// Breaks at the last space that fits; words longer than the line are split.
/// Blank input lines are kept as bare indents.
pub fn wrap_text_indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    let room = width.saturating_sub(display_width(indent));
    if room == 0 {
        return text.lines().map(|line| format!("{}{}", indent, line)).collect();
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        let mut rest = line.trim_end();
        if rest.is_empty() {
            lines.push(indent.to_string());
            continue;
        }

        while !rest.is_empty() {
            if display_width(rest) <= room {
                lines.push(format!("{}{}", indent, rest));
                break;
            }

            // Byte offset just past the last char that fits.
            let mut fit = 0;
            let mut used = 0;
            for (idx, ch) in rest.char_indices() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(1);
                if used + w > room {
                    break;
                }
                used += w;
                fit = idx + ch.len_utf8();
            }
            // A single char wider than the room still has to go somewhere.
            if fit == 0 {
                fit = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
            }

            let split = match rest[..fit].rfind(' ') {
                Some(space) if space > 0 => space,
                _ => fit,
            };
            lines.push(format!("{}{}", indent, rest[..split].trim_end()));
            rest = rest[split..].trim_start_matches(' ');
        }
    }

    if lines.is_empty() {
        lines.push(indent.to_string());
    }

    lines
}

/// Truncate a string to fit within a given width, adding ellipsis if needed.
pub fn truncate(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width < 3 {
        return text.chars().take(max_width).collect();
    }

    let mut width = 0;
    let mut result = String::new();

    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width - 3 {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push_str("...");
    result
}

/// Format a duration in human-readable form.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

/// Unstyled text of a rendered line.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}
