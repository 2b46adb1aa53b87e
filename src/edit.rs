//! Text edits behind the editor toolbar. Positions are byte offsets into the
//! markdown and are snapped down to the nearest char boundary.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::MAX_HEADING_LEVEL;

static HEADING_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*").unwrap());

/// Markdown after an edit plus where the editor selection goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Turns the line holding `cursor` into a heading of `level` (clamped to
/// 1..=6), replacing any heading marker it already has. The cursor lands at
/// the end of the line.
pub fn apply_heading(markdown: &str, cursor: usize, level: u8) -> Edit {
    let cursor = floor_boundary(markdown, cursor);
    let line_start = markdown[..cursor].rfind('\n').map_or(0, |idx| idx + 1);
    let line_end = markdown[line_start..]
        .find('\n')
        .map_or(markdown.len(), |idx| line_start + idx);
    let line = &markdown[line_start..line_end];
    let content = HEADING_MARKER_RE.replace(line, "");
    let hashes = "#".repeat(level.clamp(1, MAX_HEADING_LEVEL) as usize);
    let new_line = format!("{hashes} {content}");

    let mut text = String::with_capacity(markdown.len() + new_line.len());
    text.push_str(&markdown[..line_start]);
    text.push_str(&new_line);
    text.push_str(&markdown[line_end..]);
    let caret = line_start + new_line.len();
    Edit {
        text,
        selection_start: caret,
        selection_end: caret,
    }
}

/// Surrounds `start..end` with `before` and `after`, keeping the wrapped text
/// selected. `wrap_selection(md, s, e, "**", "**")` makes it bold.
pub fn wrap_selection(markdown: &str, start: usize, end: usize, before: &str, after: &str) -> Edit {
    let (start, end) = {
        let a = floor_boundary(markdown, start);
        let b = floor_boundary(markdown, end);
        (a.min(b), a.max(b))
    };
    let text = format!(
        "{}{}{}{}{}",
        &markdown[..start],
        before,
        &markdown[start..end],
        after,
        &markdown[end..]
    );
    Edit {
        text,
        selection_start: start + before.len(),
        selection_end: end + before.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_replaces_existing_marker() {
        let md = "# Deck\n## old heading\nbody";
        let edit = apply_heading(md, 10, 3);
        assert_eq!(edit.text, "# Deck\n### old heading\nbody");
        assert_eq!(edit.selection_start, "# Deck\n### old heading".len());
    }

    #[test]
    fn heading_on_plain_line_and_last_line() {
        let edit = apply_heading("intro\nlast", 8, 1);
        assert_eq!(edit.text, "intro\n# last");
        let edit = apply_heading("", 0, 9);
        assert_eq!(edit.text, "###### ");
    }

    #[test]
    fn wrap_keeps_selection_on_inner_text() {
        let edit = wrap_selection("make this bold", 5, 9, "**", "**");
        assert_eq!(edit.text, "make **this** bold");
        assert_eq!(&edit.text[edit.selection_start..edit.selection_end], "this");
    }

    #[test]
    fn wrap_tolerates_reversed_and_out_of_range_bounds() {
        let edit = wrap_selection("héllo", 99, 1, "**", "**");
        assert_eq!(edit.text, "h**éllo**");
    }
}
