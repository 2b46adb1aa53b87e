use crate::ir::{Block, Row, StyledRun};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

const TABLE_CELL_SEPARATOR: &str = " | ";

/// Splits a line into bold and plain runs on `**...**` pairs.
///
/// An unmatched `**` stays in the text. Zero-length runs are dropped, so
/// `"****"` yields nothing and `""` yields an empty vector.
pub fn extract_runs(line: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut last = 0;
    for caps in BOLD_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            runs.push(StyledRun::plain(&line[last..whole.start()]));
        }
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if !inner.is_empty() {
            runs.push(StyledRun::bold(inner));
        }
        last = whole.end();
    }
    if last < line.len() {
        runs.push(StyledRun::plain(&line[last..]));
    }
    runs
}

/// Half-open range in UTF-16 code units, the index unit of the remote slide API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shifted(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Resolves the range against `text`. `None` when a bound falls outside the
    /// text or inside a surrogate pair.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = utf16_to_byte(text, self.start)?;
        let end = utf16_to_byte(text, self.end)?;
        text.get(start..end)
    }
}

pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn utf16_to_byte(text: &str, index: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == index {
            return Some(byte);
        }
        units += ch.len_utf16();
        if units > index {
            return None;
        }
    }
    (units == index).then_some(text.len())
}

/// Plain text of `runs` and the ranges of its bold runs, relative to the line.
pub fn bold_ranges(runs: &[StyledRun]) -> (String, Vec<TextRange>) {
    let mut text = String::new();
    let mut ranges = Vec::new();
    let mut cursor = 0;
    for run in runs {
        let len = utf16_len(&run.text);
        if run.bold && len > 0 {
            ranges.push(TextRange::new(cursor, cursor + len));
        }
        text.push_str(&run.text);
        cursor += len;
    }
    (text, ranges)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BodyLineKind {
    Text { bullet: bool },
    Header { level: u8 },
    TableRow { header: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLine {
    pub kind: BodyLineKind,
    /// Span of the line inside [`BodyText::text`], newline excluded.
    pub range: TextRange,
    /// Bold spans inside [`BodyText::text`].
    pub bold: Vec<TextRange>,
}

/// The body of a slide flattened to one newline-separated string, with the
/// offsets of every line and bold run inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyText {
    pub text: String,
    pub lines: Vec<BodyLine>,
}

impl BodyText {
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut body = BodyText::default();
        for block in blocks {
            match block {
                Block::Text { runs, is_bullet } => {
                    let (text, bold) = bold_ranges(runs);
                    body.push_line(BodyLineKind::Text { bullet: *is_bullet }, &text, bold);
                }
                Block::Header { level, runs } => {
                    let (text, bold) = bold_ranges(runs);
                    body.push_line(BodyLineKind::Header { level: *level }, &text, bold);
                }
                Block::Table { rows } => {
                    for row in rows {
                        let (text, bold) = flatten_row(row);
                        body.push_line(
                            BodyLineKind::TableRow {
                                header: row.is_header_row,
                            },
                            &text,
                            bold,
                        );
                    }
                }
            }
        }
        body
    }

    fn push_line(&mut self, kind: BodyLineKind, text: &str, bold: Vec<TextRange>) {
        let mut offset = utf16_len(&self.text);
        if !self.lines.is_empty() {
            self.text.push('\n');
            offset += 1;
        }
        self.text.push_str(text);
        self.lines.push(BodyLine {
            kind,
            range: TextRange::new(offset, offset + utf16_len(text)),
            bold: bold.into_iter().map(|range| range.shifted(offset)).collect(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn bold_ranges(&self) -> impl Iterator<Item = &TextRange> {
        self.lines.iter().flat_map(|line| line.bold.iter())
    }

    /// Maximal runs of consecutive bullet lines, each spanning first to last line.
    pub fn bullet_ranges(&self) -> Vec<TextRange> {
        let mut ranges: Vec<TextRange> = Vec::new();
        let mut previous_bullet = false;
        for line in &self.lines {
            let bullet = matches!(line.kind, BodyLineKind::Text { bullet: true });
            if bullet {
                match ranges.last_mut() {
                    Some(last) if previous_bullet => last.end = line.range.end,
                    _ => ranges.push(line.range),
                }
            }
            previous_bullet = bullet;
        }
        ranges
    }
}

fn flatten_row(row: &Row) -> (String, Vec<TextRange>) {
    let mut text = String::new();
    let mut ranges = Vec::new();
    for (idx, cell) in row.cells.iter().enumerate() {
        if idx > 0 {
            text.push_str(TABLE_CELL_SEPARATOR);
        }
        let offset = utf16_len(&text);
        let (cell_text, cell_bold) = bold_ranges(&cell.runs);
        text.push_str(&cell_text);
        ranges.extend(cell_bold.into_iter().map(|range| range.shifted(offset)));
    }
    (text, ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{plain_text, Cell};

    #[test]
    fn extracts_bold_and_plain_runs() {
        let runs = extract_runs("**Bold** item");
        assert_eq!(runs, vec![StyledRun::bold("Bold"), StyledRun::plain(" item")]);
    }

    #[test]
    fn unterminated_marker_is_literal() {
        let runs = extract_runs("a **b");
        assert_eq!(runs, vec![StyledRun::plain("a **b")]);
        let runs = extract_runs("**a** and **b");
        assert_eq!(
            runs,
            vec![StyledRun::bold("a"), StyledRun::plain(" and **b")]
        );
    }

    #[test]
    fn pairs_are_non_greedy() {
        let runs = extract_runs("**a**b**c**");
        assert_eq!(
            runs,
            vec![StyledRun::bold("a"), StyledRun::plain("b"), StyledRun::bold("c")]
        );
    }

    #[test]
    fn empty_pairs_and_lines_produce_no_runs() {
        assert!(extract_runs("").is_empty());
        assert!(extract_runs("****").is_empty());
    }

    #[test]
    fn runs_reconstruct_line_without_markup() {
        for line in ["plain", "**x** y **z**", "odd ** marker", "***triple***", "é **ü** ñ"] {
            let rebuilt = plain_text(&extract_runs(line));
            let expected = BOLD_RE.replace_all(line, "$1");
            assert_eq!(rebuilt, expected, "line {line:?}");
        }
    }

    #[test]
    fn body_offsets_account_for_newlines() {
        let blocks = vec![
            Block::Text {
                runs: extract_runs("**Bold** item"),
                is_bullet: true,
            },
            Block::Text {
                runs: extract_runs("plain **tail**"),
                is_bullet: true,
            },
        ];
        let body = BodyText::from_blocks(&blocks);
        assert_eq!(body.text, "Bold item\nplain tail");
        let bold: Vec<&str> = body
            .bold_ranges()
            .map(|range| range.slice(&body.text).unwrap())
            .collect();
        assert_eq!(bold, vec!["Bold", "tail"]);
        assert_eq!(body.lines[1].range, TextRange::new(10, 20));
    }

    #[test]
    fn offsets_use_utf16_units() {
        let blocks = vec![
            Block::Text {
                runs: extract_runs("😀 **x**"),
                is_bullet: false,
            },
        ];
        let body = BodyText::from_blocks(&blocks);
        let range = body.lines[0].bold[0];
        assert_eq!(range, TextRange::new(3, 4));
        assert_eq!(range.slice(&body.text), Some("x"));
    }

    #[test]
    fn table_rows_flatten_with_separator() {
        let row = Row {
            cells: vec![
                Cell {
                    runs: extract_runs("a"),
                },
                Cell {
                    runs: extract_runs("**b**"),
                },
            ],
            is_header_row: true,
        };
        let body = BodyText::from_blocks(&[Block::Table { rows: vec![row] }]);
        assert_eq!(body.text, "a | b");
        assert_eq!(body.lines[0].bold[0].slice(&body.text), Some("b"));
    }

    #[test]
    fn bullet_ranges_merge_adjacent_lines() {
        let bullet = |text: &str| Block::Text {
            runs: extract_runs(text),
            is_bullet: true,
        };
        let blocks = vec![
            bullet("one"),
            bullet("two"),
            Block::Text {
                runs: extract_runs("gap"),
                is_bullet: false,
            },
            bullet("three"),
        ];
        let body = BodyText::from_blocks(&blocks);
        let ranges = body.bullet_ranges();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].slice(&body.text), Some("one\ntwo"));
        assert_eq!(ranges[1].slice(&body.text), Some("three"));
    }
}
