use crate::ir::{Block, Cell, Document, MAX_HEADING_LEVEL, Row, Slide};
use crate::runs::extract_runs;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SLIDE_DELIMITER: &str = "---";
/// Separator used when slide texts are joined back into one markdown string.
pub const SLIDE_JOINER: &str = "\n---\n";

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)\s+(.*)$").unwrap());
static TABLE_SEPARATOR_CELL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Splits `markdown` into raw slide segments on lines that read `---` once
/// trimmed.
///
/// Empty leading, trailing and in-between segments are kept so that segment
/// indices line up with slide indices. The delimiter line and the newline
/// directly before it belong to no segment.
pub fn split_slides(markdown: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut segment_start = 0;
    let mut line_start = 0;
    while line_start <= markdown.len() {
        let line_end = markdown[line_start..]
            .find('\n')
            .map(|idx| line_start + idx)
            .unwrap_or(markdown.len());
        let line = &markdown[line_start..line_end];
        if line.trim() == SLIDE_DELIMITER {
            let segment_end = if line_start > segment_start {
                line_start - 1
            } else {
                segment_start
            };
            segments.push(&markdown[segment_start..segment_end]);
            segment_start = (line_end + 1).min(markdown.len());
        }
        if line_end == markdown.len() {
            break;
        }
        line_start = line_end + 1;
    }
    segments.push(&markdown[segment_start..]);
    segments
}

pub fn join_slides<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<_>>()
        .join(SLIDE_JOINER)
}

pub fn parse_document(markdown: &str) -> Document {
    Document {
        slides: split_slides(markdown).into_iter().map(parse_slide).collect(),
    }
}

/// Parses one raw segment. The first heading becomes the title; every later
/// heading becomes a [`Block::Header`].
pub fn parse_slide(segment: &str) -> Slide {
    let mut slide = Slide::default();
    let mut table_lines: Vec<&str> = Vec::new();

    for raw_line in segment.trim().lines() {
        let line = raw_line.trim();
        if line.starts_with('|') {
            table_lines.push(line);
            continue;
        }
        flush_table(&mut table_lines, &mut slide.blocks);
        if line.is_empty() {
            continue;
        }

        if let Some((level, text)) = parse_heading(line) {
            if slide.title.is_none() {
                slide.title = Some(text.to_string());
            } else {
                slide.blocks.push(Block::Header {
                    level,
                    runs: extract_runs(text),
                });
            }
            continue;
        }

        let (is_bullet, content) = match line.strip_prefix("- ") {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        slide.blocks.push(Block::Text {
            runs: extract_runs(content),
            is_bullet,
        });
    }
    flush_table(&mut table_lines, &mut slide.blocks);
    slide
}

fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let hashes = caps.get(1)?.as_str().len();
    let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    let level = hashes.min(MAX_HEADING_LEVEL as usize) as u8;
    Some((level, text))
}

fn flush_table(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    blocks.push(parse_table(lines));
    lines.clear();
}

fn parse_table(lines: &[&str]) -> Block {
    let mut rows: Vec<Row> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let cells = split_cells(line);
        if is_separator_row(&cells) {
            if idx == 1
                && let Some(first) = rows.first_mut()
            {
                first.is_header_row = true;
            }
            continue;
        }
        rows.push(Row {
            cells: cells
                .into_iter()
                .map(|cell| Cell {
                    runs: extract_runs(cell),
                })
                .collect(),
            is_header_row: false,
        });
    }
    Block::Table { rows }
}

fn split_cells(line: &str) -> Vec<&str> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

fn is_separator_row(cells: &[&str]) -> bool {
    !cells.is_empty() && cells.iter().all(|cell| TABLE_SEPARATOR_CELL_RE.is_match(cell))
}
