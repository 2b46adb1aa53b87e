use crate::ir::StyledRun;
use crate::theme::{Color, TextStyle};

use super::{FontSpec, TextNode, VerticalAlign};

const BOLD_WIDTH_FACTOR: f32 = 1.06;

/// Approximate advance of `ch` in em. Deterministic and font independent so
/// that layout never depends on the fonts installed on the host.
pub(super) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.28,
        '\t' => 1.12,
        'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' | '`' => 0.26,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '{' | '}' | '-' | '"' => 0.36,
        'm' | 'w' => 0.84,
        'M' | 'W' | '@' | '%' | '&' | '#' => 0.92,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.58,
        'a'..='z' => 0.55,
        '\u{2e80}'..='\u{9fff}' | '\u{ac00}'..='\u{d7af}' | '\u{ff00}'..='\u{ffef}' => 1.0,
        _ => 0.6,
    }
}

pub(super) fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let width = text.chars().map(char_width_factor).sum::<f32>() * font_size;
    if bold { width * BOLD_WIDTH_FACTOR } else { width }
}

fn runs_width(runs: &[StyledRun], font_size: f32, base_bold: bool) -> f32 {
    runs.iter()
        .map(|run| text_width(&run.text, font_size, base_bold || run.bold))
        .sum()
}

/// Splits runs into words that keep their trailing whitespace.
fn tokenize(runs: &[StyledRun]) -> Vec<StyledRun> {
    let mut tokens = Vec::new();
    for run in runs {
        let mut current = String::new();
        let mut in_space = false;
        for ch in run.text.chars() {
            if in_space && !ch.is_whitespace() {
                tokens.push(StyledRun {
                    text: std::mem::take(&mut current),
                    bold: run.bold,
                });
                in_space = false;
            }
            if ch.is_whitespace() {
                in_space = true;
            }
            current.push(ch);
        }
        if !current.is_empty() {
            tokens.push(StyledRun {
                text: current,
                bold: run.bold,
            });
        }
    }
    tokens
}

fn push_token(line: &mut Vec<StyledRun>, token: StyledRun) {
    match line.last_mut() {
        Some(last) if last.bold == token.bold => last.text.push_str(&token.text),
        _ => line.push(token),
    }
}

fn trim_line_end(line: &mut Vec<StyledRun>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end().len();
        last.text.truncate(trimmed);
        if last.text.is_empty() {
            line.pop();
        } else {
            break;
        }
    }
}

/// Greedy word wrap that keeps bold boundaries. A word wider than `max_width`
/// gets a line of its own rather than being broken.
pub(super) fn wrap_runs(
    runs: &[StyledRun],
    font_size: f32,
    base_bold: bool,
    max_width: f32,
) -> Vec<Vec<StyledRun>> {
    let mut lines: Vec<Vec<StyledRun>> = Vec::new();
    let mut current: Vec<StyledRun> = Vec::new();
    let mut current_width = 0.0;

    for token in tokenize(runs) {
        let bold = base_bold || token.bold;
        let word = token.text.trim_end();
        let word_width = text_width(word, font_size, bold);
        let full_width = text_width(&token.text, font_size, bold);

        if !current.is_empty() && current_width + word_width > max_width {
            trim_line_end(&mut current);
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        let token = if current.is_empty() {
            StyledRun {
                text: token.text.trim_start().to_string(),
                bold: token.bold,
            }
        } else {
            token
        };
        if token.text.is_empty() {
            continue;
        }
        current_width += if current.is_empty() {
            text_width(&token.text, font_size, bold)
        } else {
            full_width
        };
        push_token(&mut current, token);
    }
    trim_line_end(&mut current);
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn font_from_style(style: &TextStyle, size: f32, bold: bool) -> FontSpec {
    FontSpec {
        family: style.font_family.clone(),
        size,
        bold,
    }
}

pub(super) struct TextRequest<'a> {
    pub runs: &'a [StyledRun],
    pub font: FontSpec,
    pub color: Color,
    pub max_width: f32,
    pub line_height: f32,
    pub wrap: bool,
    pub valign: VerticalAlign,
}

pub(super) fn layout_text(request: TextRequest<'_>) -> TextNode {
    let TextRequest {
        runs,
        font,
        color,
        max_width,
        line_height,
        wrap,
        valign,
    } = request;
    let lines = if wrap {
        wrap_runs(runs, font.size, font.bold, max_width)
    } else {
        vec![runs.to_vec()]
    };
    let width = lines
        .iter()
        .map(|line| runs_width(line, font.size, font.bold))
        .fold(0.0, f32::max);
    let line_px = font.size * line_height;
    let height = lines.len().max(1) as f32 * line_px;
    TextNode {
        runs: runs.to_vec(),
        lines,
        font,
        color,
        line_height: line_px,
        valign,
        width,
        height,
    }
}
