use crate::config::LayoutConfig;
use crate::geometry::Rect;
use crate::ir::{Row, StyledRun};
use crate::theme::Theme;

use super::text::{TextRequest, font_from_style, layout_text, text_width};
use super::{TableCellNode, TableNode, TableRowNode, VerticalAlign};

/// Lays out a table `width` wide at vertical offset `y`. Ragged rows are
/// laid out with the cells they have; missing cells are left empty.
pub(super) fn layout_table(
    rows: &[Row],
    theme: &Theme,
    config: &LayoutConfig,
    body_font_size: f32,
    y: f32,
    width: f32,
) -> TableNode {
    let font_size = body_font_size * config.table_font_scale;
    let padding = font_size * config.table_cell_padding;
    let columns = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    let column_widths = column_widths(rows, columns, font_size, padding, width);

    let mut row_nodes = Vec::with_capacity(rows.len());
    let mut cursor = 0.0;
    for row in rows {
        let bold = row.is_header_row;
        let color = if bold {
            theme.typography.header.color
        } else {
            theme.colors.text
        };
        let mut cells = Vec::with_capacity(row.cells.len());
        let mut x = 0.0;
        let mut row_height: f32 = 0.0;
        for (idx, cell) in row.cells.iter().enumerate() {
            let cell_width = column_widths.get(idx).copied().unwrap_or(0.0);
            let text = layout_text(TextRequest {
                runs: &cell.runs,
                font: font_from_style(&theme.typography.body, font_size, bold),
                color,
                max_width: (cell_width - 2.0 * padding).max(1.0),
                line_height: config.line_height,
                wrap: config.wrap_text,
                valign: VerticalAlign::Top,
            });
            row_height = row_height.max(text.height + 2.0 * padding);
            cells.push(TableCellNode {
                frame: Rect::new(x, 0.0, cell_width, 0.0),
                text,
            });
            x += cell_width;
        }
        if cells.is_empty() {
            row_height = font_size * config.line_height + 2.0 * padding;
        }
        for cell in &mut cells {
            cell.frame.height = row_height;
        }
        row_nodes.push(TableRowNode {
            frame: Rect::new(0.0, cursor, width, row_height),
            is_header_row: row.is_header_row,
            fill: row.is_header_row.then_some(theme.colors.primary),
            cells,
        });
        cursor += row_height;
    }

    TableNode {
        frame: Rect::new(0.0, y, width, cursor),
        column_widths,
        cell_padding: padding,
        border: theme.colors.primary,
        rows: row_nodes,
    }
}

/// Shares `width` between columns in proportion to their widest cell.
fn column_widths(rows: &[Row], columns: usize, font_size: f32, padding: f32, width: f32) -> Vec<f32> {
    if columns == 0 {
        return Vec::new();
    }
    let mut natural = vec![0.0f32; columns];
    for row in rows {
        for (idx, cell) in row.cells.iter().enumerate() {
            let cell_width = runs_natural_width(&cell.runs, font_size, row.is_header_row) + 2.0 * padding;
            natural[idx] = natural[idx].max(cell_width);
        }
    }
    let total: f32 = natural.iter().sum();
    if total <= 0.0 {
        return vec![width / columns as f32; columns];
    }
    natural.iter().map(|w| width * w / total).collect()
}

fn runs_natural_width(runs: &[StyledRun], font_size: f32, bold: bool) -> f32 {
    runs.iter()
        .map(|run| text_width(&run.text, font_size, bold || run.bold))
        .sum()
}
