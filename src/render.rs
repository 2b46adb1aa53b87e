use crate::layout::{BodyNode, LayoutBox, LayoutDescriptor, TableNode, TextNode, VerticalAlign};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;

// Baseline offset below the middle of a line box, in em.
const BASELINE_SHIFT: f32 = 0.35;
const TABLE_BORDER_WIDTH: f32 = 1.0;

/// Renders one laid-out slide as a standalone SVG document.
pub fn render_svg(layout: &LayoutDescriptor) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        layout.background
    );

    for child in &layout.children {
        match child {
            LayoutBox::HeaderBar { frame, fill, title } => {
                rect_svg(&mut svg, frame.x, frame.y, frame.width, frame.height, 0.0, &fill.to_hex());
                text_node_svg(
                    &mut svg,
                    frame.x + title.frame.x,
                    frame.y + title.frame.y,
                    title.frame.height,
                    &title.text,
                );
            }
            LayoutBox::CoverTitle { frame, text } => {
                text_node_svg(&mut svg, frame.x, frame.y, frame.height, text);
            }
            LayoutBox::Card {
                frame,
                fill,
                radius,
                content,
                children,
                ..
            } => {
                if let Some(fill) = fill {
                    rect_svg(&mut svg, frame.x, frame.y, frame.width, frame.height, *radius, &fill.to_hex());
                }
                let origin_x = frame.x + content.x;
                let origin_y = frame.y + content.y;
                for node in children {
                    body_node_svg(&mut svg, origin_x, origin_y, node);
                }
            }
            LayoutBox::FooterBar {
                frame,
                fill,
                caption,
            } => {
                rect_svg(&mut svg, frame.x, frame.y, frame.width, frame.height, 0.0, &fill.to_hex());
                text_node_svg(
                    &mut svg,
                    frame.x + caption.frame.x,
                    frame.y + caption.frame.y,
                    caption.frame.height,
                    &caption.text,
                );
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn rect_svg(svg: &mut String, x: f32, y: f32, width: f32, height: f32, radius: f32, fill: &str) {
    let _ = write!(
        svg,
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"{radius:.2}\" ry=\"{radius:.2}\" fill=\"{fill}\"/>",
    );
}

fn body_node_svg(svg: &mut String, origin_x: f32, origin_y: f32, node: &BodyNode) {
    match node {
        BodyNode::Heading { frame, text, .. } => {
            text_node_svg(svg, origin_x + frame.x, origin_y + frame.y, frame.height, text);
        }
        BodyNode::Line {
            frame,
            bullet,
            text,
        } => {
            let x = origin_x + frame.x;
            let y = origin_y + frame.y;
            let mut indent = 0.0;
            if let Some(mark) = bullet {
                let baseline = y + text.line_height / 2.0 + text.font.size * BASELINE_SHIFT;
                let _ = write!(
                    svg,
                    "<text x=\"{x:.2}\" y=\"{baseline:.2}\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\">{}</text>",
                    escape_xml(&text.font.family),
                    text.font.size,
                    mark.color,
                    escape_xml(&mark.glyph)
                );
                indent = mark.indent;
            }
            text_node_svg(svg, x + indent, y, frame.height, text);
        }
        BodyNode::Table(table) => table_svg(svg, origin_x, origin_y, table),
    }
}

fn table_svg(svg: &mut String, origin_x: f32, origin_y: f32, table: &TableNode) {
    let table_x = origin_x + table.frame.x;
    let table_y = origin_y + table.frame.y;
    let border = table.border.to_hex();
    for row in &table.rows {
        let row_y = table_y + row.frame.y;
        if let Some(fill) = row.fill {
            rect_svg(svg, table_x, row_y, row.frame.width, row.frame.height, 0.0, &fill.to_hex());
        }
        for cell in &row.cells {
            let cell_x = table_x + cell.frame.x;
            let _ = write!(
                svg,
                "<rect x=\"{cell_x:.2}\" y=\"{row_y:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{border}\" stroke-width=\"{TABLE_BORDER_WIDTH}\"/>",
                cell.frame.width, cell.frame.height,
            );
            let pad = table.cell_padding;
            text_node_svg(svg, cell_x + pad, row_y + pad, cell.text.height, &cell.text);
        }
    }
}

/// Writes each wrapped line as a `<text>` element with one `<tspan>` per run.
fn text_node_svg(svg: &mut String, x: f32, y: f32, box_height: f32, node: &TextNode) {
    let top = match node.valign {
        VerticalAlign::Top => y,
        VerticalAlign::Middle => y + (box_height - node.height) / 2.0,
    };
    let family = escape_xml(&node.font.family);
    let base_weight = if node.font.bold { "bold" } else { "normal" };
    for (idx, line) in node.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = top
            + idx as f32 * node.line_height
            + node.line_height / 2.0
            + node.font.size * BASELINE_SHIFT;
        let _ = write!(
            svg,
            "<text x=\"{x:.2}\" y=\"{baseline:.2}\" font-family=\"{family}\" font-size=\"{:.2}\" font-weight=\"{base_weight}\" fill=\"{}\" xml:space=\"preserve\">",
            node.font.size, node.color
        );
        for run in line {
            if run.bold && !node.font.bold {
                let _ = write!(svg, "<tspan font-weight=\"bold\">{}</tspan>", escape_xml(&run.text));
            } else {
                let _ = write!(svg, "<tspan>{}</tspan>", escape_xml(&run.text));
            }
        }
        svg.push_str("</text>");
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

/// Rasterises `svg` so that its width matches `render_cfg.width`.
#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = render_cfg.font_family.clone();
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let source = tree.size();
    let scale = if source.width() > 0.0 {
        render_cfg.width / source.width()
    } else {
        1.0
    };
    let width = (source.width() * scale).ceil().max(1.0) as u32;
    let height = (source.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
