mod table;
mod text;
pub(crate) mod types;
pub use types::*;

use crate::config::LayoutConfig;
use crate::geometry::{Canvas, Rect, RenderMode, SlideRegions};
use crate::ir::{Block, Document, Slide, StyledRun};
use crate::theme::{Theme, ThemeAssignment, ThemeRegistry};
use table::layout_table;
use text::{TextRequest, font_from_style, layout_text, text_width};

/// Canvas size in layout units for the canvas' render mode.
pub fn canvas_size(canvas: &Canvas, config: &LayoutConfig) -> (f32, f32) {
    let short_side = match canvas.mode {
        RenderMode::Thumbnail => config.thumbnail_short_side,
        RenderMode::Fullscreen => config.fullscreen_short_side,
    };
    canvas.size(short_side)
}

/// Lays out one slide. Pure: the same inputs always give the same tree.
pub fn compute_layout(
    slide: &Slide,
    theme: &Theme,
    canvas: &Canvas,
    config: &LayoutConfig,
) -> LayoutDescriptor {
    let (width, height) = canvas_size(canvas, config);
    let regions = SlideRegions::for_size(width, height);
    let cover = theme.is_cover();

    let mut children = Vec::with_capacity(4);
    if cover {
        children.push(layout_cover_title(slide, theme, &regions, config));
    } else {
        children.push(layout_header(slide, theme, &regions, config));
    }
    children.push(layout_card(slide, theme, &regions, config));
    children.push(layout_footer(theme, &regions, config));

    LayoutDescriptor {
        width,
        height,
        ratio: canvas.ratio(),
        mode: canvas.mode,
        theme: theme.name.clone(),
        category: theme.category,
        background: theme.colors.background,
        children,
    }
}

/// Lays out every slide of `document`, resolving each slide's theme by index.
#[tracing::instrument(skip_all, fields(slides = document.len()))]
pub fn layout_document(
    document: &Document,
    registry: &ThemeRegistry,
    assignment: &ThemeAssignment,
    canvas: &Canvas,
    config: &LayoutConfig,
) -> Vec<LayoutDescriptor> {
    document
        .slides
        .iter()
        .enumerate()
        .map(|(index, slide)| {
            let theme = registry.resolve(index, assignment);
            if slide.is_empty() {
                tracing::debug!(index, "empty slide segment");
            }
            compute_layout(slide, theme, canvas, config)
        })
        .collect()
}

fn title_runs(slide: &Slide) -> Vec<StyledRun> {
    vec![StyledRun::plain(slide.display_title())]
}

fn layout_header(
    slide: &Slide,
    theme: &Theme,
    regions: &SlideRegions,
    config: &LayoutConfig,
) -> LayoutBox {
    let style = &theme.typography.header;
    let frame = regions.title.relative_to(&regions.header);
    let runs = title_runs(slide);
    let text = layout_text(TextRequest {
        runs: &runs,
        font: font_from_style(style, style.font_size * regions.font_scale, style.bold),
        color: style.color,
        max_width: frame.width,
        line_height: config.line_height,
        wrap: false,
        valign: VerticalAlign::Middle,
    });
    LayoutBox::HeaderBar {
        frame: regions.header,
        fill: theme.colors.primary,
        title: TextBox { frame, text },
    }
}

fn layout_cover_title(
    slide: &Slide,
    theme: &Theme,
    regions: &SlideRegions,
    config: &LayoutConfig,
) -> LayoutBox {
    tracing::debug!(theme = %theme.name, "cover layout");
    let style = &theme.typography.header;
    let runs = title_runs(slide);
    let text = layout_text(TextRequest {
        runs: &runs,
        font: font_from_style(style, style.font_size * regions.font_scale, style.bold),
        color: style.color,
        max_width: regions.cover_title.width,
        line_height: config.line_height,
        wrap: config.wrap_text,
        valign: VerticalAlign::Middle,
    });
    LayoutBox::CoverTitle {
        frame: regions.cover_title,
        text,
    }
}

fn layout_footer(theme: &Theme, regions: &SlideRegions, config: &LayoutConfig) -> LayoutBox {
    let style = &theme.typography.footer;
    let runs = [StyledRun::plain(config.footer_caption.as_str())];
    let text = layout_text(TextRequest {
        runs: &runs,
        font: font_from_style(style, style.font_size * regions.font_scale, style.bold),
        color: style.color,
        max_width: regions.footer_text.width,
        line_height: config.line_height,
        wrap: false,
        valign: VerticalAlign::Middle,
    });
    LayoutBox::FooterBar {
        frame: regions.footer,
        fill: theme.footer_fill(),
        caption: TextBox {
            frame: regions.footer_text.relative_to(&regions.footer),
            text,
        },
    }
}

fn layout_card(
    slide: &Slide,
    theme: &Theme,
    regions: &SlideRegions,
    config: &LayoutConfig,
) -> LayoutBox {
    let cover = theme.is_cover();
    let frame = if cover { regions.cover_body } else { regions.card };
    let content = regions.body_for(cover).relative_to(&frame);
    let body_px = theme.typography.body.font_size * regions.font_scale;
    let gap = config.paragraph_gap * body_px;

    let mut children = Vec::with_capacity(slide.blocks.len());
    let mut cursor = 0.0;
    for block in &slide.blocks {
        let node = layout_block(block, theme, config, body_px, cursor, content.width, cover);
        cursor += node.frame().height + gap;
        children.push(node);
    }
    let used = if children.is_empty() { 0.0 } else { cursor - gap };
    let overflow = used > content.height + 0.5;
    if overflow {
        tracing::debug!(used, available = content.height, "slide body overflows card");
    }

    LayoutBox::Card {
        frame,
        fill: (!cover).then_some(theme.colors.card),
        radius: if cover { 0.0 } else { regions.card_radius },
        content,
        children,
        overflow,
    }
}

fn layout_block(
    block: &Block,
    theme: &Theme,
    config: &LayoutConfig,
    body_px: f32,
    y: f32,
    width: f32,
    cover: bool,
) -> BodyNode {
    let body = &theme.typography.body;
    match block {
        Block::Header { level, runs } => {
            let size = body_px * config.heading_scale_for(*level);
            let text = layout_text(TextRequest {
                runs,
                font: font_from_style(body, size, true),
                color: theme.colors.primary,
                max_width: width,
                line_height: config.line_height,
                wrap: config.wrap_text,
                valign: VerticalAlign::Top,
            });
            BodyNode::Heading {
                level: *level,
                frame: Rect::new(0.0, y, width, text.height),
                text,
            }
        }
        Block::Text { runs, is_bullet } => {
            let bullet = (*is_bullet && !cover).then(|| BulletMark {
                glyph: config.bullet_glyph.clone(),
                color: theme.colors.primary,
                indent: text_width(&config.bullet_glyph, body_px, false)
                    + config.bullet_gap * body_px,
            });
            let indent = bullet.as_ref().map_or(0.0, |mark| mark.indent);
            let text = layout_text(TextRequest {
                runs,
                font: font_from_style(body, body_px, body.bold),
                color: theme.colors.text,
                max_width: (width - indent).max(1.0),
                line_height: config.line_height,
                wrap: config.wrap_text,
                valign: VerticalAlign::Top,
            });
            BodyNode::Line {
                frame: Rect::new(0.0, y, width, text.height),
                bullet,
                text,
            }
        }
        Block::Table { rows } => {
            BodyNode::Table(layout_table(rows, theme, config, body_px, y, width))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AspectRatio, Orientation};
    use crate::parser::{parse_document, parse_slide};

    fn theme(id: &str) -> Theme {
        ThemeRegistry::builtin()
            .get(id)
            .cloned()
            .unwrap_or_else(|| panic!("missing builtin theme {id}"))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn business_slide_has_header_card_and_footer() {
        let slide = parse_slide("# Title\n- **Bold** item\n- plain item");
        let layout = compute_layout(
            &slide,
            &theme("default"),
            &Canvas::default(),
            &LayoutConfig::default(),
        );
        assert!(approx(layout.width, 480.0));
        assert!(approx(layout.height, 270.0));
        assert_eq!(layout.children.len(), 3);
        assert!(layout.header().is_some());
        assert!(layout.footer().is_some());
        assert_eq!(
            layout.title_text().map(|text| crate::ir::plain_text(&text.runs)),
            Some("Title".to_string())
        );
        let body = layout.body();
        assert_eq!(body.len(), 2);
        for node in body {
            match node {
                BodyNode::Line { bullet, .. } => assert!(bullet.is_some()),
                other => panic!("unexpected node {other:?}"),
            }
        }
        assert!(body[1].frame().y > body[0].frame().bottom());
    }

    #[test]
    fn cover_theme_drops_header_and_bullet_glyphs() {
        let slide = parse_slide("# Launch\n- first\n- second");
        let layout = compute_layout(
            &slide,
            &theme("bw_simple"),
            &Canvas::default(),
            &LayoutConfig::default(),
        );
        assert!(layout.header().is_none());
        assert!(
            layout
                .children
                .iter()
                .any(|child| matches!(child, LayoutBox::CoverTitle { .. }))
        );
        for child in &layout.children {
            if let LayoutBox::Card { fill, .. } = child {
                assert!(fill.is_none());
            }
        }
        for node in layout.body() {
            if let BodyNode::Line { bullet, .. } = node {
                assert!(bullet.is_none());
            }
        }
    }

    #[test]
    fn headings_shrink_with_level() {
        let slide = parse_slide("# T\n# one\n## two\n### three");
        let layout = compute_layout(
            &slide,
            &theme("default"),
            &Canvas::default(),
            &LayoutConfig::default(),
        );
        let sizes: Vec<f32> = layout
            .body()
            .iter()
            .map(|node| match node {
                BodyNode::Heading { text, .. } => text.font.size,
                other => panic!("unexpected node {other:?}"),
            })
            .collect();
        assert_eq!(sizes.len(), 3);
        assert!(sizes[0] > sizes[1] && sizes[1] > sizes[2]);
    }

    #[test]
    fn portrait_swaps_canvas_dimensions() {
        let canvas = Canvas {
            aspect_ratio: AspectRatio::Wide,
            orientation: Orientation::Portrait,
            mode: RenderMode::Fullscreen,
        };
        let layout = compute_layout(
            &parse_slide("# Tall"),
            &theme("default"),
            &canvas,
            &LayoutConfig::default(),
        );
        assert!(approx(layout.width, 720.0));
        assert!(approx(layout.height, 1280.0));
        assert_eq!(layout.ratio.to_string(), "9:16");
    }

    #[test]
    fn table_and_text_keep_block_order() {
        let slide = parse_slide("# T\nintro\n| a | b |\n|---|---|\n| 1 | 2 |\noutro");
        let layout = compute_layout(
            &slide,
            &theme("academic"),
            &Canvas::default(),
            &LayoutConfig::default(),
        );
        let kinds: Vec<&str> = layout
            .body()
            .iter()
            .map(|node| match node {
                BodyNode::Heading { .. } => "heading",
                BodyNode::Line { .. } => "line",
                BodyNode::Table(_) => "table",
            })
            .collect();
        assert_eq!(kinds, vec!["line", "table", "line"]);
    }

    #[test]
    fn long_bodies_are_flagged_as_overflowing() {
        let source: String = std::iter::once("# Busy".to_string())
            .chain((0..40).map(|idx| format!("- item number {idx}")))
            .collect::<Vec<_>>()
            .join("\n");
        let layout = compute_layout(
            &parse_slide(&source),
            &theme("default"),
            &Canvas::default(),
            &LayoutConfig::default(),
        );
        let overflow = layout.children.iter().any(|child| {
            matches!(child, LayoutBox::Card { overflow: true, .. })
        });
        assert!(overflow);
    }

    #[test]
    fn layout_is_deterministic() {
        let doc = parse_document("# A\n- **x** y\n---\n| h |\n|---|\n| v |\n---\n");
        let registry = ThemeRegistry::builtin();
        let assignment = ThemeAssignment::new("dark").with_override(1, "startup");
        let config = LayoutConfig::default();
        let first = layout_document(&doc, &registry, &assignment, &Canvas::default(), &config);
        let second = layout_document(&doc, &registry, &assignment, &Canvas::default(), &config);
        assert_eq!(first.len(), 3);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first[1].theme, "Startup Bold");
    }

    #[test]
    fn untitled_slide_uses_placeholder_title() {
        let layout = compute_layout(
            &parse_slide("just text"),
            &theme("default"),
            &Canvas::default(),
            &LayoutConfig::default(),
        );
        let title = layout.title_text().map(|text| crate::ir::plain_text(&text.runs));
        assert_eq!(title.as_deref(), Some(crate::ir::UNTITLED_LABEL));
    }
}
