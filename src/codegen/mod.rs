mod ops;
pub mod requests;

pub use ops::*;

use crate::config::{CodegenConfig, LayoutConfig};
use crate::geometry::{Rect, SlideRegions};
use crate::ir::{Document, Slide};
use crate::runs::{BodyLineKind, BodyText};
use crate::theme::{Color, Theme, ThemeAssignment, ThemeRegistry};

/// Object roles on a slide; ids are `{prefix}_{slide}_{role}`.
const ROLE_PAGE: &str = "page";
const ROLE_HEADER: &str = "header";
const ROLE_FOOTER: &str = "footer";
const ROLE_CARD: &str = "card";
const ROLE_TITLE: &str = "title";
const ROLE_CAPTION: &str = "caption";
const ROLE_BODY: &str = "body";

pub fn object_id(prefix: &str, slide: usize, role: &str) -> String {
    format!("{prefix}_{slide}_{role}")
}

/// Compiles every slide in order. The ops of slide `i` form one contiguous
/// group that starts with its `CreateSurface`.
#[tracing::instrument(skip_all, fields(slides = document.len()))]
pub fn compile_document(
    document: &Document,
    registry: &ThemeRegistry,
    assignment: &ThemeAssignment,
    layout: &LayoutConfig,
    codegen: &CodegenConfig,
) -> Vec<DrawOp> {
    let mut ops = Vec::new();
    for (index, slide) in document.slides.iter().enumerate() {
        let theme = registry.resolve(index, assignment);
        ops.extend(compile_slide(index, slide, theme, layout, codegen));
    }
    tracing::debug!(ops = ops.len(), "compiled deck");
    ops
}

/// Ops for one slide on the reference page.
pub fn compile_slide(
    index: usize,
    slide: &Slide,
    theme: &Theme,
    layout: &LayoutConfig,
    codegen: &CodegenConfig,
) -> Vec<DrawOp> {
    let mut builder = SlideBuilder::new(index, theme, layout, codegen);
    builder.surface();
    builder.chrome();
    builder.title(slide);
    builder.caption();
    builder.body(slide);
    builder.ops
}

struct SlideBuilder<'a> {
    index: usize,
    theme: &'a Theme,
    layout: &'a LayoutConfig,
    codegen: &'a CodegenConfig,
    regions: SlideRegions,
    slide_id: String,
    ops: Vec<DrawOp>,
}

impl<'a> SlideBuilder<'a> {
    fn new(
        index: usize,
        theme: &'a Theme,
        layout: &'a LayoutConfig,
        codegen: &'a CodegenConfig,
    ) -> Self {
        Self {
            index,
            theme,
            layout,
            codegen,
            regions: SlideRegions::reference(),
            slide_id: object_id(&codegen.id_prefix, index, ROLE_PAGE),
            ops: Vec::new(),
        }
    }

    fn id(&self, role: &str) -> String {
        object_id(&self.codegen.id_prefix, self.index, role)
    }

    fn font_size(&self, points: f32) -> f32 {
        points * self.regions.font_scale
    }

    fn surface(&mut self) {
        self.ops.push(DrawOp::CreateSurface {
            slide_id: self.slide_id.clone(),
            index: self.index,
        });
        self.ops.push(DrawOp::SetFill {
            object_id: self.slide_id.clone(),
            target: FillTarget::Page,
            color: self.theme.colors.background,
        });
    }

    fn filled_shape(&mut self, role: &str, kind: ShapeKind, frame: Rect, color: Color) {
        let object_id = self.id(role);
        self.ops.push(DrawOp::CreateShape {
            object_id: object_id.clone(),
            slide_id: self.slide_id.clone(),
            kind,
            frame,
            content_alignment: None,
        });
        self.ops.push(DrawOp::SetFill {
            object_id,
            target: FillTarget::Shape,
            color,
        });
    }

    fn chrome(&mut self) {
        let cover = self.theme.is_cover();
        if !cover {
            self.filled_shape(
                ROLE_HEADER,
                ShapeKind::Rectangle,
                self.regions.header,
                self.theme.colors.primary,
            );
        }
        self.filled_shape(
            ROLE_FOOTER,
            ShapeKind::Rectangle,
            self.regions.footer,
            self.theme.footer_fill(),
        );
        if !cover {
            self.filled_shape(
                ROLE_CARD,
                ShapeKind::RoundRectangle,
                self.regions.card,
                self.theme.colors.card,
            );
        }
    }

    fn text_box(&mut self, role: &str, frame: Rect, alignment: ContentAlignment) -> String {
        let object_id = self.id(role);
        self.ops.push(DrawOp::CreateShape {
            object_id: object_id.clone(),
            slide_id: self.slide_id.clone(),
            kind: ShapeKind::TextBox,
            frame,
            content_alignment: Some(alignment),
        });
        object_id
    }

    fn title(&mut self, slide: &Slide) {
        let cover = self.theme.is_cover();
        let frame = self.regions.title_for(cover);
        let object_id = self.text_box(ROLE_TITLE, frame, ContentAlignment::Middle);
        let style = &self.theme.typography.header;
        self.ops.push(DrawOp::InsertText {
            object_id: object_id.clone(),
            text: slide.display_title().to_string(),
        });
        self.ops.push(DrawOp::ApplyTextStyle {
            object_id,
            range: StyleRange::All,
            style: TextStyleSpec::from_style(style, self.font_size(style.font_size)),
        });
    }

    fn caption(&mut self) {
        let frame = self.regions.footer_text;
        let object_id = self.text_box(ROLE_CAPTION, frame, ContentAlignment::Middle);
        if self.layout.footer_caption.is_empty() {
            return;
        }
        let style = &self.theme.typography.footer;
        self.ops.push(DrawOp::InsertText {
            object_id: object_id.clone(),
            text: self.layout.footer_caption.clone(),
        });
        self.ops.push(DrawOp::ApplyTextStyle {
            object_id,
            range: StyleRange::All,
            style: TextStyleSpec::from_style(style, self.font_size(style.font_size)),
        });
    }

    fn body(&mut self, slide: &Slide) {
        let cover = self.theme.is_cover();
        let frame = self.regions.body_for(cover);
        let object_id = self.text_box(ROLE_BODY, frame, ContentAlignment::Top);
        let body = BodyText::from_blocks(&slide.blocks);
        if body.text.is_empty() {
            return;
        }

        let style = &self.theme.typography.body;
        let body_size = self.font_size(style.font_size);
        self.ops.push(DrawOp::InsertText {
            object_id: object_id.clone(),
            text: body.text.clone(),
        });
        self.ops.push(DrawOp::ApplyTextStyle {
            object_id: object_id.clone(),
            range: StyleRange::All,
            style: TextStyleSpec {
                color: Some(self.theme.colors.text),
                ..TextStyleSpec::from_style(style, body_size)
            },
        });

        for line in body.lines.iter().filter(|line| !line.range.is_empty()) {
            let style = match line.kind {
                BodyLineKind::Header { level } => TextStyleSpec {
                    font_size: Some(body_size * self.layout.heading_scale_for(level)),
                    bold: Some(true),
                    color: Some(self.theme.colors.primary),
                    ..TextStyleSpec::default()
                },
                BodyLineKind::TableRow { header: true } => TextStyleSpec::bold(),
                _ => continue,
            };
            self.ops.push(DrawOp::ApplyTextStyle {
                object_id: object_id.clone(),
                range: line.range.into(),
                style,
            });
        }

        for range in body.bold_ranges().filter(|range| !range.is_empty()) {
            self.ops.push(DrawOp::ApplyTextStyle {
                object_id: object_id.clone(),
                range: (*range).into(),
                style: TextStyleSpec::bold(),
            });
        }

        self.ops.push(DrawOp::ApplyParagraphStyle {
            object_id: object_id.clone(),
            range: StyleRange::All,
            alignment: ParagraphAlignment::Start,
        });

        if cover {
            return;
        }
        for range in body.bullet_ranges() {
            self.ops.push(DrawOp::ApplyBulletStyle {
                object_id: object_id.clone(),
                range,
                preset: self.codegen.bullet_preset.clone(),
            });
        }
    }
}
