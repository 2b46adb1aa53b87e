use crate::codegen::{DrawOp, requests::to_batch_requests};
use crate::geometry::Canvas;
use crate::ir::Document;
use crate::layout::LayoutDescriptor;
use crate::theme::ThemeAssignment;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDump<'a> {
    pub slide_count: usize,
    pub canvas: Canvas,
    pub slides: Vec<SlideDump<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDump<'a> {
    pub index: usize,
    pub title: Option<&'a str>,
    /// Theme id asked for; `layout.theme` names the theme actually used.
    pub theme_id: &'a str,
    pub block_count: usize,
    pub layout: &'a LayoutDescriptor,
}

impl<'a> DeckDump<'a> {
    pub fn from_layouts(
        document: &'a Document,
        layouts: &'a [LayoutDescriptor],
        assignment: &'a ThemeAssignment,
        canvas: Canvas,
    ) -> Self {
        let slides = document
            .slides
            .iter()
            .zip(layouts)
            .enumerate()
            .map(|(index, (slide, layout))| SlideDump {
                index,
                title: slide.title.as_deref(),
                theme_id: assignment.theme_id_for(index),
                block_count: slide.blocks.len(),
                layout,
            })
            .collect();
        DeckDump {
            slide_count: document.len(),
            canvas,
            slides,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpsDump<'a> {
    pub slide_count: usize,
    pub ops: &'a [DrawOp],
}

/// Pretty JSON to `path`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn write_layout_dump(
    path: Option<&Path>,
    document: &Document,
    layouts: &[LayoutDescriptor],
    assignment: &ThemeAssignment,
    canvas: Canvas,
) -> anyhow::Result<()> {
    let dump = DeckDump::from_layouts(document, layouts, assignment, canvas);
    write_json(path, &dump)
}

pub fn write_ops_dump(path: Option<&Path>, document: &Document, ops: &[DrawOp]) -> anyhow::Result<()> {
    let dump = OpsDump {
        slide_count: document.len(),
        ops,
    };
    write_json(path, &dump)
}

/// Writes the body of a batch-update call: `{"requests": [...]}`.
pub fn write_requests_dump(path: Option<&Path>, ops: &[DrawOp]) -> anyhow::Result<()> {
    let body = serde_json::json!({ "requests": to_batch_requests(ops) });
    write_json(path, &body)
}

pub fn write_ir_dump(path: Option<&Path>, document: &Document) -> anyhow::Result<()> {
    write_json(path, document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parser::parse_document;

    #[test]
    fn deck_dump_pairs_slides_with_layouts() {
        let config = Config::default();
        let document = parse_document("# One\n- a\n---\nno title");
        let assignment = ThemeAssignment::new("dark").with_override(1, "missing");
        let layouts = crate::layout::layout_document(
            &document,
            &config.registry,
            &assignment,
            &config.canvas,
            &config.layout,
        );
        let dump = DeckDump::from_layouts(&document, &layouts, &assignment, config.canvas);
        let value = serde_json::to_value(&dump).unwrap();
        assert_eq!(value["slideCount"], 2);
        assert_eq!(value["slides"][0]["title"], "One");
        assert!(value["slides"][1]["title"].is_null());
        assert_eq!(value["slides"][1]["themeId"], "missing");
        assert_eq!(value["slides"][1]["layout"]["theme"], "Professional Card");
        assert_eq!(value["canvas"]["aspectRatio"], "16:9");
    }

    #[test]
    fn write_json_creates_file() {
        let dir = std::env::temp_dir().join(format!("slidemark-dump-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ir.json");
        write_ir_dump(Some(&path), &parse_document("# A")).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"title\": \"A\""));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
