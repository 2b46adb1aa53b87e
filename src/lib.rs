#[cfg(feature = "cli")]
pub mod cli;
pub mod codegen;
pub mod config;
pub mod deck;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod runs;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use codegen::{DrawOp, compile_document};
pub use config::{Config, load_config};
pub use error::{Result, SlideError};
pub use ir::{Block, Document, Slide, StyledRun};
pub use layout::{LayoutDescriptor, compute_layout, layout_document};
pub use parser::{parse_document, split_slides};
pub use theme::{Theme, ThemeAssignment, ThemeRegistry, resolve_theme};

/// Parses `markdown` and lays out every slide for the configured canvas.
#[tracing::instrument(skip_all, fields(bytes = markdown.len()))]
pub fn layout_deck(markdown: &str, config: &Config) -> Vec<LayoutDescriptor> {
    let document = parse_document(markdown);
    layout_document(
        &document,
        &config.registry,
        &config.assignment,
        &config.canvas,
        &config.layout,
    )
}

/// Parses `markdown` and compiles it to drawing ops on the 720x405 page.
#[tracing::instrument(skip_all, fields(bytes = markdown.len()))]
pub fn compile_deck(markdown: &str, config: &Config) -> Vec<DrawOp> {
    let document = parse_document(markdown);
    compile_document(
        &document,
        &config.registry,
        &config.assignment,
        &config.layout,
        &config.codegen,
    )
}
