use crate::config::{Config, load_config, parse_mode, parse_orientation, parse_override};
use crate::geometry::AspectRatio;
use crate::layout_dump::{write_ir_dump, write_layout_dump, write_ops_dump, write_requests_dump};
use crate::parser::parse_document;
use crate::render::{render_svg, write_output_svg};
use crate::{compile_document, layout_document};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "slidemark", version, about = "Markdown slide deck compiler")]
pub struct Args {
    /// Input markdown file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file or directory. JSON and single-slide SVG default to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Deck-wide theme id
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Per-slide theme override, INDEX=THEME (repeatable)
    #[arg(long = "slide-theme", value_name = "INDEX=THEME")]
    pub slide_themes: Vec<String>,

    /// Aspect ratio: 16:9, 4:3 or 1:1
    #[arg(short = 'a', long = "aspect")]
    pub aspect: Option<String>,

    /// landscape or portrait
    #[arg(long = "orientation")]
    pub orientation: Option<String>,

    /// thumbnail or fullscreen
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,

    /// Only render this slide (svg/png)
    #[arg(short = 's', long = "slide")]
    pub slide: Option<usize>,

    /// PNG width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Print the built-in and configured themes and exit
    #[arg(long = "list-themes")]
    pub list_themes: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    /// Layout descriptors as JSON
    Layout,
    /// Drawing ops as JSON
    Ops,
    /// Batch-update requests as JSON
    Requests,
    /// Parsed document as JSON
    Ir,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            _ => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config, &args)?;

    if args.list_themes {
        print!("{}", theme_listing(&config));
        return Ok(());
    }

    let markdown = read_input(args.input.as_deref())?;
    let document = parse_document(&markdown);
    tracing::info!(slides = document.len(), "parsed deck");
    let output = args.output.as_deref();

    match args.output_format {
        OutputFormat::Svg | OutputFormat::Png => {
            let layouts = layout_document(
                &document,
                &config.registry,
                &config.assignment,
                &config.canvas,
                &config.layout,
            );
            let selected: Vec<(usize, &crate::layout::LayoutDescriptor)> = match args.slide {
                Some(index) => {
                    let layout = layouts.get(index).ok_or_else(|| {
                        anyhow::anyhow!("slide {} out of range (deck has {})", index, layouts.len())
                    })?;
                    vec![(index, layout)]
                }
                None => layouts.iter().enumerate().collect(),
            };
            if selected.len() == 1 {
                let svg = render_svg(selected[0].1);
                return write_rendered(&svg, args.output_format, output.map(Path::to_path_buf), &config);
            }
            let outputs = resolve_multi_outputs(output, args.output_format, selected.len())?;
            for ((_, layout), path) in selected.into_iter().zip(outputs) {
                let svg = render_svg(layout);
                write_rendered(&svg, args.output_format, Some(path), &config)?;
            }
            Ok(())
        }
        OutputFormat::Layout => {
            let layouts = layout_document(
                &document,
                &config.registry,
                &config.assignment,
                &config.canvas,
                &config.layout,
            );
            write_layout_dump(output, &document, &layouts, &config.assignment, config.canvas)
        }
        OutputFormat::Ops | OutputFormat::Requests => {
            let ops = compile_document(
                &document,
                &config.registry,
                &config.assignment,
                &config.layout,
                &config.codegen,
            );
            if args.output_format == OutputFormat::Ops {
                write_ops_dump(output, &document, &ops)
            } else {
                write_requests_dump(output, &ops)
            }
        }
        OutputFormat::Ir => write_ir_dump(output, &document),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_args(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(theme) = &args.theme {
        config.assignment.global = theme.clone();
    }
    for raw in &args.slide_themes {
        let (index, theme_id) = parse_override(raw)?;
        config.assignment.overrides.insert(index, theme_id);
    }
    for id in std::iter::once(&config.assignment.global).chain(config.assignment.overrides.values())
    {
        if !config.registry.contains(id) {
            tracing::warn!(theme_id = %id, "theme not in registry, slides will use the default theme");
        }
    }
    if let Some(aspect) = &args.aspect {
        config.canvas.aspect_ratio = AspectRatio::parse(aspect)?;
    }
    if let Some(orientation) = &args.orientation {
        config.canvas.orientation = parse_orientation(orientation)?;
    }
    if let Some(mode) = &args.mode {
        config.canvas.mode = parse_mode(mode)?;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(())
}

fn theme_listing(config: &Config) -> String {
    let mut out = String::new();
    for (category, themes) in config.registry.by_category() {
        out.push_str(category.label());
        out.push('\n');
        for (id, theme) in themes {
            out.push_str(&format!("  {id:<16} {}\n", theme.name));
        }
    }
    out
}

fn write_rendered(svg: &str, format: OutputFormat, output: Option<PathBuf>, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Png => {
            let output = ensure_output(&output, "png")?;
            write_png(svg, &output, config)
        }
        _ => write_output_svg(svg, output.as_deref()),
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for a multi-slide deck"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("slide-{}.{}", idx + 1, ext)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("slide");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Orientation, RenderMode};

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("slidemark").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&[
            "-t",
            "dark",
            "--slide-theme",
            "1=academic",
            "--slide-theme",
            "3=startup",
            "-a",
            "4:3",
            "--orientation",
            "portrait",
            "-m",
            "fullscreen",
            "-e",
            "requests",
        ]);
        let mut config = Config::default();
        apply_args(&mut config, &args).unwrap();
        assert_eq!(config.assignment.global, "dark");
        assert_eq!(config.assignment.theme_id_for(1), "academic");
        assert_eq!(config.assignment.theme_id_for(3), "startup");
        assert_eq!(config.canvas.aspect_ratio, AspectRatio::Standard);
        assert_eq!(config.canvas.orientation, Orientation::Portrait);
        assert_eq!(config.canvas.mode, RenderMode::Fullscreen);
        assert_eq!(args.output_format, OutputFormat::Requests);
    }

    #[test]
    fn bad_override_is_an_error() {
        let args = parse(&["--slide-theme", "dark"]);
        assert!(apply_args(&mut Config::default(), &args).is_err());
    }

    #[test]
    fn multi_outputs_number_slides() {
        let outputs = resolve_multi_outputs(Some(Path::new("out/deck.svg")), OutputFormat::Svg, 2).unwrap();
        assert_eq!(
            outputs,
            vec![PathBuf::from("out/deck-1.svg"), PathBuf::from("out/deck-2.svg")]
        );
        assert!(resolve_multi_outputs(None, OutputFormat::Png, 2).is_err());
    }

    #[test]
    fn listing_groups_themes_by_category() {
        let listing = theme_listing(&Config::default());
        assert!(listing.contains("Cover\n"));
        assert!(listing.contains("Pitch Deck\n"));
        assert!(listing.contains("bw_simple"));
    }
}
