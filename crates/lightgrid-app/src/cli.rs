//! Command line of the native layout inspector.

use crate::error::{AppError, AppResult};
use crate::inspect::{parse_viewport, LayoutReport};
use crate::shortcuts::ShortcutRegistry;
use kurbo::Size;
use lightgrid_core::{EngineConfig, PhotoCollection};
use std::path::PathBuf;

pub const USAGE: &str =
    "lightgrid <manifest.json> [WIDTHxHEIGHT] [--config <file>] [--shortcuts]";

const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub manifest: PathBuf,
    pub viewport: Size,
    pub config: Option<PathBuf>,
    pub shortcuts: bool,
}

impl Options {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut manifest = None;
        let mut viewport = None;
        let mut config = None;
        let mut shortcuts = false;

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--shortcuts" => shortcuts = true,
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| AppError::Usage("--config needs a file".into()))?;
                    config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => {
                    return Err(AppError::Usage(format!("unknown option {flag}")));
                }
                _ if manifest.is_none() => manifest = Some(PathBuf::from(&arg)),
                _ if viewport.is_none() => viewport = Some(parse_viewport(&arg)?),
                _ => return Err(AppError::Usage(format!("unexpected argument {arg}"))),
            }
        }

        Ok(Self {
            manifest: manifest.ok_or_else(|| AppError::Usage(USAGE.into()))?,
            viewport: viewport.unwrap_or(DEFAULT_VIEWPORT),
            config,
            shortcuts,
        })
    }
}

/// Run the inspector and return the text to print.
pub fn run<I, S>(args: I) -> AppResult<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let options = Options::parse(args)?;

    let config = match &options.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            EngineConfig::from_json(&std::fs::read_to_string(path)?)?
        }
        None => EngineConfig::default(),
    };
    let photos = PhotoCollection::from_file(&options.manifest)?;

    let mut out = LayoutReport::new(photos, options.viewport, config).to_string();
    if options.shortcuts {
        out.push('\n');
        out.push_str(&ShortcutRegistry::render());
    }
    Ok(out)
}
