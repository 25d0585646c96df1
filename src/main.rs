//! Region Annotator CLI
//!
//! Drives one editing session from stdin. Each line is a command token
//! (`next-region`, `label:b`, `fast_forward`, ...) or a key press prefixed
//! with `key:` (`key:shift+Tab`). A JSON snapshot is printed after every line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use region_annotator::annotation::{load_rttm_file, write_rttm, DEFAULT_RTTM_TYPE};
use region_annotator::hotkeys::{HotkeyContext, KeyStroke};
use region_annotator::{Editor, EditorSettings};

#[derive(Parser)]
#[command(name = "region-annotator")]
#[command(about = "Keyboard-driven audio region annotation")]
#[command(version)]
struct Cli {
    /// Editor settings (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// RTTM file to load before reading commands
    #[arg(long)]
    rttm: Option<PathBuf>,

    /// File id to take from the RTTM file (defaults to the first one)
    #[arg(long, requires = "rttm")]
    uri: Option<String>,

    /// Write the final regions as RTTM to stdout at end of input
    #[arg(long)]
    export_rttm: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => EditorSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => EditorSettings::default(),
    };
    let mut editor = Editor::new(settings);

    let mut uri = cli.uri.clone();
    if let Some(path) = &cli.rttm {
        let mut annotations = load_rttm_file(path, DEFAULT_RTTM_TYPE)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_id = match &uri {
            Some(id) => id.clone(),
            None => match annotations.keys().next() {
                Some(first) => first.clone(),
                None => bail!("{} contains no {} lines", path.display(), DEFAULT_RTTM_TYPE),
            },
        };
        let Some(annotation) = annotations.remove(&file_id) else {
            bail!("file id '{}' not found in {}", file_id, path.display());
        };
        editor.import_annotation(&annotation)?;
        uri = Some(file_id);
    }

    let context = HotkeyContext::default();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let outcome = match input.strip_prefix("key:") {
            Some(key) => key
                .parse::<KeyStroke>()
                .and_then(|stroke| editor.handle_key(&stroke, &context).map(|_| ())),
            None => editor.apply_token(input),
        };
        if let Err(err) = outcome {
            tracing::error!(input, %err, "input rejected");
        }

        serde_json::to_writer(&mut out, &editor.snapshot())?;
        writeln!(out)?;
    }

    if cli.export_rttm {
        let mut annotation = editor.export_annotation();
        annotation.uri = uri;
        write_rttm(&annotation, &mut out)?;
    }
    out.flush()?;

    Ok(())
}
