use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use editor_core::{fingerprint_file, EditCommand, OrderedItemEditor};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod handoff;
mod input;

use config::{load_settings, validate, DEFAULT_CONFIG_FILE};

/// Review an extracted curriculum, apply edits, and hand it to the lecture
/// service.
#[derive(Parser, Debug)]
struct Args {
    /// Upload response, extraction payload, or bare item array (JSON).
    #[arg(long)]
    input: PathBuf,
    /// Source PDF; hashed when the input carries no `pdf_hash`.
    #[arg(long)]
    pdf: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Edit command, repeatable: `add`, `remove 2`, `move 3 up`,
    /// `edit 1 title=Cells`, `reset`, `dedupe`.
    #[arg(long = "op")]
    ops: Vec<String>,
    /// File with one edit command per line, applied before any `--op`.
    #[arg(long)]
    script: Option<PathBuf>,
    #[arg(long, env = "CURRICULUM_SUBMIT_URL")]
    submit_url: Option<String>,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Drop repeated titles right after load. Like any structural edit this
    /// renumbers `order` to each item's position.
    #[arg(long)]
    dedupe: bool,
    /// Print the reviewed curriculum without committing it.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(url) = args.submit_url.clone() {
        settings.submit_url = Some(url);
    }
    if let Some(path) = args.output.clone() {
        settings.output_path = Some(path);
    }
    if args.dedupe {
        settings.dedupe_on_load = true;
    }
    validate(&settings)?;

    let extracted = input::load_extraction(&args.input)?;
    let mut editor = OrderedItemEditor::from_extraction(extracted);
    if editor.pdf_hash().is_none() {
        if let Some(pdf) = &args.pdf {
            let hash = fingerprint_file(pdf)
                .await
                .with_context(|| format!("failed to fingerprint '{}'", pdf.display()))?;
            editor.set_pdf_hash(Some(hash));
        }
    }
    if settings.dedupe_on_load {
        editor.dedupe_titles();
    }

    let mut lines = match &args.script {
        Some(path) => input::load_script(path)?,
        None => Vec::new(),
    };
    lines.extend(args.ops.iter().cloned());
    for line in &lines {
        let command =
            EditCommand::parse(line).with_context(|| format!("invalid edit command '{line}'"))?;
        command.apply(&mut editor);
    }

    let choice = handoff::choose_sink(&settings);
    if args.dry_run {
        print!("{}", editor.summary());
        info!("dry run, curriculum not committed");
        return Ok(());
    }
    if choice.writes_to_stdout() {
        eprint!("{}", editor.summary());
    } else {
        print!("{}", editor.summary());
    }

    let sink = handoff::build_sink(choice, &settings)?;
    let outcome = editor.commit(sink.as_ref()).await;
    if let Some(notice) = editor.take_notice() {
        if notice.is_error() {
            warn!(category = ?notice.category(), "{}", notice.message());
            eprintln!("{}", notice.message());
        } else {
            info!("{}", notice.message());
        }
    }
    outcome.context("curriculum was not committed")?;

    Ok(())
}
