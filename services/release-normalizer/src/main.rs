//!
//! src/main.rs  Andrew Belles  Oct 16th, 2026
//!
//! Entry point: builds config, logger and collaborators, gathers one
//! release directory into a release record and hands it off
//!
//!

mod config;
mod errors;
mod logging;
mod types;

mod aggregator;
mod description;
mod dictionary;
mod language;
mod prompt;
mod release;
mod resolver;
mod tags;
mod upload;

use std::path::PathBuf;

use clap::Parser;

use crate::aggregator::{Aggregator, RunOptions};
use crate::description::LogDirectory;
use crate::dictionary::{DictionaryStore, JsonFileRepository};
use crate::errors::NormalizerError;
use crate::prompt::{OperatorPrompt, Question, ScriptedPrompt, TerminalPrompt};
use crate::tags::LoftyTagReader;
use crate::upload::{HandoffUploader, Uploader};

/// Command-line arguments for release-normalizer
#[derive(Parser, Debug)]
#[command(name = "release-normalizer")]
#[command(about = "Normalizes a tagged release directory into an upload-ready record")]
#[command(version)]
struct Args {
    /// Release directory to process
    #[arg(long = "directory", visible_alias = "dir")]
    directory: PathBuf,

    /// Enables freeleech
    #[arg(short, long)]
    freeleech: bool,

    /// Additional comma separated tags for the upload
    #[arg(short, long)]
    tags: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Carry out everything except the hand-off
    #[arg(long, visible_alias = "dry")]
    dryrun: bool,

    /// Torrent file for the release, defaults to the conventional name
    #[arg(long, env = "TORRENT_PATH")]
    torrent: Option<PathBuf>,

    /// Never block on stdin; questions are answered from the flags below
    #[arg(long)]
    non_interactive: bool,

    /// Release type answer (Album/Single) for non-interactive runs
    #[arg(long)]
    release_type: Option<String>,

    /// Romanized title answer for non-interactive runs
    #[arg(long)]
    title: Option<String>,

    /// Romanized artist answer for non-interactive runs
    #[arg(long)]
    artist: Option<String>,
}

impl Args {
    fn extra_tags(&self) -> Vec<String> {
        self.tags.as_deref()
            .map(|t| t.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    fn scripted_prompt(&self) -> ScriptedPrompt {
        let answers = [
            (Question::ReleaseType, &self.release_type),
            (Question::RomanizedTitle, &self.title),
            (Question::RomanizedArtist, &self.artist),
        ];
        answers.into_iter().fold(ScriptedPrompt::new(), |prompt, (q, a)| match a {
            Some(answer) => prompt.answer(q, answer.clone()),
            None => prompt,
        })
    }
}

fn main() -> Result<(), NormalizerError> {
    let args = Args::parse();

    let mut cfgs = config::load_config()?;
    cfgs.upload.dry_run = args.dryrun;
    cfgs.upload.freeleech = args.freeleech;
    if args.debug {
        cfgs.logging.filter_directives = "debug,release_normalizer=trace".to_string();
    }
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "release-normalizer",
        version = %env!("CARGO_PKG_VERSION"),
        directory = %args.directory.display(),
        "starting"
    );
    tracing::debug!(config = ?cfgs, "configuration");

    let repo = JsonFileRepository::new(&cfgs.dictionary.path);
    tracing::debug!(path = %repo.path().display(), "dictionary.open");
    let mut store = DictionaryStore::open(repo)?;
    if store.snapshot().is_empty() {
        tracing::info!(path = %cfgs.dictionary.path.display(), "dictionary.empty");
    }

    let reader = LoftyTagReader;
    let descriptions = LogDirectory::new(&cfgs.description.directory);
    let mut prompt: Box<dyn OperatorPrompt> = if args.non_interactive {
        Box::new(args.scripted_prompt())
    } else {
        Box::new(TerminalPrompt::stdio())
    };

    let opts = RunOptions { extra_tags: args.extra_tags(), freeleech: cfgs.upload.freeleech };
    let record = Aggregator::new(
        &cfgs.description,
        &mut store,
        &reader,
        &descriptions,
        prompt.as_mut()
    ).gather(&args.directory, &opts)?;

    tracing::info!(record = %serde_json::to_string(&record)?, "release.assembled");

    let torrent = args.torrent.clone()
        .unwrap_or_else(|| PathBuf::from(record.torrent_name()));
    let cover = args.directory.join(&cfgs.upload.cover_name);

    let report = HandoffUploader::new(&cfgs.upload).submit(&record, &torrent, &cover)?;
    match &report.record_path {
        Some(path) => println!("Release record written to {}", path.display()),
        None => println!("Dry run: {} and {} verified", report.torrent.display(), report.cover.display()),
    }

    Ok(())
}
