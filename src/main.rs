use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::info;

use lemmask::{
    LemmaOutput, LemmatizeOptions, PhraseMasker, SentenceLemmatizer, TextInput, DEFAULT_MARKER,
    DEFAULT_TARGET,
};

#[derive(Parser, Debug)]
#[command(name = "lemmask")]
#[command(about = "Phrase-masking tokenizer and lemmatizer front end")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mask configured phrases so they tokenize as single units
    Mask {
        /// Phrase to protect; may be given multiple times, earlier wins
        #[arg(long = "phrase")]
        phrases: Vec<String>,

        /// File with one phrase per line, appended after --phrase entries
        #[arg(long)]
        phrases_file: Option<PathBuf>,

        /// Sequence replaced inside matched phrases
        #[arg(long, default_value = DEFAULT_TARGET)]
        target: String,

        /// Sequence substituted for the target inside matched phrases
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,

        /// Input file, one text per line (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Tokenize, POS-tag, and lemmatize line-oriented input
    Lemmatize {
        /// Lexicon model file (JSON)
        #[arg(long)]
        model: PathBuf,

        /// Entity gazetteer file (surface<TAB>label per line)
        #[arg(long)]
        gazetteer: PathBuf,

        /// Marker that compound tokens are split on
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,

        /// Sequence that rejoins compound sub-parts
        #[arg(long, default_value = DEFAULT_TARGET)]
        target: String,

        /// Emit [lemma, tag] pairs instead of bare lemmas
        #[arg(long)]
        with_pos: bool,

        /// Worker threads for batch fan-out (defaults to CPU count)
        #[arg(long)]
        workers: Option<usize>,

        /// Treat the whole input as one JSON document (a string or an
        /// array of strings) instead of one text per line
        #[arg(long)]
        json: bool,

        /// Suppress the console progress bar
        #[arg(long)]
        no_progress: bool,

        /// Stats output file path
        #[arg(long)]
        stats_out: Option<PathBuf>,

        /// Input file (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Run statistics written to --stats-out as JSON.
#[derive(Serialize, Debug, Clone)]
struct RunStats {
    lines_processed: u64,
    tokens_emitted: u64,
    duration_ms: u64,
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging, matching the rest of our tooling.
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Mask {
            phrases,
            phrases_file,
            target,
            marker,
            input,
            output,
        } => run_mask(phrases, phrases_file, target, marker, input, output).await,
        Command::Lemmatize {
            model,
            gazetteer,
            marker,
            target,
            with_pos,
            workers,
            json,
            no_progress,
            stats_out,
            input,
            output,
        } => {
            run_lemmatize(LemmatizeArgs {
                model,
                gazetteer,
                marker,
                target,
                with_pos,
                workers: workers.unwrap_or_else(num_cpus::get),
                json,
                no_progress,
                stats_out,
                input,
                output,
            })
            .await
        }
    }
}

async fn run_mask(
    mut phrases: Vec<String>,
    phrases_file: Option<PathBuf>,
    target: String,
    marker: String,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    if let Some(path) = &phrases_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read phrases file {}", path.display()))?;
        phrases.extend(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
    }
    if phrases.is_empty() {
        anyhow::bail!("No phrases configured; pass --phrase or --phrases-file");
    }

    let masker = PhraseMasker::new(phrases, &target, &marker)?;
    info!(?masker, "Configured phrase masker");

    let raw = read_input(input.as_ref()).await?;
    let mut masked_lines = 0u64;
    let mut out = String::with_capacity(raw.len());
    for line in raw.lines() {
        let masked = masker.mask(line);
        if masked != line {
            masked_lines += 1;
        }
        out.push_str(&masked);
        out.push('\n');
    }

    write_output(output.as_ref(), &out).await?;
    info!(masked_lines, "Masking complete");
    Ok(())
}

struct LemmatizeArgs {
    model: PathBuf,
    gazetteer: PathBuf,
    marker: String,
    target: String,
    with_pos: bool,
    workers: usize,
    json: bool,
    no_progress: bool,
    stats_out: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

async fn run_lemmatize(args: LemmatizeArgs) -> Result<()> {
    // Validate artifacts early to fail fast with a clear error.
    if !args.model.exists() {
        anyhow::bail!("Lexicon model does not exist: {}", args.model.display());
    }
    if !args.gazetteer.exists() {
        anyhow::bail!("Gazetteer does not exist: {}", args.gazetteer.display());
    }

    let pipeline = SentenceLemmatizer::from_paths(&args.model, &args.gazetteer)?;
    let opts = LemmatizeOptions {
        marker: args.marker.clone(),
        target: args.target.clone(),
    };

    let start = std::time::Instant::now();
    let raw = read_input(args.input.as_ref()).await?;

    let mut out = String::new();
    let mut lines_processed = 0u64;
    let mut tokens_emitted = 0u64;

    if args.json {
        let value: serde_json::Value =
            serde_json::from_str(&raw).context("Input is not valid JSON")?;
        let input = TextInput::try_from(value)?;
        match pipeline.auto_lemmatize(input, &opts)? {
            LemmaOutput::One(lemmas) => {
                lines_processed = 1;
                tokens_emitted = lemmas.len() as u64;
                out.push_str(&serde_json::to_string(&lemmas)?);
                out.push('\n');
            }
            LemmaOutput::Many(results) => {
                for lemmas in &results {
                    lines_processed += 1;
                    tokens_emitted += lemmas.len() as u64;
                    out.push_str(&serde_json::to_string(lemmas)?);
                    out.push('\n');
                }
            }
        }
    } else {
        let lines: Vec<String> = raw.lines().map(String::from).collect();
        let progress = if args.no_progress {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(lines.len() as u64)
        };

        // Chunked fan-out keeps the progress bar honest on large inputs.
        let chunk_size = (args.workers * 16).max(1);
        for chunk in lines.chunks(chunk_size) {
            if args.with_pos {
                let results = pipeline.lemmatize_batch_with_pos(chunk, &opts, args.workers)?;
                for pairs in &results {
                    tokens_emitted += pairs.len() as u64;
                    out.push_str(&serde_json::to_string(pairs)?);
                    out.push('\n');
                }
            } else {
                let results = pipeline.lemmatize_batch(chunk, &opts, args.workers)?;
                for lemmas in &results {
                    tokens_emitted += lemmas.len() as u64;
                    out.push_str(&serde_json::to_string(lemmas)?);
                    out.push('\n');
                }
            }
            lines_processed += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        progress.finish_and_clear();
    }

    write_output(args.output.as_ref(), &out).await?;

    let stats = RunStats {
        lines_processed,
        tokens_emitted,
        duration_ms: start.elapsed().as_millis() as u64,
        workers: args.workers,
    };
    info!(?stats, "Lemmatization complete");

    if let Some(path) = &args.stats_out {
        let payload = serde_json::to_string_pretty(&stats)?;
        tokio::fs::write(path, payload)
            .await
            .with_context(|| format!("Failed to write stats file {}", path.display()))?;
        info!("Stats written to {}", path.display());
    }

    Ok(())
}

async fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("Failed to read input file {}", p.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

async fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => tokio::fs::write(p, content)
            .await
            .with_context(|| format!("Failed to write output file {}", p.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
