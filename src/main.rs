use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use subtrans::config::{Backend, Config};
use subtrans::media::MediaPipeline;
use subtrans::translate::{create_translator, TranslationOrchestrator, TranslationStatus};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subtrans")]
#[command(version, about = "Subtitle translation and AI subtitle generation")]
#[command(
    long_about = "Translate SRT subtitle files between languages, or generate subtitles from video files, using OpenAI, Gemini, Claude or OpenRouter APIs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Translate an SRT subtitle file to another language
    Translate {
        /// Input subtitle file
        input: PathBuf,

        /// Target language code (e.g. en, es, ja)
        #[arg(short, long)]
        to: String,

        /// Translation backend: openai, gemini, claude, openrouter
        /// (defaults to the configured backend)
        #[arg(short, long)]
        backend: Option<String>,

        /// Output subtitle file (defaults to <input>.<lang>.srt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate subtitles from a video file
    Generate {
        /// Input video file
        input: PathBuf,

        /// Target language code for the generated subtitles
        #[arg(short, long, default_value = "en")]
        to: String,

        /// Output subtitle file (defaults to <input>.srt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn install_cancel_flag() -> Arc<AtomicBool> {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    let _ = ctrlc::set_handler(move || {
        eprintln!("\nCancelling after the current chunk...");
        flag.store(true, Ordering::Relaxed);
    });
    cancelled
}

fn derive_translate_output(input: &Path, lang: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("{}.{}.srt", stem.to_string_lossy(), lang));
    output
}

fn derive_generate_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("{}.srt", stem.to_string_lossy()));
    output
}

async fn run_translate(
    input: PathBuf,
    to: String,
    backend: Option<String>,
    output: Option<PathBuf>,
    cancelled: Arc<AtomicBool>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let backend: Backend = match backend {
        Some(s) => s.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.default_backend,
    };
    config
        .validate(backend)
        .context("Configuration validation failed")?;

    let output = output.unwrap_or_else(|| derive_translate_output(&input, &to));

    if !subtrans::lang::LANGUAGE_CODES.contains(&to.as_str()) {
        info!("Unknown language code '{}', passing it to the backend verbatim", to);
    }

    info!("Input:   {}", input.display());
    info!("Output:  {}", output.display());
    info!("Backend: {}", backend);
    info!("Target:  {}", to);

    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let pb = progress_bar.clone();

    let translator = create_translator(backend, &config)?;
    let orchestrator = TranslationOrchestrator::new(translator)
        .with_cancel_flag(cancelled)
        .with_progress(Box::new(move |completed, total| {
            pb.set_length(total as u64);
            pb.set_position(completed as u64);
        }));

    let outcome = orchestrator.translate_document(&text, &to).await?;
    progress_bar.finish_and_clear();

    std::fs::write(&output, &outcome.text)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    match outcome.status() {
        TranslationStatus::Succeeded => {
            println!("Translated subtitles written to {}", output.display());
        }
        TranslationStatus::SucceededWithWarnings => {
            println!("Translated subtitles written to {}", output.display());
            if let Some(warning) = outcome.warning() {
                println!("Warning: {warning}");
                println!("Failed chunks were kept in the original language.");
            }
        }
    }

    Ok(())
}

async fn run_generate(
    input: PathBuf,
    to: String,
    output: Option<PathBuf>,
    cancelled: Arc<AtomicBool>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate(Backend::Gemini)
        .context("Subtitle generation uses the Gemini API")?;

    let output = output.unwrap_or_else(|| derive_generate_output(&input));

    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Target: {}", to);

    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let pb = progress_bar.clone();

    let api_key = config
        .api_key(Backend::Gemini)
        .ok_or_else(|| anyhow::anyhow!("Gemini API key not set"))?
        .to_string();

    let pipeline = MediaPipeline::new(api_key)
        .with_cancel_flag(cancelled)
        .with_progress(Box::new(move |progress, stage| {
            pb.set_position(progress as u64);
            pb.set_message(stage.to_string());
        }));

    let outcome = pipeline.generate(&input, &to).await?;
    progress_bar.finish_and_clear();

    std::fs::write(&output, &outcome.text)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Generated subtitles written to {}", output.display());
    if let Some(warning) = outcome.warning {
        println!("Warning: {warning}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    let cancelled = install_cancel_flag();

    match cli.command {
        Command::Translate {
            input,
            to,
            backend,
            output,
        } => run_translate(input, to, backend, output, cancelled).await,
        Command::Generate { input, to, output } => {
            run_generate(input, to, output, cancelled).await
        }
    }
}
