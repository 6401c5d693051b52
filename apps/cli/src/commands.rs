//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use herbarium_core::pipeline::{
    self, PreprocessConfig, PreprocessResult, ProgressReporter, QaRunConfig, QaRunResult,
};
use herbarium_shared::{AppConfig, ChunkConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Herbarium: structured training data from a plaintext herbal.
#[derive(Parser)]
#[command(
    name = "herbarium",
    version,
    about = "Segment a plaintext herbal into herb entries, chunks, and Q&A training pairs.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.herbarium/herbarium.toml.
    #[arg(long, global = true, env = "HERBARIUM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Segment and chunk a plaintext herbal.
    Preprocess {
        /// Plaintext herbal to read.
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        chunking: ChunkArgs,
    },

    /// Generate Q&A training pairs from preprocessed herbs.
    Qa {
        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        qa: QaArgs,
    },

    /// Preprocess, then generate Q&A pairs.
    Run {
        /// Plaintext herbal to read.
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        chunking: ChunkArgs,

        #[command(flatten)]
        qa: QaArgs,
    },

    /// Summarize the quality of a generated dataset.
    Check {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Output directory override.
#[derive(clap::Args)]
pub(crate) struct OutputArgs {
    /// Directory for the dataset artifacts (defaults to config `output_dir`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Chunking overrides.
#[derive(clap::Args)]
pub(crate) struct ChunkArgs {
    /// Words per chunk.
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Words shared by consecutive chunks.
    #[arg(long)]
    pub overlap: Option<usize>,
}

/// Q&A generation overrides.
#[derive(clap::Args)]
pub(crate) struct QaArgs {
    /// Shuffle seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep pairs in generation order.
    #[arg(long)]
    pub no_shuffle: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "herbarium=info",
        1 => "herbarium=debug",
        _ => "herbarium=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Preprocess {
            input,
            output,
            chunking,
        } => cmd_preprocess(&config, input, &output, &chunking),
        Command::Qa { output, qa } => cmd_qa(&config, &output, &qa),
        Command::Run {
            input,
            output,
            chunking,
            qa,
        } => cmd_run(&config, input, &output, &chunking, &qa),
        Command::Check { output } => cmd_check(&config, &output),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Flag/config merging
// ---------------------------------------------------------------------------

fn output_dir(config: &AppConfig, args: &OutputArgs) -> PathBuf {
    args.out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir))
}

fn chunk_config(config: &AppConfig, args: &ChunkArgs) -> Result<ChunkConfig> {
    let max_words = args.max_words.unwrap_or(config.chunking.max_words);
    let overlap = args.overlap.unwrap_or(config.chunking.overlap);
    ChunkConfig::new(max_words, overlap).map_err(|e| eyre!("invalid chunking flags: {e}"))
}

fn qa_config(config: &AppConfig, args: &QaArgs) -> herbarium_shared::QaConfig {
    let mut qa = config.qa.clone();
    if let Some(seed) = args.seed {
        qa.seed = seed;
    }
    if args.no_shuffle {
        qa.shuffle = false;
    }
    qa
}

fn preprocess_config(
    config: &AppConfig,
    input: PathBuf,
    output: &OutputArgs,
    chunking: &ChunkArgs,
) -> Result<PreprocessConfig> {
    if !input.exists() {
        return Err(eyre!(
            "herbal text not found at '{}'; convert the source HTML to plaintext first",
            input.display()
        ));
    }

    Ok(PreprocessConfig {
        input,
        output_dir: output_dir(config, output),
        chunking: chunk_config(config, chunking)?,
        files: config.files.clone(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_preprocess(
    config: &AppConfig,
    input: PathBuf,
    output: &OutputArgs,
    chunking: &ChunkArgs,
) -> Result<()> {
    let pre = preprocess_config(config, input, output, chunking)?;
    info!(
        input = %pre.input.display(),
        max_words = pre.chunking.max_words,
        overlap = pre.chunking.overlap,
        "preprocessing herbal text"
    );

    let reporter = CliProgress::new();
    let result = pipeline::preprocess(&pre, &reporter)?;
    print_preprocess_summary(&result);

    Ok(())
}

fn cmd_qa(config: &AppConfig, output: &OutputArgs, qa: &QaArgs) -> Result<()> {
    let qa_run = QaRunConfig {
        output_dir: output_dir(config, output),
        qa: qa_config(config, qa),
        files: config.files.clone(),
    };
    info!(
        out = %qa_run.output_dir.display(),
        seed = qa_run.qa.seed,
        shuffle = qa_run.qa.shuffle,
        "generating Q&A pairs"
    );

    let reporter = CliProgress::new();
    let result = pipeline::generate_qa(&qa_run, &reporter)?;
    print_qa_summary(&result);

    Ok(())
}

fn cmd_run(
    config: &AppConfig,
    input: PathBuf,
    output: &OutputArgs,
    chunking: &ChunkArgs,
    qa: &QaArgs,
) -> Result<()> {
    let pre = preprocess_config(config, input, output, chunking)?;
    let qa = qa_config(config, qa);
    info!(input = %pre.input.display(), out = %pre.output_dir.display(), "running full pipeline");

    let reporter = CliProgress::new();
    let result = pipeline::run(&pre, &qa, &reporter)?;
    print_preprocess_summary(&result.preprocess);
    print_qa_summary(&result.qa);

    Ok(())
}

fn cmd_check(config: &AppConfig, output: &OutputArgs) -> Result<()> {
    let dir = output_dir(config, output);
    let report = pipeline::check_dataset(&dir, &config.files, &config.qa.source_title)?;

    println!();
    println!("  Dataset summary ({})", dir.display());
    println!("  Herbs:                 {}", report.herb_count);
    println!("  With good content:     {}", report.good_herb_count);
    println!("  Q&A pairs:             {}", report.qa_total);
    println!("    Herb-specific:       {}", report.herb_specific);
    println!("    General:             {}", report.general);
    println!("    Ailment:             {}", report.ailment);
    println!("    Instruction:         {}", report.instruction_following);
    println!("  Avg answer length:     {:.1} chars", report.avg_answer_chars);
    println!();

    if report.herb_count == 0 || report.qa_total == 0 {
        return Err(eyre!("dataset in '{}' is empty", dir.display()));
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_preprocess_summary(result: &PreprocessResult) {
    println!();
    println!("  Preprocessing complete!");
    println!("  Run:     {}", result.run_id);
    println!("  Herbs:   {}", result.herb_count);
    println!("  Chunks:  {}", result.chunk_count);
    println!("  Entries: {}", result.paths.herbs.display());
    println!("  Chunked: {}", result.paths.chunks.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

fn print_qa_summary(result: &QaRunResult) {
    println!();
    println!("  Q&A generation complete!");
    println!("  Pairs:   {}", result.qa_count);
    println!("  JSONL:   {}", result.paths.qa_jsonl.display());
    println!("  JSON:    {}", result.paths.qa_json.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn artifact_written(&self, path: &Path, records: usize) {
        self.spinner
            .set_message(format!("Wrote {records} records to {}", path.display()));
    }

    fn done(&self) {
        self.spinner.set_message("Stage complete");
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}
