//! namescreen - adverse media name screening
//!
//! Screens a person's name against a news article and reports whether the
//! article refers to them. Exit status: 0 no match, 1 match, 2 error.

mod error;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use namescreen_core::{
    synthetic_cases, EvalCase, Evaluator, ScreeningConfig, Screener,
};
use namescreen_llm::{LlmNicknameSource, LlmOracle, LlmSettings};
use tracing_subscriber::EnvFilter;

use error::CliError;
use report::ScreeningReport;

const EXIT_MATCH: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "namescreen")]
#[command(about = "Match individual names against news articles for adverse media screening")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/namescreen/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress and show variants, extracted names and metric scores
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Screen one name against one article
    Screen(ScreenArgs),
    /// Measure accuracy on labelled cases
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
struct ScreenArgs {
    /// Full name of the individual to search for (e.g. "John Smith")
    #[arg(long, short = 'n')]
    name: String,

    /// Text file containing the news article
    #[arg(long, short = 'f')]
    filepath: PathBuf,

    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Match threshold, 0-100 (overrides config)
    #[arg(long)]
    threshold: Option<f64>,

    /// No-match threshold, 0-100 (overrides config)
    #[arg(long)]
    low_threshold: Option<f64>,

    /// Also write the report to this path (.txt/.json added when missing)
    #[arg(long)]
    save_report: Option<PathBuf>,

    /// Use the configured LLM for uncertain cases and nickname lookup
    #[arg(long)]
    llm: bool,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// JSON file with an array of cases; built-in synthetic cases when omitted
    #[arg(long)]
    cases: Option<PathBuf>,

    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Use the configured LLM for uncertain cases and nickname lookup
    #[arg(long)]
    llm: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// LLM collaborators, kept alive for as long as the screener borrows them
struct LlmCollaborators {
    oracle: LlmOracle,
    nicknames: LlmNicknameSource,
}

impl LlmCollaborators {
    fn from_config(config: &ScreeningConfig) -> Result<Self, CliError> {
        let settings = LlmSettings::from_config(&config.llm)?;
        tracing::info!(provider = %settings.provider, model = %settings.model, "LLM enabled");
        Ok(Self {
            oracle: LlmOracle::new(settings.clone()),
            nicknames: LlmNicknameSource::new(settings),
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Logs go to stderr; RUST_LOG wins over --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = match &cli.config {
        Some(path) => ScreeningConfig::load(path)?,
        None => ScreeningConfig::load_default()?,
    };

    match cli.command {
        Commands::Screen(args) => cmd_screen(args, config, cli.verbose),
        Commands::Evaluate(args) => cmd_evaluate(args, config),
    }
}

fn cmd_screen(
    args: ScreenArgs,
    config: ScreeningConfig,
    verbose: bool,
) -> Result<ExitCode, CliError> {
    Ok(if screen(args, config, verbose)? {
        ExitCode::from(EXIT_MATCH)
    } else {
        ExitCode::SUCCESS
    })
}

/// Screen, print and optionally save the report; true on a match
fn screen(args: ScreenArgs, mut config: ScreeningConfig, verbose: bool) -> Result<bool, CliError> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CliError::EmptyName);
    }

    if let Some(high) = args.threshold {
        config.thresholds.high = high;
    }
    if let Some(low) = args.low_threshold {
        config.thresholds.low = low;
    }
    config.validate()?;

    let article = load_article(&args.filepath)?;
    tracing::info!(
        path = %args.filepath.display(),
        chars = article.chars().count(),
        "article loaded"
    );

    let llm = args
        .llm
        .then(|| LlmCollaborators::from_config(&config))
        .transpose()?;
    let screener = build_screener(&config, llm.as_ref())?;

    let outcome = screener.screen(name, &article);
    let report = ScreeningReport::new(&outcome);
    tracing::info!(risk = ?report.risk().risk_level, "screening finished");

    let rendered = report.render(args.output, verbose)?;
    println!("{rendered}");

    if let Some(path) = &args.save_report {
        let saved = report::save(&rendered, path, args.output)?;
        eprintln!("Report saved to: {}", saved.display());
    }

    Ok(outcome.decision.matched)
}

fn cmd_evaluate(args: EvaluateArgs, config: ScreeningConfig) -> Result<ExitCode, CliError> {
    config.validate()?;

    let cases = match &args.cases {
        Some(path) => load_cases(path)?,
        None => synthetic_cases(),
    };

    let llm = args
        .llm
        .then(|| LlmCollaborators::from_config(&config))
        .transpose()?;
    let screener = build_screener(&config, llm.as_ref())?;

    let report = Evaluator::new(&screener).run(&cases);
    println!("{}", report::render_evaluation(&report, args.output)?);

    Ok(ExitCode::SUCCESS)
}

fn build_screener<'a>(
    config: &ScreeningConfig,
    llm: Option<&'a LlmCollaborators>,
) -> Result<Screener<'a>, CliError> {
    let screener = Screener::from_config(config)?;
    Ok(match llm {
        Some(llm) => screener
            .with_oracle(&llm.oracle)
            .with_nickname_source(&llm.nicknames),
        None => screener,
    })
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn load_article(path: &Path) -> Result<String, CliError> {
    let content = read_file(path)?;
    let content = content.trim();
    if content.is_empty() {
        return Err(CliError::EmptyArticle(path.display().to_string()));
    }
    Ok(content.to_string())
}

fn load_cases(path: &Path) -> Result<Vec<EvalCase>, CliError> {
    Ok(serde_json::from_str(&read_file(path)?)?)
}
