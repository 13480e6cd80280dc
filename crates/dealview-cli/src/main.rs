//! dealview: terminal viewer for deal negotiation analysis reports.

mod shell;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dealview_core::{
    AnalysisResult, PlainStyle, Report, Style, Tab, TextRenderer, Tier, TracingObserver,
};
use dealview_runtime::{
    HttpTransport, RuntimeConfig, SubmissionController, SubmissionState, SubmitOutcome,
};
use supports_color::Stream;
use tracing_subscriber::EnvFilter;

use crate::style::AnsiStyle;

#[derive(Debug, Parser)]
#[command(name = "dealview", version, about = "View deal negotiation analysis reports")]
struct Cli {
    /// YAML runtime configuration.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Analysis service root URL. Overrides the config file and DEALVIEW_BASE_URL.
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run an analysis for a deal and print the report.
    Run(RunArgs),

    /// Render a saved analysis response without contacting the service.
    Render(RenderArgs),

    /// Interactive session: submit deals and browse their reports.
    Shell,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Deal identifier to analyze.
    deal_id: String,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// File holding a response body, wrapped in `result` or bare.
    file: PathBuf,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// Risk tier to show: conservative, moderate or aggressive.
    #[arg(long, value_name = "TIER", default_value = "moderate")]
    tier: Tier,

    /// Tab to show: context, knowledge, gaps or debug.
    #[arg(long, value_name = "TAB", default_value = "context")]
    tab: Tab,

    /// Expand the tier rationale.
    #[arg(long)]
    rationale: bool,

    /// Expand the debug trace.
    #[arg(long)]
    debug: bool,

    /// Print the decoded result as JSON instead of the report.
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // -v overrides RUST_LOG.
    let env_filter = if verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(supports_color::on(Stream::Stderr).is_some())
        .try_init();
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    config.apply_env();
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }

    config.validate().context("invalid runtime configuration")?;
    tracing::debug!(base_url = %config.base_url, timeout = ?config.request_timeout, "Loaded configuration");
    Ok(config)
}

fn controller(config: &RuntimeConfig) -> Result<SubmissionController<HttpTransport>> {
    let transport = HttpTransport::new(config).context("building HTTP client")?;
    Ok(SubmissionController::with_observer(
        transport,
        Arc::new(TracingObserver),
    ))
}

/// Build a report with the requested view state applied.
fn report_with_view(result: Arc<AnalysisResult>, view: &ViewArgs) -> Report {
    let mut report = Report::with_observer(result, Arc::new(TracingObserver));
    report.select_tier(view.tier);
    report.select_tab(view.tab);

    if view.rationale {
        if let Err(error) = report.toggle_rationale() {
            tracing::warn!(%error, "Ignoring --rationale");
        }
    }
    if view.debug {
        report.toggle_debug();
    }
    report
}

fn print_result(result: Arc<AnalysisResult>, view: &ViewArgs, color: bool) -> Result<()> {
    if view.json {
        let json = serde_json::to_string_pretty(result.as_ref()).context("encoding result")?;
        println!("{}", json);
        return Ok(());
    }

    let report = report_with_view(result, view);
    let style: &dyn Style = if color { &AnsiStyle } else { &PlainStyle };
    print!("{}", TextRenderer::new(style).render(&report.render()));
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let color = !cli.no_color && supports_color::on(Stream::Stdout).is_some();

    match &cli.command {
        Command::Run(args) => {
            let controller = controller(&load_config(&cli)?)?;
            eprintln!("Running analysis for {}...", args.deal_id);

            match controller.submit(&args.deal_id).await {
                SubmitOutcome::Applied(SubmissionState::Success { result, .. }) => {
                    print_result(result, &args.view, color)?;
                    Ok(ExitCode::SUCCESS)
                }
                SubmitOutcome::Applied(SubmissionState::Failure { message, .. }) => {
                    eprintln!("{}", message);
                    Ok(ExitCode::FAILURE)
                }
                SubmitOutcome::Rejected(reason) => {
                    bail!("submission rejected: {}", reason.as_str())
                }
                other => bail!("submission did not complete: {:?}", other),
            }
        }
        Command::Render(args) => {
            let body = std::fs::read_to_string(&args.file)
                .with_context(|| format!("reading {}", args.file.display()))?;
            let result = AnalysisResult::from_json(&body)
                .with_context(|| format!("decoding {}", args.file.display()))?;
            print_result(Arc::new(result), &args.view, color)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Shell => {
            let controller = Arc::new(controller(&load_config(&cli)?)?);
            shell::run(controller, color).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}
