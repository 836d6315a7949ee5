//! CLI binary for stmtparse.
//!
//! A thin shim over the library crate: maps flags to `ClientConfig`, drives a
//! `Session` either once (`stmtparse FILE`) or from a line-based event loop
//! (`stmtparse --interactive`), and prints the rendered view.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stmtparse::{
    render, ClientConfig, DragEvent, FileRef, HttpTransport, Session, SessionObserver,
    SubmissionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── Busy indicator ───────────────────────────────────────────────────────────

/// Spinner shown while a submission is in flight.
struct SpinnerObserver {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }
}

impl SessionObserver for SpinnerObserver {
    fn on_submit_start(&self, file_name: &str, size: usize) {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix(stmtparse::render::BUSY_LABEL);
        bar.set_message(format!("{file_name} ({size} bytes)"));
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_submit_complete(&self, state: &SubmissionState, elapsed_ms: u64) {
        let Some(bar) = self.bar.lock().ok().and_then(|mut slot| slot.take()) else {
            return;
        };
        bar.finish_and_clear();
        let mark = match state {
            SubmissionState::Succeeded(_) => green("✔"),
            _ => red("✘"),
        };
        eprintln!(
            "{mark} {}",
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Parse one statement against the local service
  stmtparse statement.pdf

  # Point at another service, give up after 30 seconds
  stmtparse --endpoint http://10.0.0.5:5000 --timeout 30 statement.pdf

  # Machine-readable view
  stmtparse --json statement.pdf

  # Event loop: pick / drop / remove / submit / reset / show / quit
  stmtparse --interactive

INTERACTIVE COMMANDS:
  pick <path>         Select a file (as a file picker would)
  drop <path>...      Drag files over the drop zone and release them
  remove              Clear the selected file
  submit              Upload the selected file
  reset               Return to the initial state after a result or error
  show                Print the current view
  quit                Exit

ENVIRONMENT VARIABLES:
  STATEMENT_ENDPOINT  Parsing service origin (default http://localhost:5000)
  STATEMENT_TIMEOUT   Request timeout in seconds (0 = wait indefinitely)
  RUST_LOG            Override log filter
"#;

/// Submit credit-card statement PDFs to a parsing service.
#[derive(Parser, Debug)]
#[command(
    name = "stmtparse",
    version,
    about = "Submit credit-card statement PDFs to a parsing service",
    long_about = "Upload a credit-card statement PDF to the statement parsing service and \
display the extracted issuer, card digits, dates, balance and minimum payment.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Statement PDF to submit.
    #[arg(required_unless_present = "interactive")]
    input: Option<PathBuf>,

    /// Line-driven event loop instead of a single submission.
    #[arg(short, long)]
    interactive: bool,

    /// Parsing service origin.
    #[arg(long, env = "STATEMENT_ENDPOINT", default_value = stmtparse::config::DEFAULT_BASE_URL)]
    endpoint: String,

    /// Upload endpoint path.
    #[arg(long, env = "STATEMENT_PARSE_PATH", default_value = stmtparse::config::DEFAULT_PARSE_PATH)]
    parse_path: String,

    /// Request timeout in seconds; 0 waits indefinitely.
    #[arg(long, env = "STATEMENT_TIMEOUT", default_value_t = 0)]
    timeout: u64,

    /// Connect timeout in seconds; 0 uses the system default.
    #[arg(long, env = "STATEMENT_CONNECT_TIMEOUT", default_value_t = 0)]
    connect_timeout: u64,

    /// Also require the file to start with the %PDF signature.
    #[arg(long, env = "STATEMENT_VERIFY_MAGIC")]
    verify_magic: bool,

    /// Reject results with an empty issuer or malformed card digits.
    #[arg(long, env = "STATEMENT_STRICT")]
    strict: bool,

    /// Currency symbol prefixed to amounts.
    #[arg(long, env = "STATEMENT_CURRENCY", default_value = "$")]
    currency: String,

    /// Comma-separated issuers shown in the banner.
    #[arg(long, env = "STATEMENT_ISSUERS", value_delimiter = ',')]
    issuers: Option<Vec<String>>,

    /// Print the view as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the busy spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress everything except the final view.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the feedback that matters; keep library logs quiet
    // unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let transport = HttpTransport::new(&config).context("Failed to set up HTTP client")?;

    let mut session = Session::new(config);
    if show_progress {
        session = session.with_observer(SpinnerObserver::new());
    }

    if cli.interactive {
        run_interactive(&cli, &mut session, &transport).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(ref path) = cli.input else {
        anyhow::bail!("No input file given");
    };
    select_path(&mut session, path)?;
    // A rejected selection stays on screen; submitting would replace it.
    if session.can_submit() {
        session
            .submit(&transport)
            .await
            .context("Submission failed")?;
    }
    print_view(&cli, &session)?;

    Ok(match session.state() {
        SubmissionState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder()
        .base_url(&cli.endpoint)
        .parse_path(&cli.parse_path)
        .request_timeout(Duration::from_secs(cli.timeout))
        .connect_timeout(Duration::from_secs(cli.connect_timeout))
        .verify_pdf_magic(cli.verify_magic)
        .strict_result(cli.strict)
        .currency_symbol(&cli.currency);

    if let Some(ref issuers) = cli.issuers {
        builder = builder.supported_issuers(issuers.iter().map(|s| s.trim().to_string()));
    }

    builder.build().context("Invalid configuration")
}

/// Read a local file and offer it to the session.
///
/// An unreadable path is a process error; a readable non-PDF is a
/// validation failure shown in the view.
fn select_path(session: &mut Session, path: &Path) -> Result<()> {
    let file = FileRef::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    session.select(file)?;
    Ok(())
}

fn print_view(cli: &Cli, session: &Session) -> Result<()> {
    let view = render(session);
    if cli.json {
        let json = serde_json::to_string_pretty(&view).context("Failed to serialise view")?;
        println!("{json}");
    } else {
        print!("{view}");
    }
    Ok(())
}

async fn run_interactive(
    cli: &Cli,
    session: &mut Session,
    transport: &HttpTransport,
) -> Result<()> {
    print_view(cli, session)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        let outcome: Result<()> = match command {
            "pick" => match args.first() {
                Some(p) => select_path(session, Path::new(p)),
                None => Err(anyhow::anyhow!("usage: pick <path>")),
            },
            "drop" => drop_paths(session, &args),
            "remove" => session.remove().map_err(Into::into),
            "submit" => session.submit(transport).await.map(|_| ()).map_err(Into::into),
            "reset" => session.reset().map_err(Into::into),
            "show" => Ok(()),
            "quit" | "exit" => break,
            "help" => {
                eprintln!("{AFTER_HELP}");
                continue;
            }
            other => Err(anyhow::anyhow!("unknown command '{other}' (try 'help')")),
        };

        match outcome {
            Ok(()) => print_view(cli, session)?,
            Err(e) => eprintln!("{} {e:#}", red("✗")),
        }
    }
    Ok(())
}

/// Simulate dragging files over the drop zone and releasing them.
fn drop_paths(session: &mut Session, paths: &[&str]) -> Result<()> {
    let files = paths
        .iter()
        .map(|p| FileRef::from_path(p).with_context(|| format!("Failed to read {p}")))
        .collect::<Result<Vec<_>>>()?;
    session.drag(DragEvent::Enter)?;
    session.drag(DragEvent::Over)?;
    session.drag(DragEvent::Drop(files))?;
    Ok(())
}
