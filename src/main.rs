use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use subroll::headless::{self, HeadlessOptions, OutputFormat};
use subroll_core::config::Config;

const DEBUG_LOG: &str = "/tmp/subroll-debug.log";

#[derive(Parser)]
#[command(
    name = "subroll",
    version,
    about = "Pull Twitch logins out of pasted sub/gift notifications"
)]
struct Cli {
    /// Paste file to open. `-` reads stdin; so does nothing when stdin is
    /// piped or in headless mode.
    file: Option<PathBuf>,

    /// Write debug logs to /tmp/subroll-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Print a report instead of opening the TUI.
    #[arg(long)]
    headless: bool,

    /// Use this config file instead of ~/.config/subroll/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "headless")]
    format: OutputFormat,

    /// Print per-user counts instead of one row per block.
    #[arg(long, requires = "headless")]
    summary: bool,

    /// Keep summary rows whose login or display name contains Q.
    #[arg(long, value_name = "Q", requires = "summary")]
    query: Option<String>,

    /// Resolve display names over HTTP. The TUI always does unless
    /// lookups are off.
    #[arg(long, requires = "headless")]
    names: bool,

    /// Never resolve display names. Wins over --names.
    #[arg(long)]
    no_names: bool,

    /// Print the normalized text and stop.
    #[arg(long, requires = "headless")]
    normalize_only: bool,

    /// With --normalize-only, rewrite FILE instead of printing.
    #[arg(long, requires = "normalize_only")]
    in_place: bool,

    /// Add the denylist entries that fired to each unparseable block.
    #[arg(long, requires = "headless")]
    explain: bool,

    /// Exit with code 2 when any block is unparseable.
    #[arg(long, requires = "headless")]
    strict: bool,
}

impl Cli {
    fn names(&self) -> bool {
        self.names && !self.no_names
    }

    fn headless_options(&self) -> HeadlessOptions {
        HeadlessOptions {
            input: self.file.clone(),
            format: self.format,
            summary: self.summary,
            query: self.query.clone(),
            names: self.names(),
            normalize_only: self.normalize_only,
            in_place: self.in_place,
            explain: self.explain,
            strict: self.strict,
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if self.no_names {
            config.lookup.enabled = false;
        }
        Ok(config)
    }
}

fn init_logging(debug: bool, headless: bool) -> anyhow::Result<()> {
    let filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
    };

    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter("debug"))
            .init();
        tracing::info!("subroll debug log started, tail -f {DEBUG_LOG}");
    } else if headless && std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("warn"))
            .init();
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.headless)?;
    let config = cli.load_config()?;

    if cli.headless {
        let mut stdout = std::io::stdout().lock();
        let code = headless::run(&cli.headless_options(), &config, &mut stdout)?;
        return Ok(ExitCode::from(code));
    }

    let input = headless::Input::for_tui(cli.file.as_deref(), std::io::stdin().is_terminal());
    let doc = match input {
        Some(headless::Input::File(path)) => subroll_tui::Document::load(&path)?,
        Some(stdin @ headless::Input::Stdin) => subroll_tui::Document::from_raw(None, &stdin.read()?),
        None => subroll_tui::Document::from_raw(None, ""),
    };
    subroll_tui::run(doc, config)?;
    Ok(ExitCode::SUCCESS)
}
