//! Headless mode: read a paste, run the pipeline once, print a report.

use crate::report::Report;
use anyhow::Context;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use subroll_core::{config::Config, resolver::DisplayNameCache, summary, ExtractionResult};
use subroll_lookup::IvrClient;

/// Exit code for `--strict` runs that hit an unparseable block.
pub const EXIT_UNPARSEABLE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned `line  login` rows; errors marked with `!!`.
    #[default]
    Text,
    /// One pretty-printed JSON document.
    Json,
    /// One JSON object per line, tagged with `type`.
    Jsonl,
    /// Bare logins, one per line.
    Names,
}

/// Where the paste comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// `None` and `-` both mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(p) if p.as_os_str() != "-" => Input::File(p.to_path_buf()),
            _ => Input::Stdin,
        }
    }

    /// Input for the interactive TUI. With no FILE and stdin on a terminal
    /// there is nothing to read, so the TUI opens an empty paste (`None`).
    pub fn for_tui(arg: Option<&Path>, stdin_is_terminal: bool) -> Option<Self> {
        match arg {
            None if stdin_is_terminal => None,
            _ => Some(Self::from_arg(arg)),
        }
    }

    /// Read the whole input, replacing invalid UTF-8.
    pub fn read(&self) -> anyhow::Result<String> {
        let mut bytes = Vec::new();
        match self {
            Input::Stdin => {
                std::io::stdin().read_to_end(&mut bytes).context("reading stdin")?;
            }
            Input::File(path) => {
                bytes = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub input: Option<PathBuf>,
    pub format: OutputFormat,
    pub summary: bool,
    pub query: Option<String>,
    pub names: bool,
    pub normalize_only: bool,
    pub in_place: bool,
    pub explain: bool,
    pub strict: bool,
}

/// Run one headless pass, writing the report to `out`.
///
/// Returns the process exit code: `0`, or [`EXIT_UNPARSEABLE`] under
/// `--strict` when any block failed.
pub fn run(opts: &HeadlessOptions, config: &Config, out: &mut impl Write) -> anyhow::Result<u8> {
    let input = Input::from_arg(opts.input.as_deref());
    let raw = input.read()?;
    tracing::debug!(bytes = raw.len(), ?input, "headless: input read");

    if opts.normalize_only {
        let text = subroll_core::normalize(&raw);
        return match (&input, opts.in_place) {
            (Input::File(path), true) => {
                if text != raw {
                    std::fs::write(path, &text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "headless: rewrote file");
                }
                Ok(0)
            }
            (Input::Stdin, true) => anyhow::bail!("--in-place needs a FILE, not stdin"),
            (_, false) => {
                out.write_all(text.as_bytes())?;
                Ok(0)
            }
        };
    }

    let (text, result) = subroll_core::process(&raw);
    let names = if opts.names {
        resolve_names(&result, config)?
    } else {
        HashMap::new()
    };

    let mut report = Report::new(&text, &result, &names).explain(opts.explain);
    if opts.summary {
        report = report.summary(opts.query.as_deref());
    }
    out.write_all(report.render(opts.format)?.as_bytes())?;
    out.flush()?;
    eprintln!("{}", report.footer());

    if opts.strict && !result.is_clean() {
        tracing::debug!(errors = result.errors.len(), "headless: strict run failed");
        return Ok(EXIT_UNPARSEABLE);
    }
    Ok(0)
}

/// Look up every distinct login concurrently. Misses and failures are simply
/// absent from the map.
fn resolve_names(
    result: &ExtractionResult,
    config: &Config,
) -> anyhow::Result<HashMap<String, String>> {
    let Some(cache) = subroll_lookup::cache_from_config(&config.lookup) else {
        eprintln!("display-name lookup is disabled in config; printing logins only");
        return Ok(HashMap::new());
    };
    let logins: Vec<String> = summary::tally(&result.hits).into_iter().map(|r| r.name).collect();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting lookup runtime")?;
    let resolved = runtime.block_on(lookup_all(Arc::new(cache), logins));
    tracing::debug!(resolved = resolved.len(), "headless: display names resolved");
    Ok(resolved)
}

async fn lookup_all(
    cache: Arc<DisplayNameCache<IvrClient>>,
    logins: Vec<String>,
) -> HashMap<String, String> {
    let mut tasks = tokio::task::JoinSet::new();
    for login in logins {
        let cache = Arc::clone(&cache);
        tasks.spawn(async move {
            let display = cache.lookup(&login).await;
            (login, display)
        });
    }

    let mut names = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((login, Some(display))) => {
                names.insert(login, display);
            }
            Ok((_, None)) => {}
            Err(e) => tracing::warn!(error = %e, "headless: lookup task failed"),
        }
    }
    names
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
