//! CLI binary for slidemark.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `TransformerConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use slidemark::{
    convert, download_filename, fallback_from_filename, ConversionConfig,
    ConversionProgressCallback, DocumentStore, OllamaTransformer, OpenAiTransformer,
    ProgressCallback, TextTransformer, TransformerConfig,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
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
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus per-page log lines.
/// Works correctly when pages complete out of order.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar length is set by `on_conversion_start` once the page count
    /// is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Refining");
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_skipped(&self, page_num: usize, total: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            dim("·"),
            page_num,
            total,
            dim("blank, skipped"),
        ));
        self.bar.inc(1);
    }

    fn on_page_complete(&self, page_num: usize, total: usize, markdown_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{markdown_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: String) {
        let msg = if error.len() > 80 {
            format!("{}…", &error[..79])
        } else {
            error
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, refined_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}/{} pages refined",
            green("✔"),
            bold(&refined_count.to_string()),
            total_pages
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion against a local Ollama (stdout)
  slidemark week3-slides.pdf

  # Convert to a file with a specific model
  slidemark week3-slides.pdf -o week3.md --model llama3.2

  # OpenAI-compatible endpoint
  slidemark deck.pdf --provider openai --endpoint https://api.openai.com \
      --model gpt-4o-mini --api-key $OPENAI_API_KEY

  # Convert and persist into a document store
  slidemark deck.pdf --store ./data

  # Store maintenance
  slidemark --store ./data --list
  slidemark --store ./data --delete 3f2a9c…

ENVIRONMENT VARIABLES:
  SLIDEMARK_ENDPOINT     Transformer endpoint URL
  SLIDEMARK_MODEL        Model identifier
  SLIDEMARK_API_KEY      Bearer token for OpenAI-compatible services
"#;

/// Convert lecture-slide PDFs to cleaned Markdown using LLM refinement.
#[derive(Parser, Debug)]
#[command(
    name = "slidemark",
    version,
    about = "Convert lecture-slide PDFs to cleaned Markdown using LLM refinement",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file to convert.
    input: Option<PathBuf>,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transformer service flavour.
    #[arg(long, value_enum, default_value = "ollama")]
    provider: ProviderArg,

    /// Transformer endpoint URL.
    #[arg(long, env = "SLIDEMARK_ENDPOINT", default_value = "http://localhost:11434")]
    endpoint: String,

    /// Model identifier.
    #[arg(long, env = "SLIDEMARK_MODEL", default_value = "llama3.2")]
    model: String,

    /// Bearer token for OpenAI-compatible services.
    #[arg(long, env = "SLIDEMARK_API_KEY")]
    api_key: Option<String>,

    /// Maximum simultaneous transformer calls.
    #[arg(short, long, default_value_t = 3)]
    concurrency: usize,

    /// Per-page transformer deadline in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Title used when the document has no `## ` heading.
    /// Defaults to the input file's base name.
    #[arg(long)]
    title_fallback: Option<String>,

    /// Path to a text file containing a custom page prompt
    /// ({page} / {text} placeholders).
    #[arg(long)]
    prompt: Option<PathBuf>,

    /// Persist the converted document into a store rooted at this directory.
    #[arg(long, value_name = "DIR")]
    store: Option<PathBuf>,

    /// List stored documents (requires --store).
    #[arg(long, conflicts_with = "input")]
    list: bool,

    /// Delete a stored document by id (requires --store).
    #[arg(long, value_name = "ID", conflicts_with = "input")]
    delete: Option<String>,

    /// Output structured JSON instead of Markdown.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum ProviderArg {
    Ollama,
    Openai,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
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

    // ── Store maintenance modes ──────────────────────────────────────────
    if cli.list || cli.delete.is_some() {
        let dir = cli
            .store
            .clone()
            .context("--list/--delete require --store <DIR>")?;
        let store = DocumentStore::open(&dir).context("Failed to open document store")?;

        if cli.list {
            let records = store.list().context("Failed to list documents")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for r in &records {
                    println!(
                        "{}  {}  {}  {}",
                        r.id,
                        r.created_at,
                        bold(&r.title),
                        dim(&r.pdf_name)
                    );
                }
                if records.is_empty() {
                    eprintln!("no stored documents");
                }
            }
            return Ok(());
        }

        if let Some(ref id) = cli.delete {
            store
                .delete(id)
                .with_context(|| format!("Failed to delete document '{id}'"))?;
            if !cli.quiet {
                eprintln!("{} deleted {}", green("✔"), id);
            }
            return Ok(());
        }
    }

    // ── Conversion ───────────────────────────────────────────────────────
    let input = cli
        .input
        .clone()
        .context("no input PDF given (see --help)")?;
    let pdf_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read '{}'", input.display()))?;

    let transformer = build_transformer(&cli)?;
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    let output = convert(&bytes, transformer, &config)
        .await
        .context("Conversion failed")?;

    let fallback = cli
        .title_fallback
        .clone()
        .unwrap_or_else(|| fallback_from_filename(&pdf_name));
    let stats = output.stats.clone();
    let json_payload = if cli.json {
        Some(serde_json::to_string_pretty(&output)?)
    } else {
        None
    };
    let document = output.into_document(&fallback);

    // ── Persist ──────────────────────────────────────────────────────────
    if let Some(ref dir) = cli.store {
        let store = DocumentStore::open(dir).context("Failed to open document store")?;
        let record = store
            .save(&document, &pdf_name)
            .context("Failed to store document")?;
        if !cli.quiet {
            eprintln!(
                "{} stored as {}  {}",
                green("✔"),
                bold(&record.id),
                dim(&download_filename(&record.pdf_name))
            );
        }
    }

    // ── Emit ─────────────────────────────────────────────────────────────
    if let Some(json) = json_payload {
        println!("{json}");
    } else if let Some(ref path) = cli.output {
        tokio::fs::write(path, &document.markdown)
            .await
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}  {}/{} pages  {}ms  →  {}",
                green("✔"),
                stats.refined_pages,
                stats.total_pages,
                stats.total_duration_ms,
                bold(&path.display().to_string()),
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(document.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !document.markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        if !cli.quiet && !show_progress {
            eprintln!(
                "Converted {}/{} pages ({} blank) in {}ms — \"{}\"",
                stats.refined_pages,
                stats.total_pages,
                stats.blank_pages,
                stats.total_duration_ms,
                document.title,
            );
        }
    }

    Ok(())
}

/// Build the transformer client from CLI flags.
fn build_transformer(cli: &Cli) -> Result<Arc<dyn TextTransformer>> {
    let mut tc = TransformerConfig::new(&cli.endpoint, &cli.model);
    if let Some(ref key) = cli.api_key {
        tc = tc.with_api_key(key);
    }

    Ok(match cli.provider {
        ProviderArg::Ollama => Arc::new(
            OllamaTransformer::new(tc).context("Failed to build Ollama client")?,
        ),
        ProviderArg::Openai => Arc::new(
            OpenAiTransformer::new(tc).context("Failed to build OpenAI-compatible client")?,
        ),
    })
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .concurrency(cli.concurrency)
        .transform_timeout_secs(cli.timeout);

    if let Some(ref path) = cli.prompt {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt from {:?}", path))?;
        builder = builder.page_prompt(template);
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
