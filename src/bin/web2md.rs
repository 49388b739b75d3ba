//! CLI binary for web2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web2md::{convert, convert_to_file, ConversionConfig};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  web2md page.html --base-url https://example.com/page

  # From stdin, write to a file
  curl -s https://example.com | web2md - --base-url https://example.com -o page.md

  # Skip image annotation (no API key needed)
  web2md page.html --base-url https://example.com --no-annotate

  # Structured JSON output (blocks + markdown + stats)
  web2md page.html --base-url https://example.com --json > page.json

  # Custom description prompt and model
  web2md page.html --base-url https://example.com \
      --prompt prompt.txt --model gpt-4.1-mini

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY   API key for the built-in OpenAI describer

SETUP:
  1. Set API key:  export OPENAI_API_KEY=sk-...
  2. Convert:      web2md page.html --base-url https://example.com -o page.md

  With --no-annotate the conversion is fully offline and needs no key.
"#;

/// Convert captured HTML pages to Markdown with VLM image descriptions.
#[derive(Parser, Debug)]
#[command(
    name = "web2md",
    version,
    about = "Convert HTML pages to semantic blocks and Markdown",
    long_about = "Convert a captured HTML document into an ordered list of semantic blocks \
and render it as Markdown. Image blocks can be enriched with descriptions from a vision \
language model (OpenAI by default).",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML file path, or '-' to read from stdin.
    input: String,

    /// Base URL of the document; relative href/src resolve against it.
    #[arg(short, long, env = "WEB2MD_BASE_URL")]
    base_url: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "WEB2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Skip the image-annotation stage (fully offline).
    #[arg(long, env = "WEB2MD_NO_ANNOTATE")]
    no_annotate: bool,

    /// Number of concurrent describe calls.
    #[arg(short, long, env = "WEB2MD_CONCURRENCY", default_value_t = 50)]
    concurrency: usize,

    /// Per-describe-call timeout in seconds.
    #[arg(long, env = "WEB2MD_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Vision model ID (e.g. gpt-4.1-nano, gpt-4.1-mini).
    #[arg(long, env = "WEB2MD_MODEL")]
    model: Option<String>,

    /// Path to a text file containing a custom description prompt.
    #[arg(long, env = "WEB2MD_PROMPT")]
    prompt: Option<PathBuf>,

    /// Output structured JSON (blocks + markdown + stats) instead of Markdown.
    #[arg(long, env = "WEB2MD_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WEB2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "WEB2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read input ───────────────────────────────────────────────────────
    let html = if cli.input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read HTML from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(&cli.input)
            .await
            .with_context(|| format!("Failed to read HTML file '{}'", cli.input))?
    };

    let config = build_config(&cli).await?;

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = convert_to_file(&html, &cli.base_url, output_path, &config)
            .await
            .context("Conversion failed")?;
        if !cli.quiet {
            eprintln!(
                "{} blocks, {} images described, {}ms  →  {}",
                stats.block_count,
                stats.described_images,
                stats.total_duration_ms,
                output_path.display(),
            );
        }
    } else {
        let output = convert(&html, &cli.base_url, &config)
            .await
            .context("Conversion failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "{} blocks, {} images described, {}ms total",
                output.stats.block_count,
                output.stats.described_images,
                output.stats.total_duration_ms,
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .annotate_images(!cli.no_annotate)
        .concurrency(cli.concurrency)
        .describe_timeout_secs(cli.timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }

    if let Some(ref path) = cli.prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt from {path:?}"))?;
        builder = builder.image_prompt(prompt.trim().to_string());
    }

    builder.build().context("Invalid configuration")
}
