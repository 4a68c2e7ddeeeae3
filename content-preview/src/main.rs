//! Run the article content pipeline on a single document.
//!
//! Reads a `RawArticle` JSON document (`{"slug", "raw_content",
//! "raw_source"}`) from a file or stdin and prints the prepared HTML, or the
//! full `PreparedArticle` with `--json`. `--sample` uses the bundled
//! SCP-173 fixture instead of reading input.
//!
//! Usage: cargo run -p content-preview -- [--json] [--sample] [PATH]

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use content::{ContentConfig, prepare_article_report, telemetry};
use payloads::RawArticle;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "content-preview")]
#[command(about = "Recover, sanitize and legibility-correct one article")]
struct Args {
    /// Print the full PreparedArticle as JSON instead of the HTML
    #[arg(long)]
    json: bool,

    /// Use the bundled SCP-173 article instead of reading input
    #[arg(long, conflicts_with = "path")]
    sample: bool,

    /// RawArticle JSON document; stdin when omitted or `-`
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

fn read_article(args: &Args) -> Result<RawArticle> {
    if args.sample {
        return Ok(test_helpers::mock::mock_article());
    }
    let input = match args.path.as_ref().filter(|p| p.as_os_str() != "-") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            input
        }
    };
    serde_json::from_str(&input).context("Input is not a RawArticle document")
}

fn run(args: Args) -> Result<()> {
    let config = ContentConfig::from_env();

    let article = read_article(&args)?;
    info!(slug = %article.slug, "preparing article");
    let prepared = prepare_article_report(&article, &config)
        .with_context(|| format!("Failed to prepare {}", article.slug))?;
    info!(recovered_images = prepared.recovered_images, "article prepared");

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &prepared)?;
    } else {
        stdout.write_all(prepared.html.as_bytes())?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let subscriber = telemetry::get_subscriber("info".into(), io::stderr);
    telemetry::init_subscriber(subscriber)?;

    if let Err(e) = run(args) {
        telemetry::log_error(e);
        std::process::exit(1);
    }
    Ok(())
}
