// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for doxy2md.
//!
//! This binary provides the `doxy2md` command for converting a directory of
//! Doxygen XML files into Markdown pages.

use chrono::Utc;
use doxy2md::renderer::{self, Overview, RenderOptions, Slugify};
use doxy2md::{corpus, pages, writer};
use lexopt::prelude::*;
use snafu::{ensure, prelude::*};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_INPUT: &str = "xml";
const DEFAULT_OUTPUT: &str = "markdown_docs";

/// How much to log.
#[derive(Clone, Copy)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

struct Cli {
    input: PathBuf,
    output: PathBuf,
    overview: Option<PathBuf>,
    slugify: Slugify,
    show_timestamp: bool,
    verbosity: Verbosity,
    dry_run: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("input {} is not a directory", path.display()))]
    InputNotADirectory { path: PathBuf },

    #[snafu(display("failed to read overview {}: {source}", path.display()))]
    ReadOverview {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse overview {}: {source}", path.display()))]
    ParseOverview {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("{source}"))]
    Output { source: writer::WriteError },

    #[snafu(display(
        "{documents} document(s) could not be parsed and {pages} page(s) could not be written"
    ))]
    PartialFailure { documents: usize, pages: usize },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert Doxygen XML documentation to Markdown

Usage: {name} [OPTIONS] [INPUT_DIR]

Arguments:
  [INPUT_DIR]  Directory of Doxygen XML files (default: {DEFAULT_INPUT})

Options:
  -o, --output <DIR>        Output directory (default: {DEFAULT_OUTPUT})
      --overview <FILE>     JSON file with the index page overview
      --anchor-style <S>    Table of contents anchors: legacy (default) or github

Index page (use --show-* or --hide-*):
      --show-timestamp      Include the generation time (default: off)
      --hide-timestamp      Omit the generation time

Other options:
  -q, --quiet               Only report warnings and errors
  -v, --verbose             Report every file read and page written
  -n, --dry-run             Show what would be written without writing
  -h, --help                Print help
  -V, --version             Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    let mut input: Option<PathBuf> = None;
    let mut output = PathBuf::from(DEFAULT_OUTPUT);
    let mut overview: Option<PathBuf> = None;
    let mut slugify: Slugify = renderer::legacy_anchor;
    let mut show_timestamp = false;
    let mut verbosity = Verbosity::Normal;
    let mut dry_run = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => output = parser.value()?.parse()?,
            Long("overview") => overview = Some(parser.value()?.parse()?),
            Long("anchor-style") => {
                let style: String = parser.value()?.parse()?;
                slugify = match style.as_str() {
                    "legacy" => renderer::legacy_anchor,
                    "github" => renderer::github_anchor,
                    _ => return Err("anchor-style must be legacy or github".into()),
                };
            }
            // Show/hide flags - last one wins
            Long("show-timestamp") => show_timestamp = true,
            Long("hide-timestamp") => show_timestamp = false,
            Short('q') | Long("quiet") => verbosity = Verbosity::Quiet,
            Short('v') | Long("verbose") => verbosity = Verbosity::Verbose,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) if input.is_none() => input = Some(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input: input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
        output,
        overview,
        slugify,
        show_timestamp,
        verbosity,
        dry_run,
    })
}

/// Installs the stderr log subscriber. `RUST_LOG` directives are honored.
fn init_tracing(verbosity: Verbosity) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        Verbosity::Quiet => tracing::Level::WARN,
        Verbosity::Normal => tracing::Level::INFO,
        Verbosity::Verbose => tracing::Level::DEBUG,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_tracing(cli.verbosity);

    ensure!(
        cli.input.is_dir(),
        InputNotADirectorySnafu { path: &cli.input }
    );

    let opts = RenderOptions {
        overview: match &cli.overview {
            Some(path) => load_overview(path)?,
            None => Overview::default(),
        },
        slugify: cli.slugify,
        generated_at: cli.show_timestamp.then(Utc::now),
    };

    let ingest = corpus::ingest_dir(&cli.input);
    let site = pages::compose_site(&ingest.corpus, &ingest.files, &opts);
    info!(
        "Composed {} pages ({} class pages)",
        site.len(),
        ingest.corpus.classes.len()
    );

    let failed_pages = if cli.dry_run {
        writer::preview_pages(&cli.output, &site);
        0
    } else {
        writer::write_pages(&cli.output, &site)
            .context(OutputSnafu)?
            .failures
            .len()
    };

    ensure!(
        ingest.failures.is_empty() && failed_pages == 0,
        PartialFailureSnafu {
            documents: ingest.failures.len(),
            pages: failed_pages,
        }
    );
    Ok(())
}

/// Reads the index page overview from a JSON file.
fn load_overview(path: &Path) -> Result<Overview, Error> {
    let json = std::fs::read_to_string(path).context(ReadOverviewSnafu { path })?;
    serde_json::from_str(&json).context(ParseOverviewSnafu { path })
}
