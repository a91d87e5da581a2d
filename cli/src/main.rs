//! Command-line front end for promptkit.
//!
//! Every subcommand reads its text from a file argument, or from stdin when
//! the argument is omitted or `-`.
//!
//! # Usage
//!
//! ```bash
//! promptkit tokens notes.md --model gpt-4o
//! promptkit truncate --max-tokens 500 notes.md
//! promptkit chunk --max-tokens 256 --overlap 32 --json notes.md
//! cat reply.txt | promptkit extract-json --all
//! promptkit merge --separator "---" a.txt b.txt
//!
//! # Uses LLM_BASE_URL, LLM_MODEL and LLM_API_KEY
//! promptkit generate --max-tokens 3000 prompt.txt
//! ```
//!
//! `--config <file>` merges a TOML or JSON model table over the built-in one;
//! without it, `PROMPTKIT_MODEL_CONFIG` is honoured. Logs go to stderr and
//! follow `RUST_LOG`, or `-v`/`-vv` when it is unset.

mod commands;
mod input;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use promptkit_core::DEFAULT_SNIPPET_SEPARATOR;
use promptkit_models::ModelTable;
use tracing_subscriber::EnvFilter;

use crate::commands::Session;
use crate::input::Input;

/// Model used when `--model` is not given.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Parser)]
#[command(name = "promptkit", version, about)]
struct Args {
    /// Model identifier used for token estimation and pricing.
    #[arg(short, long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Model table file (TOML or JSON) merged over the built-in table.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). Ignored when `RUST_LOG` is set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collapse whitespace runs to single spaces
    Clean {
        #[command(flatten)]
        input: Input,
    },
    /// Estimate the token count
    Tokens {
        #[command(flatten)]
        input: Input,
    },
    /// Truncate to a token budget, keeping whole sentences where possible
    Truncate {
        /// Token budget
        #[arg(long)]
        max_tokens: usize,
        #[command(flatten)]
        input: Input,
    },
    /// Split into overlapping chunks
    Chunk {
        /// Target chunk size in tokens
        #[arg(long)]
        max_tokens: usize,
        /// Tokens carried over from the previous chunk
        #[arg(long, default_value_t = 0)]
        overlap: usize,
        /// Print chunk records as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        input: Input,
    },
    /// Estimate the USD cost of sending the text
    Cost {
        /// Expected completion tokens (default: a quarter of the prompt)
        #[arg(long)]
        response_tokens: Option<usize>,
        #[command(flatten)]
        input: Input,
    },
    /// Shorten to a character budget, keeping the first and last sentences
    Summarise {
        /// Character budget
        #[arg(long)]
        max_chars: usize,
        #[command(flatten)]
        input: Input,
    },
    /// Extract JSON from noisy model output
    ExtractJson {
        /// Print every JSON value found as an array
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        input: Input,
    },
    /// Merge snippet files, dropping blank ones
    Merge {
        /// Separator placed between snippets
        #[arg(long, default_value = DEFAULT_SNIPPET_SEPARATOR)]
        separator: String,
        /// Snippet files, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Send the text to an OpenAI-compatible endpoint configured from the environment
    Generate {
        /// Truncate the prompt to this many tokens before sending
        #[arg(long)]
        max_tokens: Option<usize>,
        #[command(flatten)]
        input: Input,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let table = match &args.config {
        Some(path) => ModelTable::from_path(path)
            .with_context(|| format!("failed to load model config {}", path.display()))?,
        None => ModelTable::shared().clone(),
    };
    let session = Session::new(table, args.model);

    let output = match args.command {
        Commands::Clean { input } => session.clean(&input.read()?),
        Commands::Tokens { input } => session.tokens(&input.read()?)?,
        Commands::Truncate { max_tokens, input } => session.truncate(&input.read()?, max_tokens)?,
        Commands::Chunk {
            max_tokens,
            overlap,
            json,
            input,
        } => {
            let text = input.read()?;
            if json {
                session.chunk_json(&input.document_id(), &text, max_tokens, overlap)?
            } else {
                session.chunk(&text, max_tokens, overlap)?
            }
        }
        Commands::Cost {
            response_tokens,
            input,
        } => session.cost(&input.read()?, response_tokens)?,
        Commands::Summarise { max_chars, input } => session.summarise(&input.read()?, max_chars)?,
        Commands::ExtractJson { all, input } => session.extract_json(&input.read()?, all)?,
        Commands::Merge { separator, files } => {
            let snippets = files
                .iter()
                .map(|path| input::read_file(path))
                .collect::<Result<Vec<_>>>()?;
            session.merge(&snippets, &separator)
        }
        Commands::Generate { max_tokens, input } => {
            session.generate(&input.read()?, max_tokens)?
        }
    };

    println!("{output}");
    Ok(())
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
