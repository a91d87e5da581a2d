//! Reading command input from a file or stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Text source shared by every subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct Input {
    /// File to read; stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,
}

impl Input {
    /// Reads the whole input as UTF-8.
    pub fn read(&self) -> Result<String> {
        match self.file() {
            Some(path) => read_file(path),
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                Ok(text)
            }
        }
    }

    /// Identifier used for chunk records: the file stem, or `stdin`.
    pub fn document_id(&self) -> String {
        self.file()
            .and_then(Path::file_stem)
            .map_or_else(|| "stdin".to_string(), |stem| stem.to_string_lossy().into_owned())
    }

    fn file(&self) -> Option<&Path> {
        self.path.as_deref().filter(|path| *path != Path::new("-"))
    }
}

/// Reads a UTF-8 file, naming it in the error.
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
