use std::path::PathBuf;
use thiserror::Error;

/// Failures of the shell and of running a source file. Runtime errors inside the language are
/// values, not `ReplError`s; they only become one when a whole file fails.
#[derive(Debug, Error)]
pub enum ReplError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{count} parser error(s) in {}", .path.display())]
    Parse {
        path: PathBuf,
        count: usize,
    },

    #[error("{0}")]
    Runtime(String),
}
