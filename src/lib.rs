pub mod util;
pub mod interpreter;
pub mod error;
pub mod repl;

use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use crate::error::ReplError;
use crate::interpreter::evaluator::DEFAULT_MAX_DEPTH;
use crate::interpreter::object::Object;
use crate::repl::{Mode, Outcome, Session};

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Source file to run; starts the interactive shell when omitted")]
    pub input: Option<PathBuf>,

    #[clap(long, conflicts_with = "tokens", help = "Print the parsed program instead of evaluating it")]
    pub ast: bool,
    #[clap(long, help = "Print the scanned tokens instead of evaluating")]
    pub tokens: bool,
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH, help = "Maximum nesting of function calls")]
    pub max_depth: usize,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

impl Config {
    pub fn mode(&self) -> Mode {
        if self.tokens {
            Mode::Tokens
        } else if self.ast {
            Mode::Ast
        } else {
            Mode::Evaluate
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if verbose { "mnky_lang=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Fails only if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .try_init();
}

pub fn run() -> Result<(), ReplError> {
    let config: Config = Config::parse();
    init_tracing(config.verbose);

    let session = Session::new(config.mode(), config.max_depth);

    match &config.input {
        Some(path) => run_file(path, session),
        None => {
            let stdin = std::io::stdin();
            repl::start(stdin.lock(), std::io::stdout(), session)
        },
    }
}

fn run_file(path: &Path, mut session: Session) -> Result<(), ReplError> {
    let source = std::fs::read_to_string(path)
        .map_err(|source| ReplError::ReadInput { path: path.to_path_buf(), source })?;

    tracing::debug!(path = %path.display(), bytes = source.len(), "running file");

    let mut stdout = std::io::stdout();

    match session.execute(&source, &mut stdout)? {
        Outcome::ParseErrors(errors) => Err(ReplError::Parse { path: path.to_path_buf(), count: errors.len() }),
        Outcome::Value(Some(Object::Error(message))) => Err(ReplError::Runtime(message)),
        Outcome::Value(_) | Outcome::Printed => Ok(()),
    }
}
