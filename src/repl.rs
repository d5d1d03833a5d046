use std::io::{BufRead, Write};
use crate::error::ReplError;
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::evaluator::Evaluator;
use crate::interpreter::lexer;
use crate::interpreter::object::Object;
use crate::interpreter::parser;


pub const PROMPT: &str = ">> ";

/// What the shell does with each parsed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Evaluate,
    /// Print the program back from its syntax tree.
    Ast,
    /// Print every scanned token.
    Tokens,
}

/// Result of running one input through a [`Session`].
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The input had parser errors and was not evaluated.
    ParseErrors(Vec<String>),
    /// Evaluation finished. `None` when no statement produced a value.
    Value(Option<Object>),
    /// The input was only printed (`Ast` and `Tokens` modes).
    Printed,
}

/// One long-lived environment shared by every input, so bindings persist.
pub struct Session {
    env: Env,
    evaluator: Evaluator,
    mode: Mode,
}

impl Session {
    pub fn new(mode: Mode, max_depth: usize) -> Session {
        Session {
            env: Environment::new_global(),
            evaluator: Evaluator::new(max_depth),
            mode,
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Runs one source text and writes its output.
    pub fn execute(&mut self, source: &str, out: &mut impl Write) -> Result<Outcome, ReplError> {
        if self.mode == Mode::Tokens {
            for token in lexer::tokenize(source) {
                writeln!(out, "{}", token)?;
            }

            return Ok(Outcome::Printed);
        }

        let (program, errors) = parser::parse(source);

        if !errors.is_empty() {
            write_parse_errors(out, &errors)?;
            return Ok(Outcome::ParseErrors(errors));
        }

        if self.mode == Mode::Ast {
            writeln!(out, "{}", program)?;
            return Ok(Outcome::Printed);
        }

        let result = self.evaluator.eval_program_value(&program, &self.env);

        if let Some(value) = &result {
            writeln!(out, "{}", value)?;
        }

        Ok(Outcome::Value(result))
    }
}

pub fn write_parse_errors(out: &mut impl Write, errors: &[String]) -> std::io::Result<()> {
    writeln!(out, "parser errors:")?;

    for message in errors {
        writeln!(out, "\t{}", message)?;
    }

    Ok(())
}

/// Reads lines until `exit` or end of input, running each one in the same session.
pub fn start(input: impl BufRead, mut out: impl Write, mut session: Session) -> Result<(), ReplError> {
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        if line.trim() == "exit" {
            return Ok(());
        }

        session.execute(&line, &mut out)?;
    }
}
