//! The CLI's own error variants (argument parsing and file I/O) plus the
//! conversions that let [`main`] match once on a single `Result` and
//! translate it into the process exit code the interpreter's exit-code
//! table defines (§6/§7).

use std::fmt;

use ifjcode23::InterpreterError;

#[derive(Debug)]
pub enum CliError {
    /// 10: bad CLI arguments, an unknown flag, or `--help` combined with
    /// any other flag.
    Parameter(String),
    /// 11: the source or input file could not be opened for reading.
    InputOpen(String),
    /// 12: a write to standard output failed.
    OutputWrite(String),
    /// 31..99: failure inside the interpreter itself (decode or execution).
    Interpreter(InterpreterError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parameter(_) => 10,
            CliError::InputOpen(_) => 11,
            CliError::OutputWrite(_) => 12,
            CliError::Interpreter(err) => err.exit_code(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Parameter(m) => write!(f, "[10] {m}"),
            CliError::InputOpen(m) => write!(f, "[11] {m}"),
            CliError::OutputWrite(m) => write!(f, "[12] {m}"),
            CliError::Interpreter(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<InterpreterError> for CliError {
    fn from(err: InterpreterError) -> Self {
        CliError::Interpreter(err)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        CliError::Parameter(err.to_string())
    }
}
