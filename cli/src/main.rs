//! The `ifjcode23` binary: argument parsing, opening the source/input
//! streams (falling back to standard input for whichever one the user
//! didn't point at a file), wiring [`loader`]'s decoded [`ifjcode23::Program`]
//! into an [`ifjcode23::Executor`], and translating the result into the
//! process exit code fixed by the interpreter's exit-code table (§6).

mod error;
#[cfg(test)]
mod e2e_test;

use std::cell::Cell;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;

use error::CliError;
use ifjcode23::io::{InputLines, LineReader, OutputChannel, WriteChannel};
use ifjcode23::Executor;

/// Interprets an IFJcode23 program serialized as XML.
#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "ifjcode23",
    about = "Interprets IFJcode23 XML programs.",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Prints usage and exits. Must not be combined with any other flag.
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    /// Path to the program's XML source. Defaults to standard input if
    /// `--input` names a file.
    #[arg(short = 's', long = "source", value_name = "PATH")]
    source: Option<PathBuf>,

    /// Path to the file of input lines READ consumes. Defaults to standard
    /// input if `--source` names a file.
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    input: Option<PathBuf>,
}

fn main() {
    init_tracing();
    let args: Vec<OsString> = std::env::args_os().collect();
    std::process::exit(run(args));
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).try_init();
}

fn run(raw_args: Vec<OsString>) -> i32 {
    match try_run(raw_args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            err.exit_code()
        }
    }
}

fn try_run(raw_args: Vec<OsString>) -> Result<i32, CliError> {
    let args = Args::try_parse_from(raw_args)?;
    validate(&args)?;

    if args.help {
        print_usage();
        return Ok(0);
    }

    let xml = read_source(args.source.as_deref())?;
    let program = loader::load_program(&xml)?;
    let input = open_input(args.input.as_deref())?;

    let stdout_failed = Rc::new(Cell::new(false));
    let stdout = GuardedOutput::new(io::stdout(), stdout_failed.clone());
    let stderr = WriteChannel::new(io::stderr());

    let mut executor = Executor::new(&program, input, Box::new(stdout), Box::new(stderr));
    let result = executor.run();

    if stdout_failed.get() {
        return Err(CliError::OutputWrite("write to standard output failed".to_string()));
    }

    Ok(result?)
}

/// `--help` combined with any other flag is a parameter error, not a
/// silent "help wins"; everything else about argument shape is already
/// enforced by `clap`'s own parse failure (unknown flags, etc.).
fn validate(args: &Args) -> Result<(), CliError> {
    if args.help && (args.source.is_some() || args.input.is_some()) {
        return Err(CliError::Parameter("--help must not be combined with other flags".to_string()));
    }
    if !args.help && args.source.is_none() && args.input.is_none() {
        return Err(CliError::Parameter(
            "at least one of --source/--input must name a file; both cannot default to standard input".to_string(),
        ));
    }
    Ok(())
}

fn print_usage() {
    println!(
        "ifjcode23 --source=PATH --input=PATH\n\n\
         Interprets an IFJcode23 program.\n\n\
         Options:\n  \
         -h, --help           print this message and exit\n  \
         -s, --source=PATH    read the program's XML source from PATH (default: standard input)\n  \
         -i, --input=PATH     read READ's input lines from PATH (default: standard input)\n\n\
         At least one of --source/--input must name a file."
    );
}

fn read_source(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::InputOpen(format!("could not read source file {}: {e}", path.display()))),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::InputOpen(format!("could not read source from standard input: {e}")))?;
            Ok(buf)
        }
    }
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn InputLines>, CliError> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| CliError::InputOpen(format!("could not open input file {}: {e}", path.display())))?;
            Ok(Box::new(LineReader::new(BufReader::new(file))))
        }
        None => Ok(Box::new(LineReader::new(BufReader::new(io::stdin())))),
    }
}

/// Wraps an [`OutputChannel`] and remembers whether a write ever failed, so
/// `main` can report exit code 12 after the fact: the trait itself has no
/// way to propagate an I/O error mid-instruction.
struct GuardedOutput<W> {
    inner: W,
    failed: Rc<Cell<bool>>,
}

impl<W> GuardedOutput<W> {
    fn new(inner: W, failed: Rc<Cell<bool>>) -> Self {
        GuardedOutput { inner, failed }
    }
}

impl<W> OutputChannel for GuardedOutput<W>
where
    W: std::io::Write,
{
    fn write_str(&mut self, s: &str) {
        if self.inner.write_all(s.as_bytes()).is_err() {
            self.failed.set(true);
        }
    }
}
