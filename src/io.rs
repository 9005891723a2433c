//! I/O abstraction the executor runs against. The core crate never opens a
//! file or reads stdin directly; callers (`loader`, `cli`) supply concrete
//! implementations, which keeps this crate runnable against any source of
//! input lines and any destination for program output.

/// Supplies the lines READ consumes, one at a time. `next_line` returning
/// `None` means end of input: READ must then assign the variable's
/// declared type's "missing input" value rather than treat it as an error.
pub trait InputLines {
    fn next_line(&mut self) -> Option<String>;
}

/// Receives the text WRITE produces. Kept separate from the diagnostic
/// stream `BREAK` writes to, since a program's stdout and the
/// interpreter's own diagnostics must never interleave on the same
/// channel.
pub trait OutputChannel {
    fn write_str(&mut self, s: &str);
}

/// Reads lines from any `BufRead`, e.g. stdin or an opened file.
pub struct LineReader<R> {
    lines: std::io::Lines<R>,
}

impl<R: std::io::BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader { lines: reader.lines() }
    }
}

impl<R: std::io::BufRead> InputLines for LineReader<R> {
    fn next_line(&mut self) -> Option<String> {
        self.lines.next().and_then(|r| r.ok())
    }
}

/// Writes to any `Write`, e.g. stdout or an opened file.
pub struct WriteChannel<W> {
    writer: W,
}

impl<W: std::io::Write> WriteChannel<W> {
    pub fn new(writer: W) -> Self {
        WriteChannel { writer }
    }
}

impl<W: std::io::Write> OutputChannel for WriteChannel<W> {
    fn write_str(&mut self, s: &str) {
        use std::io::Write;
        let _ = self.writer.write_all(s.as_bytes());
    }
}
