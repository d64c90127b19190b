//! Terminal output for publish runs.
//!
//! Progress and results go to stdout, failures to stderr. Quiet mode keeps
//! stdout free for the JSON report.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Colored progress, result and error lines
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    verbose: bool,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose, self.quiet)
    }
}

/// `[2/5] Opening edit`
pub fn step_line(position: usize, total: usize, label: &str) -> String {
    format!("[{}/{}] {}", position, total, label)
}

/// `    SHA-256:  ab12..`, labels padded to one column
pub fn detail_line(label: &str, value: &str) -> String {
    format!("    {:<9} {}", format!("{}:", label), value)
}

fn write_marked<W: WriteColor>(
    buffer: &mut W,
    color: Color,
    mark: &str,
    message: &str,
) -> std::io::Result<()> {
    buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(buffer, "{}", mark)?;
    buffer.reset()?;
    writeln!(buffer, " {}", message)
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    fn emit(&self, color: Option<Color>, mark: &str, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.stdout.buffer();
        match color {
            Some(color) => write_marked(&mut buffer, color, mark, message)?,
            None => writeln!(buffer, "{}", message)?,
        }
        self.stdout.print(&buffer)
    }

    /// Announce a pipeline step
    pub fn step(&self, position: usize, total: usize, label: &str) -> std::io::Result<()> {
        self.emit(Some(Color::Cyan), "→", &step_line(position, total, label))
    }

    /// Final success line
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.emit(Some(Color::Green), "✓", message)
    }

    /// Labelled value under a result line
    pub fn detail(&self, label: &str, value: &str) -> std::io::Result<()> {
        self.emit(None, "", &detail_line(label, value))
    }

    /// Extra context, shown with `--verbose`
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.emit(Some(Color::Blue), "·", message)
    }

    /// Plain line
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        self.emit(None, "", message)
    }

    /// Failure line on stderr, printed even in quiet mode
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();
        if write_marked(&mut buffer, Color::Red, "✗", message).is_err()
            || stderr.print(&buffer).is_err()
        {
            eprintln!("✗ {}", message);
        }
    }

    /// Whether stdout output is suppressed
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
