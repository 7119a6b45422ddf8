//! Terminal presentation of deployment messages.
//!
//! [`TerminalReporter`] implements the library's [`Reporter`]: successes go
//! to standard output, errors and details to standard error. Colour is a
//! per-stream decision made once, when the reporter is built.

use std::cell::RefCell;
use std::io::Write;

use appdeploy::report::Reporter;
use console::Term;
use owo_colors::{OwoColorize as _, Style};

use crate::cli::ColorChoice;

/// Styles applied to reported messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct Styles {
    /// Success messages (green).
    pub success: Style,
    /// Error headlines (red).
    pub error: Style,
}

impl Styles {
    /// Apply colours to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.error = Style::new().red();
    }

    /// Styles for a stream, coloured when `enabled`.
    #[must_use]
    pub fn for_stream(enabled: bool) -> Self {
        let mut styles = Self::default();
        if enabled {
            styles.colorize();
        }
        styles
    }
}

/// [`Reporter`] writing to a pair of output streams.
pub struct TerminalReporter<O: Write, E: Write> {
    out: RefCell<O>,
    err: RefCell<E>,
    out_styles: Styles,
    err_styles: Styles,
}

impl TerminalReporter<std::io::Stdout, std::io::Stderr> {
    /// Reporter for the process streams, coloured according to `choice`.
    #[must_use]
    pub fn stdio(choice: ColorChoice) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self::new(std::io::stdout(), std::io::stderr()).with_styles(
            Styles::for_stream(choice.enabled(Term::stdout().is_term(), no_color)),
            Styles::for_stream(choice.enabled(Term::stderr().is_term(), no_color)),
        )
    }
}

impl<O: Write, E: Write> TerminalReporter<O, E> {
    /// Uncoloured reporter writing successes to `out` and failures to `err`.
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: RefCell::new(out),
            err: RefCell::new(err),
            out_styles: Styles::default(),
            err_styles: Styles::default(),
        }
    }

    /// Replace the styles used for each stream.
    #[must_use]
    pub fn with_styles(mut self, out_styles: Styles, err_styles: Styles) -> Self {
        self.out_styles = out_styles;
        self.err_styles = err_styles;
        self
    }

    /// Recover the underlying streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out.into_inner(), self.err.into_inner())
    }
}

impl<O: Write, E: Write> Reporter for TerminalReporter<O, E> {
    fn success(&self, message: &str) {
        let styled = message.style(self.out_styles.success);
        write_line(&mut *self.out.borrow_mut(), styled);
    }

    fn error(&self, message: &str) {
        let styled = message.style(self.err_styles.error);
        write_line(&mut *self.err.borrow_mut(), styled);
    }

    fn detail(&self, message: &str) {
        write_line(&mut *self.err.borrow_mut(), message);
    }
}

fn write_line(stream: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stream, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}
