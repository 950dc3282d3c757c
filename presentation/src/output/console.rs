//! Incremental console rendering of an assembled reply

use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use streamchat_application::AssemblyObserver;
use streamchat_domain::StreamError;

/// Writes each newly flushed piece of text as it arrives.
///
/// Snapshots are cumulative, so only the bytes past what was already
/// printed are written. Errors go to a separate writer (stderr by default).
pub struct ConsoleRenderer {
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
    printed: AtomicUsize,
}

impl ConsoleRenderer {
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            printed: AtomicUsize::new(0),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Bytes of reply text written so far.
    pub fn printed(&self) -> usize {
        self.printed.load(Ordering::SeqCst)
    }

    fn write_out(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }

    fn write_err(&self, line: &str) {
        if let Ok(mut err) = self.err.lock() {
            let _ = writeln!(err, "{}", line);
            let _ = err.flush();
        }
    }

    fn end_line(&self) {
        if self.printed() > 0 {
            self.write_out("\n");
        }
    }
}

impl AssemblyObserver for ConsoleRenderer {
    fn on_update(&self, snapshot: &str) {
        let printed = self.printed();
        if let Some(delta) = snapshot.get(printed..)
            && !delta.is_empty()
        {
            self.write_out(delta);
            self.printed.store(snapshot.len(), Ordering::SeqCst);
        }
    }

    fn on_complete(&self) {
        self.end_line();
    }

    fn on_error(&self, partial: &str, error: &StreamError) {
        self.end_line();
        self.write_err(&format!("{} {}", "Error:".red().bold(), error));
        if !partial.is_empty() {
            self.write_err(&"(partial reply kept)".dimmed().to_string());
        }
    }
}

/// Status line printed when the user cancels a reply.
pub fn cancelled_notice() -> String {
    "[cancelled]".yellow().to_string()
}
