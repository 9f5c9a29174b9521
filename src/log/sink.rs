use chrono::Local;
use std::io::Write;
use std::sync::Arc;

/// Line-oriented fallback destination. Every emitted record lands here,
/// whatever state the bus is in. Implementations must not fail or block
/// for long; a failed write is dropped.
pub trait LocalSink: Send + Sync {
    fn write_line(&self, line: &str);
}

impl<T: LocalSink + ?Sized> LocalSink for Arc<T> {
    fn write_line(&self, line: &str) {
        (**self).write_line(line)
    }
}

/// Writes `[<pid>] YYYY/MM/DD HH:MM:SS <line>` to standard error.
#[derive(Debug, Clone)]
pub struct StderrSink {
    prefix: String,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            prefix: format!("[{}] ", std::process::id()),
        }
    }

    pub(crate) fn render(&self, line: &str) -> String {
        format!("{}{} {}\n", self.prefix, Local::now().format("%Y/%m/%d %H:%M:%S"), line)
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSink for StderrSink {
    fn write_line(&self, line: &str) {
        // One write_all per record so concurrent lines don't interleave.
        let rendered = self.render(line);
        let _ = std::io::stderr().lock().write_all(rendered.as_bytes());
    }
}
