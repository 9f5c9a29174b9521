use std::fmt;

/// The three fixed log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Error,
    Fatal,
}

/// How a record reaches the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Hand the record to the client's outbound buffer and return.
    FireAndForget,
    /// Publish, then wait (bounded) for the buffer to drain.
    Confirmed,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Error, Severity::Fatal];

    /// Label used both in the subject and in the message body.
    pub fn code(self) -> &'static str {
        match self {
            Severity::Info => "inf",
            Severity::Error => "err",
            Severity::Fatal => "ftl",
        }
    }

    pub fn delivery(self) -> Delivery {
        match self {
            Severity::Info | Severity::Error => Delivery::FireAndForget,
            Severity::Fatal => Delivery::Confirmed,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
