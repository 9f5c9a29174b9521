use super::Severity;

/// Subject prefix for logging.
pub const SUBJECT_PREFIX: &str = "logging";

/// `logging.<app>.<code>`
pub fn subject_for(app: &str, severity: Severity) -> String {
    format!("{}.{}.{}", SUBJECT_PREFIX, app, severity.code())
}

/// Subjects one application publishes to. Computed once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subjects {
    info: String,
    error: String,
    fatal: String,
    wildcard: String,
}

impl Subjects {
    pub fn new(app: &str) -> Self {
        Self {
            info: subject_for(app, Severity::Info),
            error: subject_for(app, Severity::Error),
            fatal: subject_for(app, Severity::Fatal),
            wildcard: format!("{}.{}.*", SUBJECT_PREFIX, app),
        }
    }

    pub fn for_severity(&self, severity: Severity) -> &str {
        match severity {
            Severity::Info => &self.info,
            Severity::Error => &self.error,
            Severity::Fatal => &self.fatal,
        }
    }

    /// Matches every severity of this application, for subscribers.
    pub fn wildcard(&self) -> &str {
        &self.wildcard
    }
}
