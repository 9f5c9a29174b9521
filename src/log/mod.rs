pub mod logger;
pub mod severity;
pub mod sink;
pub mod subject;

pub use logger::{format_line, NatsLogger, RouterState, LOGGING_ERROR_PREFIX};
pub use severity::{Delivery, Severity};
pub use sink::{LocalSink, StderrSink};
pub use subject::{subject_for, Subjects, SUBJECT_PREFIX};
