//! Observability utilities.

mod logging;
mod spans;

pub use logging::{init_logging, LogFormat, DEFAULT_FILTER};
pub use spans::{RunSpanAttributes, StageSpanAttributes};
