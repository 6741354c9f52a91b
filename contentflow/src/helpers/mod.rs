//! Runtime and text helpers shared by the stage runner and the pipeline.

pub mod runtime;
pub mod text;

pub use runtime::{run_with_optional_timeout, run_with_timeout, TimedResult};
pub use text::{non_blank_or, truncate_with_ellipsis, ELLIPSIS};
