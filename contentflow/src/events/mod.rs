//! Run observers.
//!
//! The orchestrator hands every observer a reference to the run after each
//! status transition. Observers see a consistent snapshot per call but should
//! re-read the run on the next call rather than cache fields across calls.

mod observer;

pub use observer::{CollectingObserver, LoggingObserver, NoOpObserver, RunObserver};
