//! Observability utilities.

mod observer;
mod spans;

pub use observer::{LoggingPageObserver, NoOpPageObserver, PageObserver};
pub use spans::{init_tracing, FetchSpanAttributes, SpanTimer};
