pub mod api; // HTTP surface: the four report endpoints
pub mod config;
pub mod pipeline; // detection → extraction → normalization → summarization
pub mod service; // Process-lifetime service object shared across requests

/// Crate version, surfaced in startup logs.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
