//! Common infrastructure shared by the readertoken crates
//!
//! Currently this is the logging layer: `env_logger` initialization and
//! helpers that log token and key events without exposing identifiers or key
//! material in clear text.

pub mod logging;

pub use logging::LoggingTransformer;
