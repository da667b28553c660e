//! Core types and utilities for the Onething admin client
//!
//! Holds the backend's slice wire format, the pagination state derived from
//! it, and the configuration, error and logging plumbing shared by the
//! client crate.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod pager;
pub mod slice;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, Config, LoggingConfig};
pub use error::{Error, Result};
pub use pager::Pager;
pub use slice::{PaginationState, SliceView};
pub use types::{Pageable, SliceEnvelope};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Logging(e.to_string()))?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| Error::Logging(e.to_string()))
}
