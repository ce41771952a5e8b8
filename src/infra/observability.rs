//! Tracing subscriber setup and metric names.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;
use crate::domain::AppError;

/// Counter incremented once per successfully built application context.
pub const CONTEXT_INITIALIZED_TOTAL: &str = "app_context_initialized_total";

/// Counter incremented for each capability whose primary provider was overridden.
pub const CONTEXT_OVERRIDES_TOTAL: &str = "app_context_overrides_total";

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };

    result.map_err(|e| AppError::Internal(format!("tracing already initialized: {e}")))
}
