//! Construction-time error types.

/// Errors raised while building or parsing a star field configuration.
///
/// Only construction can fail; sampling edge cases are retried internally
/// and degenerate viewports simply render nothing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A grid axis was given zero buckets.
    #[error("{axis} bucket count must be positive")]
    ZeroBuckets { axis: &'static str },

    /// A numeric tunable was non-finite or outside its allowed range.
    #[error("invalid value for {field}: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// Failed to parse a JSON configuration document.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
