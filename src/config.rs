//! Configuration error type shared by every tunable struct.
//!
//! The tunables themselves live next to the code they configure
//! ([`crate::sensor::SensorConfig`], [`crate::behavior::CamperConfig`] and so
//! on). They all derive serde with `#[serde(default)]` so a partial JSON
//! document only overrides what it names.
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its allowed range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Convenience constructor for [`ConfigError::Invalid`].
    #[must_use]
    pub const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

/// Fails with [`ConfigError::Invalid`] unless `value` is finite and `>= 0`.
///
/// # Errors
/// Returns [`ConfigError::Invalid`] naming `field` when the check fails.
pub fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite and non-negative"))
    }
}

/// Fails with [`ConfigError::Invalid`] unless `value` is finite and `> 0`.
///
/// # Errors
/// Returns [`ConfigError::Invalid`] naming `field` when the check fails.
pub fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite and positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, true)]
    #[case(3.5, true)]
    #[case(-0.1, false)]
    #[case(f32::NAN, false)]
    #[case(f32::INFINITY, false)]
    fn non_negative_check(#[case] value: f32, #[case] ok: bool) {
        assert_eq!(ensure_non_negative("radius", value).is_ok(), ok);
    }

    #[test]
    fn invalid_error_names_field() {
        let err = ensure_positive("sensor.poll_interval", 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid `sensor.poll_interval`: must be finite and positive"
        );
    }
}
