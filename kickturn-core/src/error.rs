//! Error types for kickturn operations

use crate::SpotId;
use thiserror::Error;

/// Filter validation errors.
///
/// Raised before any record is evaluated; a malformed filter never produces
/// a partial result set. These are caller errors and never retryable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    #[error("Invalid rating range [{min}, {max}]: bounds must be finite, within [0, 5], min <= max")]
    InvalidRatingRange { min: f64, max: f64 },

    #[error("Invalid origin coordinates: lat {lat}, lon {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("Invalid search radius: {radius_km} km")]
    InvalidRadius { radius_km: f64 },

    #[error("Invalid page request (page {page}, size {page_size}): {reason}")]
    InvalidPage {
        page: u32,
        page_size: u32,
        reason: String,
    },

    #[error("Invalid result limit {limit}: {reason}")]
    InvalidLimit { limit: usize, reason: String },
}

/// Backing store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Backing store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Backing store timed out after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error("Spot not found: {spot_id}")]
    SpotNotFound { spot_id: SpotId },
}

impl StoreError {
    /// True for transient faults where the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable { .. } | StoreError::Timeout { .. }
        )
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all kickturn errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum KickturnError {
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl KickturnError {
    /// True when the caller may usefully retry the same request.
    /// Filter and config errors are permanent until the input changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            KickturnError::Store(e) => e.is_retryable(),
            KickturnError::Filter(_) | KickturnError::Config(_) => false,
        }
    }
}

/// Result type alias for kickturn operations.
pub type KickturnResult<T> = Result<T, KickturnError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_filter_error_display_rating_range() {
        let err = FilterError::InvalidRatingRange { min: 3.0, max: 1.0 };
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid rating range"));
        assert!(msg.contains("3"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn test_filter_error_display_coordinates() {
        let err = FilterError::InvalidCoordinates {
            lat: 95.0,
            lon: 34.78,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid origin coordinates"));
        assert!(msg.contains("95"));
    }

    #[test]
    fn test_store_error_display_not_found() {
        let err = StoreError::SpotNotFound {
            spot_id: Uuid::nil(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Spot not found"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_store_error_display_timeout() {
        let err = StoreError::Timeout { waited_ms: 1500 };
        let msg = format!("{}", err);
        assert!(msg.contains("timed out"));
        assert!(msg.contains("1500"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "fetch_timeout".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("fetch_timeout"));
        assert!(msg.contains("0"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_kickturn_error_from_variants() {
        let filter = KickturnError::from(FilterError::InvalidRadius { radius_km: -1.0 });
        assert!(matches!(filter, KickturnError::Filter(_)));

        let store = KickturnError::from(StoreError::Unavailable {
            reason: "connection refused".to_string(),
        });
        assert!(matches!(store, KickturnError::Store(_)));

        let config = KickturnError::from(ConfigError::InvalidValue {
            field: "window_days".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
        assert!(matches!(config, KickturnError::Config(_)));
    }

    #[test]
    fn test_retryability_split() {
        let unavailable: KickturnError = StoreError::Unavailable {
            reason: "down".to_string(),
        }
        .into();
        let timeout: KickturnError = StoreError::Timeout { waited_ms: 200 }.into();
        let not_found: KickturnError = StoreError::SpotNotFound {
            spot_id: Uuid::nil(),
        }
        .into();
        let bad_filter: KickturnError = FilterError::InvalidRadius { radius_km: 0.0 }.into();

        assert!(unavailable.is_retryable());
        assert!(timeout.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(!bad_filter.is_retryable());
    }
}
