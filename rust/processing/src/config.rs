// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.

use serde::Serialize;
use streetview_core::ConfigError;

/// Matching parameters, in CRS units (meters for a metric projection).
///
/// Has no `Default`: callers choose both values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineConfig {
    /// Search radius around a footprint within which roads are candidates
    pub buffer_distance: f64,
    /// Cutoff beyond which even the closest road point is rejected
    pub max_distance: f64,
}

impl EngineConfig {
    /// Build a validated configuration.
    pub fn new(buffer_distance: f64, max_distance: f64) -> Result<Self, ConfigError> {
        let config = Self {
            buffer_distance,
            max_distance,
        };
        config.validate()?;
        Ok(config)
    }

    /// Both distances must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.buffer_distance.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "buffer_distance",
                value: self.buffer_distance,
            });
        }
        if !self.max_distance.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "max_distance",
                value: self.max_distance,
            });
        }
        if self.buffer_distance <= 0.0 {
            return Err(ConfigError::NonPositiveBufferDistance(self.buffer_distance));
        }
        if self.max_distance <= 0.0 {
            return Err(ConfigError::NonPositiveMaxDistance(self.max_distance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = EngineConfig::new(50.0, 100.0).unwrap();
        assert_eq!(config.buffer_distance, 50.0);
        assert_eq!(config.max_distance, 100.0);
    }

    #[test]
    fn test_serializes_both_distances() {
        let json = serde_json::to_value(EngineConfig::new(50.0, 100.0).unwrap()).unwrap();
        assert_eq!(json["buffer_distance"], 50.0);
        assert_eq!(json["max_distance"], 100.0);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(
            EngineConfig::new(0.0, 100.0),
            Err(ConfigError::NonPositiveBufferDistance(0.0))
        );
        assert_eq!(
            EngineConfig::new(50.0, -1.0),
            Err(ConfigError::NonPositiveMaxDistance(-1.0))
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            EngineConfig::new(f64::NAN, 100.0),
            Err(ConfigError::NonFinite { name: "buffer_distance", .. })
        ));
        assert!(matches!(
            EngineConfig::new(50.0, f64::INFINITY),
            Err(ConfigError::NonFinite { name: "max_distance", .. })
        ));
    }
}
