//! Star field tunables
//!
//! A closed, validated set of named fields. Serialized as JSON for hosts
//! that want to persist or ship a configuration.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How per-star shimmer noise is produced each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShimmerMode {
    /// One fresh uniform(-1, 1) draw per star per frame
    PerStar,
    /// Position/time hash noise, written to a back buffer then swapped
    #[default]
    Hashed,
}

impl ShimmerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShimmerMode::PerStar => "PerStar",
            ShimmerMode::Hashed => "Hashed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "perstar" | "per-star" | "cpu" => Some(ShimmerMode::PerStar),
            "hashed" | "batched" | "gpu" => Some(ShimmerMode::Hashed),
            _ => None,
        }
    }
}

/// Comet spawning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CometConfig {
    /// Mean arrivals per second (Poisson rate)
    pub rate: f32,
    /// Speed in screen diagonals per second
    pub speed: f32,
    /// Tail length expressed as seconds of travel
    pub tail_seconds: f32,
    /// Head color
    pub color: [f32; 3],
    /// Tail color
    pub tail_color: [f32; 3],
}

impl Default for CometConfig {
    fn default() -> Self {
        Self {
            rate: COMET_RATE,
            speed: COMET_SPEED,
            tail_seconds: COMET_TAIL_SECONDS,
            color: [1.0, 1.0, 1.0],
            tail_color: [0.375, 0.1875, 0.0],
        }
    }
}

/// Star field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Mean on-screen spacing between stars (pixels)
    pub star_distance: f32,
    /// Population cap
    pub max_stars: usize,
    /// Equal-area radial bands
    pub radial_buckets: u32,
    /// Equal-angle sectors
    pub angular_buckets: u32,

    // === Shimmer ===
    /// Leaky integrator rate (1/s)
    pub shimmer_rate: f32,
    pub shimmer_mode: ShimmerMode,

    // === Sky placement ===
    /// Pole height above the bottom edge (pixels)
    pub horizon_offset: f32,
    /// Pole x position as a fraction of width
    pub north_offset: f32,
    /// Sky rotation about the pole (radians/s)
    pub rotation_rate: f32,

    // === Galaxy band ===
    /// Probability that a star is drawn from the band
    pub galaxy_proportion: f32,
    /// Band inclination (radians)
    pub galaxy_angle: f32,
    /// Standard deviation across the band (radians)
    pub galaxy_spread: f32,
    /// Standard deviation along the band (radians)
    pub galaxy_length: f32,

    // === Star appearance ===
    pub min_star_radius: f32,
    pub max_star_radius: f32,
    /// Magnitude drawn at full brightness
    pub reference_magnitude: f32,

    pub comets: CometConfig,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_distance: STAR_DISTANCE,
            max_stars: MAX_STARS,
            radial_buckets: RADIAL_BUCKETS,
            angular_buckets: ANGULAR_BUCKETS,

            shimmer_rate: SHIMMER_RATE,
            shimmer_mode: ShimmerMode::default(),

            horizon_offset: HORIZON_OFFSET,
            north_offset: NORTH_OFFSET,
            rotation_rate: ROTATION_RATE,

            galaxy_proportion: GALAXY_PROPORTION,
            galaxy_angle: GALAXY_ANGLE_DEG.to_radians(),
            galaxy_spread: GALAXY_SPREAD,
            galaxy_length: GALAXY_LENGTH,

            min_star_radius: MIN_STAR_RADIUS,
            max_star_radius: MAX_STAR_RADIUS,
            reference_magnitude: REFERENCE_MAGNITUDE,

            comets: CometConfig::default(),
        }
    }
}

impl StarfieldConfig {
    /// Check every tunable; a failure here means nothing gets constructed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radial_buckets == 0 {
            return Err(ConfigError::ZeroBuckets { axis: "radial" });
        }
        if self.angular_buckets == 0 {
            return Err(ConfigError::ZeroBuckets { axis: "angular" });
        }

        positive("star_distance", self.star_distance)?;
        non_negative("shimmer_rate", self.shimmer_rate)?;
        finite("horizon_offset", self.horizon_offset)?;
        finite("north_offset", self.north_offset)?;
        finite("rotation_rate", self.rotation_rate)?;
        finite("galaxy_angle", self.galaxy_angle)?;
        non_negative("galaxy_spread", self.galaxy_spread)?;
        non_negative("galaxy_length", self.galaxy_length)?;
        positive("min_star_radius", self.min_star_radius)?;
        finite("reference_magnitude", self.reference_magnitude)?;
        non_negative("comets.rate", self.comets.rate)?;
        non_negative("comets.speed", self.comets.speed)?;
        non_negative("comets.tail_seconds", self.comets.tail_seconds)?;

        // The target population divides by (1 - proportion)
        if !(0.0..1.0).contains(&self.galaxy_proportion) {
            return Err(ConfigError::OutOfRange {
                field: "galaxy_proportion",
                value: self.galaxy_proportion,
                expected: "a value in [0, 1)",
            });
        }
        positive("max_star_radius", self.max_star_radius)?;
        if !(self.max_star_radius >= self.min_star_radius) {
            return Err(ConfigError::OutOfRange {
                field: "max_star_radius",
                value: self.max_star_radius,
                expected: "at least min_star_radius",
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "a finite number",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "a finite value >= 0",
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "a finite value > 0",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StarfieldConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.galaxy_angle - 1.0996).abs() < 1e-3);
        assert_eq!(config.shimmer_mode, ShimmerMode::Hashed);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let config = StarfieldConfig {
            angular_buckets: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroBuckets { axis: "angular" })
        ));
    }

    #[test]
    fn test_galaxy_proportion_must_leave_room_for_disc() {
        let config = StarfieldConfig {
            galaxy_proportion: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "galaxy_proportion", .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let config = StarfieldConfig {
            shimmer_rate: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_infinite_star_radius_rejected() {
        let config = StarfieldConfig {
            max_star_radius: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "max_star_radius", .. })
        ));
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = StarfieldConfig::from_json(
            r#"{ "radial_buckets": 10, "angular_buckets": 20, "shimmer_mode": "PerStar" }"#,
        )
        .unwrap();
        assert_eq!(config.radial_buckets, 10);
        assert_eq!(config.angular_buckets, 20);
        assert_eq!(config.shimmer_mode, ShimmerMode::PerStar);
        assert_eq!(config.max_stars, MAX_STARS);

        let json = config.to_json().unwrap();
        assert_eq!(StarfieldConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_negative_max_stars_rejected() {
        assert!(matches!(
            StarfieldConfig::from_json(r#"{ "max_stars": -5 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_shimmer_mode_from_str() {
        assert_eq!(ShimmerMode::from_str("GPU"), Some(ShimmerMode::Hashed));
        assert_eq!(ShimmerMode::from_str("per-star"), Some(ShimmerMode::PerStar));
        assert_eq!(ShimmerMode::from_str("sparkle"), None);
        assert_eq!(ShimmerMode::PerStar.as_str(), "PerStar");
    }
}
