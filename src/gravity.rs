//! Earth gravity models used by SGP4.
//!
//! SGP4 was fitted against WGS-72; WGS-84 is offered for consumers that need
//! it, and `wgs72old` reproduces the historical `xke` constant bit for bit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gravity lookup errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GravityError {
    #[error("Unknown gravity model '{0}' (expected wgs72old, wgs72 or wgs84)")]
    UnknownModel(String),
}

/// Named reference ellipsoid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityModel {
    Wgs72Old,
    #[default]
    Wgs72,
    Wgs84,
}

/// Gravity constants in SGP4 working units (Earth radii, minutes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityConstants {
    /// Minutes per SGP4 time unit (1 / xke).
    pub tumin: f64,
    /// Gravitational parameter (km³/s²).
    pub mu: f64,
    /// Equatorial radius (km).
    pub radius_earth_km: f64,
    /// sqrt(μ / R³) in 1/min.
    pub xke: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    /// J3 / J2
    pub j3oj2: f64,
}

impl GravityModel {
    /// Conventional lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            GravityModel::Wgs72Old => "wgs72old",
            GravityModel::Wgs72 => "wgs72",
            GravityModel::Wgs84 => "wgs84",
        }
    }

    /// Constants for this model.
    pub fn constants(self) -> GravityConstants {
        let (mu, radius_earth_km, xke, j2, j3, j4) = match self {
            GravityModel::Wgs72Old => (
                398_600.799_64,
                6378.135,
                0.074_366_916_1,
                0.001_082_616,
                -0.000_002_538_81,
                -0.000_001_655_97,
            ),
            GravityModel::Wgs72 => {
                let mu = 398_600.8;
                let re: f64 = 6378.135;
                (
                    mu,
                    re,
                    60.0 / (re * re * re / mu).sqrt(),
                    0.001_082_616,
                    -0.000_002_538_81,
                    -0.000_001_655_97,
                )
            }
            GravityModel::Wgs84 => {
                let mu = 398_600.5;
                let re: f64 = 6378.137;
                (
                    mu,
                    re,
                    60.0 / (re * re * re / mu).sqrt(),
                    0.001_082_629_989_05,
                    -0.000_002_532_153_06,
                    -0.000_001_610_987_61,
                )
            }
        };

        GravityConstants {
            tumin: 1.0 / xke,
            mu,
            radius_earth_km,
            xke,
            j2,
            j3,
            j4,
            j3oj2: j3 / j2,
        }
    }
}

impl GravityConstants {
    /// Look up constants by model name. Unknown names are a hard error.
    pub fn from_name(name: &str) -> Result<Self, GravityError> {
        name.parse::<GravityModel>().map(GravityModel::constants)
    }

    /// Velocity scale: Earth radii per SGP4 time unit → km/s.
    pub fn km_per_sec(&self) -> f64 {
        self.radius_earth_km * self.xke / 60.0
    }
}

impl FromStr for GravityModel {
    type Err = GravityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wgs72old" => Ok(GravityModel::Wgs72Old),
            "wgs72" => Ok(GravityModel::Wgs72),
            "wgs84" => Ok(GravityModel::Wgs84),
            _ => Err(GravityError::UnknownModel(s.to_string())),
        }
    }
}

impl fmt::Display for GravityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs72_constants() {
        let c = GravityModel::Wgs72.constants();
        assert_relative_eq!(c.radius_earth_km, 6378.135);
        assert_relative_eq!(c.xke, 0.074_366_916_133_17, epsilon = 1e-12);
        assert_relative_eq!(c.tumin * c.xke, 1.0, epsilon = 1e-15);
        assert_relative_eq!(c.j3oj2, c.j3 / c.j2);
    }

    #[test]
    fn test_wgs72old_keeps_historical_xke() {
        let c = GravityModel::Wgs72Old.constants();
        assert_eq!(c.xke, 0.074_366_916_1);
        assert_eq!(c.mu, 398_600.799_64);
    }

    #[test]
    fn test_wgs84_radius() {
        let c = GravityModel::Wgs84.constants();
        assert_relative_eq!(c.radius_earth_km, 6378.137);
        assert!(c.xke > 0.0743 && c.xke < 0.0744);
    }

    #[test]
    fn test_lookup_by_name() {
        let c = GravityConstants::from_name("WGS84").unwrap();
        assert_eq!(c, GravityModel::Wgs84.constants());
        assert_eq!("wgs72old".parse::<GravityModel>().unwrap(), GravityModel::Wgs72Old);
    }

    #[test]
    fn test_unknown_model_is_an_error() {
        let err = GravityConstants::from_name("egm2008").unwrap_err();
        assert_eq!(err, GravityError::UnknownModel("egm2008".into()));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&GravityModel::Wgs72Old).unwrap();
        assert_eq!(json, "\"wgs72old\"");
        let back: GravityModel = serde_json::from_str("\"wgs84\"").unwrap();
        assert_eq!(back, GravityModel::Wgs84);
    }
}
