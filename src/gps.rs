//! Degree/minute/second coordinates to signed decimal degrees.

use crate::rational::decode_rational;
use std::str::FromStr;
use thiserror::Error;

/// Compass hemisphere from the `GPSLatitudeRef` / `GPSLongitudeRef` tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// South and west coordinates are negative.
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::South | Hemisphere::West => -1.0,
            Hemisphere::North | Hemisphere::East => 1.0,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown hemisphere reference '{0}'")]
pub struct UnknownHemisphere(pub String);

impl FromStr for Hemisphere {
    type Err = UnknownHemisphere;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Hemisphere::North),
            "S" => Ok(Hemisphere::South),
            "E" => Ok(Hemisphere::East),
            "W" => Ok(Hemisphere::West),
            _ => Err(UnknownHemisphere(s.to_string())),
        }
    }
}

/// Convert up to three rational strings `[deg, min, sec]` to decimal degrees.
///
/// Missing trailing components count as zero, and so do malformed ones
/// (see [`decode_rational`]). Extra components beyond the third are ignored.
pub fn gps_to_decimal<S: AsRef<str>>(components: &[S], hemisphere: Hemisphere) -> f64 {
    let part = |i: usize| {
        components
            .get(i)
            .map(|c| decode_rational(c.as_ref()))
            .unwrap_or(0.0)
    };
    let decimal = part(0) + part(1) / 60.0 + part(2) / 3600.0;
    hemisphere.sign() * decimal
}
