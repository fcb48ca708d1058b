use serde::{Deserialize, Serialize};

use crate::FeedError;

/// A position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// GeoJSON wants `[lon, lat]`
    pub fn to_geojson_position(self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}

/// Coordinates arrive either as JSON numbers or as decimal strings, depending on which backend
/// query produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    pub fn to_degrees(&self, field: &'static str) -> Result<f64, FeedError> {
        let value = match self {
            RawCoordinate::Number(x) => *x,
            RawCoordinate::Text(x) => x.trim().parse::<f64>().unwrap_or(f64::NAN),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FeedError::InvalidCoordinate {
                field,
                value: self.to_string(),
            })
        }
    }
}

impl std::fmt::Display for RawCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RawCoordinate::Number(x) => write!(f, "{x}"),
            RawCoordinate::Text(x) => write!(f, "{x}"),
        }
    }
}

impl From<f64> for RawCoordinate {
    fn from(x: f64) -> Self {
        RawCoordinate::Number(x)
    }
}

impl From<&str> for RawCoordinate {
    fn from(x: &str) -> Self {
        RawCoordinate::Text(x.to_string())
    }
}

pub fn coerce_lat_lon(lat: &RawCoordinate, lon: &RawCoordinate) -> Result<LatLon, FeedError> {
    Ok(LatLon::new(
        lat.to_degrees("latitude")?,
        lon.to_degrees("longitude")?,
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_coerce_strings_and_numbers() {
        let pt = coerce_lat_lon(&"39.1653".into(), &(-86.5264).into()).unwrap();
        assert_eq!(pt, LatLon::new(39.1653, -86.5264));

        let raw: Vec<RawCoordinate> = serde_json::from_str(r#"[" 1.5", 2]"#).unwrap();
        assert_eq!(raw[0].to_degrees("latitude").unwrap(), 1.5);
        assert_eq!(raw[1].to_degrees("latitude").unwrap(), 2.0);
    }

    #[test]
    fn test_rejects_nan() {
        let err = coerce_lat_lon(&"north".into(), &"1.0".into()).unwrap_err();
        assert_eq!(
            err,
            FeedError::InvalidCoordinate {
                field: "latitude",
                value: "north".to_string()
            }
        );
        assert!(RawCoordinate::from("NaN").to_degrees("longitude").is_err());
        assert!(RawCoordinate::from("").to_degrees("longitude").is_err());
    }
}
