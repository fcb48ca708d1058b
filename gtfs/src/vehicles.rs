use serde::{Deserialize, Serialize};

use crate::coords::{coerce_lat_lon, LatLon, RawCoordinate};
use crate::ids::string_id;
use crate::routes::css_color;
use crate::{FeedError, RouteColor, RouteID};

string_id!(VehicleID);

/// Where one vehicle is right now. There's no history; every feed update replaces all of these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehiclePosition {
    pub vehicle_id: VehicleID,
    pub route_id: RouteID,
    pub pos: LatLon,
    /// Degrees clockwise from north
    pub bearing: f64,
    pub route_short_name: String,
    pub route_color: Option<RouteColor>,
}

impl VehiclePosition {
    /// The bus icon points backwards, so markers are drawn rotated half a turn from the bearing
    pub fn marker_rotation(&self) -> f64 {
        (self.bearing + 180.0).rem_euclid(360.0)
    }

    pub fn marker_color(&self) -> String {
        css_color(self.route_color.as_ref())
    }

    pub fn marker_title(&self) -> String {
        format!("Bus {}", self.vehicle_id)
    }

    pub fn marker_description(&self) -> String {
        format!("Route: {}", self.route_short_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehiclePositionRecord {
    pub vehicle_id: VehicleID,
    pub route_id: RouteID,
    pub latitude: RawCoordinate,
    pub longitude: RawCoordinate,
    #[serde(default)]
    pub bearing: Option<f64>,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_color: Option<RouteColor>,
}

impl VehiclePositionRecord {
    pub fn to_position(&self) -> Result<VehiclePosition, FeedError> {
        Ok(VehiclePosition {
            vehicle_id: self.vehicle_id.clone(),
            route_id: self.route_id.clone(),
            pos: coerce_lat_lon(&self.latitude, &self.longitude)?,
            bearing: self.bearing.unwrap_or(0.0),
            route_short_name: self
                .route_short_name
                .clone()
                .unwrap_or_else(|| self.route_id.to_string()),
            route_color: self.route_color.clone(),
        })
    }
}

/// One message from the live feed, streamed or polled
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionsFrame {
    pub positions: Vec<VehiclePositionRecord>,
}

impl PositionsFrame {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Every record has to be valid; a frame is applied whole or not at all.
    pub fn to_positions(&self) -> Result<Vec<VehiclePosition>, FeedError> {
        self.positions.iter().map(|rec| rec.to_position()).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_frame() {
        let frame = PositionsFrame::parse(
            r#"{"positions": [
                {"vehicle_id": "101", "route_id": "5", "latitude": 39.1, "longitude": "-86.5",
                 "bearing": 270, "route_short_name": "5", "route_color": "FF0000"},
                {"vehicle_id": "102", "route_id": "6", "latitude": "39.2", "longitude": -86.4}
            ]}"#,
        )
        .unwrap();
        let positions = frame.to_positions().unwrap();
        assert_eq!(positions.len(), 2);

        assert_eq!(positions[0].pos, LatLon::new(39.1, -86.5));
        assert_eq!(positions[0].marker_rotation(), 90.0);
        assert_eq!(positions[0].marker_color(), "#FF0000");
        assert_eq!(positions[0].marker_title(), "Bus 101");
        assert_eq!(positions[0].marker_description(), "Route: 5");

        assert_eq!(positions[1].marker_color(), "black");
        assert_eq!(positions[1].route_short_name, "6");
        assert_eq!(positions[1].marker_rotation(), 180.0);
    }

    #[test]
    fn test_bad_frames() {
        assert!(PositionsFrame::parse("not json").is_err());
        assert!(PositionsFrame::parse(r#"{"vehicles": []}"#).is_err());

        let frame = PositionsFrame::parse(
            r#"{"positions": [{"vehicle_id": "1", "route_id": "5", "latitude": "?", "longitude": 0}]}"#,
        )
        .unwrap();
        assert!(matches!(
            frame.to_positions(),
            Err(FeedError::InvalidCoordinate { .. })
        ));
    }
}
