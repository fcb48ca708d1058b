use anyhow::Result;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};

use crate::{Route, RoutePolylines, Stop};

/// Everything needed to draw one route on a map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub route: Route,
    pub stops: Vec<Stop>,
    pub polylines: RoutePolylines,
}

impl RouteGeometry {
    /// One LineString per shape and one Point per stop
    pub fn to_geojson(&self) -> GeoJson {
        let mut features = Vec::new();
        let color = self.route.css_color();

        for (shape_id, pts) in self.polylines.iter() {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(
                    pts.iter().map(|pt| pt.to_geojson_position()).collect(),
                ))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "route");
            feature.set_property("route_id", self.route.route_id.to_string());
            feature.set_property("shape_id", shape_id.to_string());
            feature.set_property("color", color.clone());
            features.push(feature);
        }

        for stop in &self.stops {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(stop.pos.to_geojson_position()))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "stop");
            feature.set_property("name", stop.name.clone());
            if let Some(ref id) = stop.stop_id {
                feature.set_property("stop_id", id.to_string());
            }
            features.push(feature);
        }

        GeoJson::FeatureCollection(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shapes::{assemble_polylines, ShapePointRecord};
    use crate::{LatLon, RouteID, ShapeID};

    #[test]
    fn test_geojson_export() {
        let polylines = assemble_polylines(&[
            ShapePointRecord {
                shape_id: ShapeID::new("a"),
                sequence: 1,
                latitude: 39.0.into(),
                longitude: (-86.0).into(),
            },
            ShapePointRecord {
                shape_id: ShapeID::new("a"),
                sequence: 2,
                latitude: 39.5.into(),
                longitude: (-86.5).into(),
            },
        ])
        .unwrap();
        let geometry = RouteGeometry {
            route: Route {
                route_id: RouteID::new("5"),
                short_name: Some("5".to_string()),
                long_name: None,
                color: None,
            },
            stops: vec![Stop {
                stop_id: None,
                name: "Main St".to_string(),
                pos: LatLon::new(39.2, -86.2),
            }],
            polylines,
        };

        let GeoJson::FeatureCollection(fc) = geometry.to_geojson() else {
            panic!("expected a FeatureCollection");
        };
        assert_eq!(fc.features.len(), 2);

        let line = fc.features[0].geometry.as_ref().unwrap();
        assert_eq!(
            line.value,
            Value::LineString(vec![vec![-86.0, 39.0], vec![-86.5, 39.5]])
        );
        assert_eq!(
            fc.features[0].property("color").unwrap().as_str(),
            Some("black")
        );
        assert_eq!(
            fc.features[1].property("name").unwrap().as_str(),
            Some("Main St")
        );
    }
}
