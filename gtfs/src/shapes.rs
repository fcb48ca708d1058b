use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coords::{coerce_lat_lon, LatLon, RawCoordinate};
use crate::ids::string_id;
use crate::FeedError;

string_id!(ShapeID);

/// One point of a shape, as the route geometry query returns it. Points arrive in no particular
/// order and several shapes may be interleaved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapePointRecord {
    pub shape_id: ShapeID,
    pub sequence: u32,
    pub latitude: RawCoordinate,
    pub longitude: RawCoordinate,
}

/// One ordered path per shape, in the order each shape was first seen.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePolylines {
    shapes: Vec<(ShapeID, Vec<LatLon>)>,
}

impl RoutePolylines {
    pub fn get(&self, shape_id: &ShapeID) -> Option<&[LatLon]> {
        self.shapes
            .iter()
            .find(|(id, _)| id == shape_id)
            .map(|(_, pts)| pts.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShapeID, &[LatLon])> {
        self.shapes.iter().map(|(id, pts)| (id, pts.as_slice()))
    }

    pub fn shape_ids(&self) -> Vec<&ShapeID> {
        self.shapes.iter().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.shapes.iter().map(|(_, pts)| pts.len()).sum()
    }
}

/// Groups shape points by shape ID and orders each group by sequence number. Equal sequence
/// numbers keep their input order.
pub fn assemble_polylines(points: &[ShapePointRecord]) -> Result<RoutePolylines, FeedError> {
    let mut index: HashMap<&ShapeID, usize> = HashMap::new();
    let mut groups: Vec<(&ShapeID, Vec<&ShapePointRecord>)> = Vec::new();
    for pt in points {
        let idx = *index.entry(&pt.shape_id).or_insert_with(|| {
            groups.push((&pt.shape_id, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(pt);
    }

    let mut shapes = Vec::new();
    for (shape_id, mut pts) in groups {
        // Stable, so ties stay in input order
        pts.sort_by_key(|pt| pt.sequence);
        let line = pts
            .into_iter()
            .map(|pt| coerce_lat_lon(&pt.latitude, &pt.longitude))
            .collect::<Result<Vec<_>, _>>()?;
        shapes.push((shape_id.clone(), line));
    }
    Ok(RoutePolylines { shapes })
}
