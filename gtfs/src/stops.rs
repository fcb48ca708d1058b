use serde::{Deserialize, Serialize};

use crate::coords::{coerce_lat_lon, LatLon, RawCoordinate};
use crate::ids::string_id;
use crate::FeedError;

string_id!(StopID);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// The geometry payload doesn't always carry stop IDs
    pub stop_id: Option<StopID>,
    pub name: String,
    pub pos: LatLon,
}

/// A stop as the route geometry query returns it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    #[serde(default)]
    pub stop_id: Option<StopID>,
    pub name: String,
    pub latitude: RawCoordinate,
    pub longitude: RawCoordinate,
}

impl StopRecord {
    pub fn to_stop(&self) -> Result<Stop, FeedError> {
        Ok(Stop {
            stop_id: self.stop_id.clone(),
            name: self.name.clone(),
            pos: coerce_lat_lon(&self.latitude, &self.longitude)?,
        })
    }
}

pub fn load(records: &[StopRecord]) -> Result<Vec<Stop>, FeedError> {
    records.iter().map(|rec| rec.to_stop()).collect()
}
