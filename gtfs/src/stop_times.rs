use serde::{Deserialize, Serialize};

use crate::{FeedError, ServiceTime, StopID};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopTime {
    pub stop_id: StopID,
    pub stop_name: String,
    pub departure_time: ServiceTime,
}

/// One entry of a trip's `stop_times` in the schedule payload. The time stays raw until
/// `to_stop_time`, so a bad value surfaces as `FeedError::MalformedTime`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub stop_id: StopID,
    pub stop_name: String,
    pub departure_time: String,
}

impl StopTimeRecord {
    pub fn to_stop_time(&self) -> Result<StopTime, FeedError> {
        Ok(StopTime {
            stop_id: self.stop_id.clone(),
            stop_name: self.stop_name.clone(),
            departure_time: ServiceTime::parse(&self.departure_time)?,
        })
    }
}
