use serde::{Deserialize, Serialize};

use crate::ids::string_id;
use crate::{FeedError, ServiceTime, StopTime, StopTimeRecord};

string_id!(TripID);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: Option<TripID>,
    /// In the order the backend listed them
    pub stop_times: Vec<StopTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(default)]
    pub trip_id: Option<TripID>,
    #[serde(default)]
    pub stop_times: Vec<StopTimeRecord>,
}

impl Trip {
    pub fn time_range(&self) -> Option<ServiceTimeRange> {
        let first = self.stop_times.first()?.departure_time;
        let last = self.stop_times.last()?.departure_time;
        Some(ServiceTimeRange { first, last })
    }
}

/// When a trip starts and ends, in service time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceTimeRange {
    pub first: ServiceTime,
    pub last: ServiceTime,
}

pub fn load(records: &[TripRecord]) -> Result<Vec<Trip>, FeedError> {
    let mut trips = Vec::new();
    for rec in records {
        let stop_times = rec
            .stop_times
            .iter()
            .map(|st| st.to_stop_time())
            .collect::<Result<Vec<_>, _>>()?;
        let trip = Trip {
            trip_id: rec.trip_id.clone(),
            stop_times,
        };
        match trip.time_range() {
            Some(range) if range.last.is_past_midnight() => {
                debug!(
                    "Trip {:?} runs from {} to {}, past the end of the service day",
                    trip.trip_id, range.first, range.last
                );
            }
            Some(_) => {}
            None => debug!("Trip {:?} has no stop times", trip.trip_id),
        }
        trips.push(trip);
    }
    Ok(trips)
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(times: &[&str]) -> TripRecord {
        TripRecord {
            trip_id: Some(TripID::new("t1")),
            stop_times: times
                .iter()
                .map(|t| StopTimeRecord {
                    stop_id: "s".into(),
                    stop_name: "Main St".to_string(),
                    departure_time: t.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_time_range() {
        let trips = load(&[record(&["23:50:00", "24:10:00"]), record(&[])]).unwrap();
        let range = trips[0].time_range().unwrap();
        assert_eq!(range.first, ServiceTime::from_hms(23, 50, 0).unwrap());
        assert_eq!(range.last, ServiceTime::from_hms(24, 10, 0).unwrap());
        assert!(trips[1].time_range().is_none());
    }

    #[test]
    fn test_bad_time_fails_the_load() {
        assert!(load(&[record(&["8:00"])]).is_err());
    }
}
