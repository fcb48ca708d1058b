//! The JSON shapes the transit backend responds with. Everything here is raw; use the methods
//! to validate and coerce into the types the rest of the crate works with.

use serde::{Deserialize, Serialize};

use crate::schedule::{build_stop_schedule, StopScheduleEntry};
use crate::shapes::{assemble_polylines, ShapePointRecord};
use crate::stops::StopRecord;
use crate::trips::TripRecord;
use crate::{FeedError, Route, RouteGeometry};

pub const DEFAULT_NO_SCHEDULE_MESSAGE: &str = "No schedule available for this route today.";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub schedule: Vec<TripRecord>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometryResponse {
    pub route: Route,
    #[serde(default)]
    pub shape: Vec<ShapePointRecord>,
    #[serde(default)]
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What to show for a route's schedule
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduleOutcome {
    Stops(Vec<StopScheduleEntry>),
    /// Show this instead of an empty table
    Empty(String),
}

impl RoutesResponse {
    pub fn into_routes(self) -> Result<Vec<Route>, FeedError> {
        check_error(self.error)?;
        Ok(self.routes)
    }
}

impl ScheduleResponse {
    pub fn into_outcome(self) -> Result<ScheduleOutcome, FeedError> {
        check_error(self.error)?;
        let trips = crate::trips::load(&self.schedule)?;
        let entries = build_stop_schedule(&trips)?;
        if entries.is_empty() {
            return Ok(ScheduleOutcome::Empty(
                self.message
                    .filter(|x| !x.is_empty())
                    .unwrap_or_else(|| DEFAULT_NO_SCHEDULE_MESSAGE.to_string()),
            ));
        }
        Ok(ScheduleOutcome::Stops(entries))
    }
}

impl RouteGeometryResponse {
    pub fn into_geometry(self) -> Result<RouteGeometry, FeedError> {
        check_error(self.error)?;
        Ok(RouteGeometry {
            polylines: assemble_polylines(&self.shape)?,
            stops: crate::stops::load(&self.stops)?,
            route: self.route,
        })
    }
}

// An error payload means nothing else in the response can be trusted
fn check_error(error: Option<String>) -> Result<(), FeedError> {
    match error {
        Some(msg) => Err(FeedError::Backend(msg)),
        None => Ok(()),
    }
}
