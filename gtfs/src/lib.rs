//! Turns the JSON a transit backend serves (routes, trips with their stop times, shape points,
//! live vehicle positions) into display-ready structures. Everything here is synchronous and
//! stateless.

#[macro_use]
extern crate log;

pub mod api;
mod coords;
mod error;
mod geometry;
mod ids;
mod routes;
pub mod schedule;
mod shapes;
mod stop_times;
mod stops;
mod time;
mod trips;
mod vehicles;

pub use api::ScheduleOutcome;
pub use coords::{coerce_lat_lon, LatLon, RawCoordinate};
pub use error::FeedError;
pub use geometry::RouteGeometry;
pub use routes::{css_color, Route, RouteColor, RouteID};
pub use schedule::{build_stop_schedule, search, StopScheduleEntry};
pub use shapes::{assemble_polylines, RoutePolylines, ShapeID, ShapePointRecord};
pub use stop_times::{StopTime, StopTimeRecord};
pub use stops::{Stop, StopID, StopRecord};
pub use time::{display_minute_of_day, ServiceTime};
pub use trips::{ServiceTimeRange, Trip, TripID, TripRecord};
pub use vehicles::{PositionsFrame, VehicleID, VehiclePosition, VehiclePositionRecord};
