mod manager;
mod transport;

use gtfs::VehiclePosition;

use crate::SelectionSet;

pub use manager::{ConnectionState, LiveFeed, LiveTiming, PositionSnapshot, StreamManager};
pub use transport::{
    split_lines, FeedTransport, FrameStream, HttpPoller, HttpStreamTransport, PositionSource,
};

/// The vehicles serving a selected route. Recompute whenever either input changes.
pub fn filter_by_routes(
    positions: &[VehiclePosition],
    selection: &SelectionSet,
) -> Vec<VehiclePosition> {
    let routes = selection.route_ids();
    positions
        .iter()
        .filter(|v| routes.contains(&v.route_id))
        .cloned()
        .collect()
}
