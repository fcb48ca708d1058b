use gtfs::{Route, StopScheduleEntry, VehiclePosition};
use model::{ConnectionState, SelectedRouteEntry};

use crate::render_table::render_table;

pub fn route(route: &Route) -> String {
    let mut lines = vec![format!("{} ({})", route.describe(), route.route_id)];
    if let Some(ref x) = route.long_name {
        lines.push(format!("  Long name: {x}"));
    }
    lines.push(format!("  Color: {}", route.css_color()));
    lines.join("\n")
}

pub fn selection_entry(entry: &SelectedRouteEntry) -> String {
    format!(
        "{}: {} stops, {} shapes ({} points)",
        entry.route.describe(),
        entry.stops.len(),
        entry.polylines.len(),
        entry.polylines.total_points()
    )
}

pub fn schedule(entries: &[&StopScheduleEntry]) -> String {
    render_table(
        vec!["Stop Name", "Times"],
        entries
            .iter()
            .map(|e| vec![e.stop_name.clone(), e.times.join(", ")])
            .collect(),
        2,
    )
}

pub fn vehicles(vehicles: &[VehiclePosition], state: ConnectionState) -> String {
    let mut out = format!("{} vehicles ({:?})\n", vehicles.len(), state);
    if vehicles.is_empty() {
        return out;
    }
    out.push_str(&render_table(
        vec!["Vehicle", "Route", "Position", "Heading", "Color"],
        vehicles
            .iter()
            .map(|v| {
                vec![
                    v.marker_title(),
                    v.marker_description(),
                    format!("{:.5}, {:.5}", v.pos.lat, v.pos.lon),
                    format!("{:.0}° (icon {:.0}°)", v.bearing, v.marker_rotation()),
                    v.marker_color(),
                ]
            })
            .collect(),
        2,
    ));
    out
}
