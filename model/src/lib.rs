#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod backend;
pub mod config;
pub mod live;
mod selection;
mod session;

pub use self::backend::BackendClient;
pub use self::config::{LiveMode, MapRegion, SessionConfig};
pub use self::live::{ConnectionState, PositionSnapshot, StreamManager};
pub use self::selection::{SelectedRouteEntry, SelectionSet};
pub use self::session::Session;
