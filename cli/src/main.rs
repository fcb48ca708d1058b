#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod describe;
mod render_table;

use anyhow::Result;
use structopt::StructOpt;

use gtfs::{RouteID, ScheduleOutcome};
use model::{LiveMode, Session, SessionConfig};

#[derive(StructOpt)]
#[structopt(about = "Transit routes, schedules, and live vehicles from a transit backend")]
struct Args {
    /// A JSON file with session settings
    #[structopt(long)]
    config: Option<String>,
    /// The backend's base URL. Overrides the config file.
    #[structopt(long)]
    api_url: Option<String>,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt)]
enum Command {
    /// List every known route
    Routes,
    /// Print today's departures per stop for one route
    Schedule {
        #[structopt(long)]
        route: String,
        /// Only show stops whose name contains this
        #[structopt(long)]
        search: Option<String>,
    },
    /// Assemble a route's shapes and stops, optionally writing them out as GeoJSON
    Geometry {
        #[structopt(long)]
        route: String,
        #[structopt(long)]
        output: Option<String>,
    },
    /// Follow vehicles on some routes until interrupted
    Live {
        /// Repeat to track several routes
        #[structopt(long)]
        route: Vec<String>,
        /// Track every route
        #[structopt(long)]
        all: bool,
        /// Poll instead of holding a streaming connection open
        #[structopt(long)]
        poll: bool,
    },
}

impl Args {
    fn config(&self) -> Result<SessionConfig> {
        let mut config = SessionConfig::load(self.config.as_deref())?;
        if let Some(ref url) = self.api_url {
            config.api_url = url.clone();
        }
        if let Command::Live { poll: true, .. } = self.cmd {
            config.live_mode = LiveMode::Poll;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::from_args();
    if let Err(err) = run(args).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.config()?;
    let (mut session, backend) = Session::open(config).await?;

    match args.cmd {
        Command::Routes => {
            for route in session.catalog() {
                println!("{}", describe::route(route));
            }
        }
        Command::Schedule { route, search } => {
            let route_id = known_route(&session, &route)?;
            match backend.fetch_schedule(&route_id).await? {
                ScheduleOutcome::Stops(entries) => {
                    let hits = gtfs::search(search.as_deref().unwrap_or(""), &entries);
                    if hits.is_empty() {
                        println!("No stops match {:?}", search.unwrap_or_default());
                    } else {
                        print!("{}", describe::schedule(&hits));
                    }
                }
                ScheduleOutcome::Empty(message) => println!("{message}"),
            }
        }
        Command::Geometry { route, output } => {
            let route_id = known_route(&session, &route)?;
            let geometry = backend.fetch_route_geometry(&route_id).await?;
            if let Some(path) = output {
                fs_err::write(&path, geometry.to_geojson_string()?)?;
                info!("Wrote {path}");
            }
            println!("{}", describe::selection_entry(&geometry.into()));
        }
        Command::Live { route, all, .. } => {
            if all {
                let everything = backend.fetch_all_entries(session.catalog()).await?;
                session.toggle_all(everything)?;
            } else {
                for id in route {
                    let route_id = known_route(&session, &id)?;
                    let entry = backend.fetch_selection_entry(&route_id).await?;
                    session.toggle_route(entry)?;
                }
            }
            if session.selection().is_empty() {
                bail!("Pick at least one --route, or --all");
            }
            for entry in session.selection().entries() {
                println!("{}", describe::selection_entry(entry));
            }
            follow_live(&mut session).await?;
        }
    }
    Ok(())
}

fn known_route(session: &Session, id: &str) -> Result<RouteID> {
    let route_id = RouteID::new(id);
    if session.route(&route_id).is_none() {
        bail!("Unknown route {id}");
    }
    Ok(route_id)
}

async fn follow_live(session: &mut Session) -> Result<()> {
    let region = session.config().initial_region;
    info!(
        "Starting around {}, {} (±{}, ±{})",
        region.latitude, region.longitude, region.latitude_delta, region.longitude_delta
    );
    let mut snapshots = session.live().subscribe_snapshots();
    let mut states = session.live().subscribe_state();
    session.start_live();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                changed?;
                print!("{}", describe::vehicles(&session.visible_vehicles(), session.live_state()));
            }
            changed = states.changed() => {
                changed?;
                let state = *states.borrow_and_update();
                info!("Live feed is {state:?}");
            }
        }
    }
    session.stop_live();
    Ok(())
}
