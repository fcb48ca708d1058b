use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{timeout, MissedTickBehavior};

use gtfs::{PositionsFrame, VehiclePosition};

use super::{FeedTransport, PositionSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Every vehicle the feed last reported. Replaced whole on each update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionSnapshot {
    pub positions: Vec<VehiclePosition>,
    /// None until the first update arrives
    pub received_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub enum LiveFeed {
    /// Holds a connection open and retries after a fixed backoff when it drops
    Stream(Arc<dyn FeedTransport>),
    /// Asks on a fixed interval, whether or not the last request worked
    Poll(Arc<dyn PositionSource>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveTiming {
    pub reconnect_interval: Duration,
    pub poll_interval: Duration,
    /// How long opening the stream, waiting for its next frame, or one poll may take before the
    /// connection is treated as lost. A link that dies silently never closes on its own.
    pub idle_timeout: Duration,
}

impl Default for LiveTiming {
    fn default() -> Self {
        Self {
            reconnect_interval: Duration::from_secs(3),
            poll_interval: Duration::from_secs(2),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Keeps the current vehicle snapshot fed from a live feed. Runs as one background task; the
/// snapshot and the connection state are published through watch channels, so readers always
/// see a complete value.
///
/// `stop` (or dropping the manager) cancels the task, which releases the transport and any
/// pending reconnect.
pub struct StreamManager {
    feed: LiveFeed,
    timing: LiveTiming,
    snapshot_tx: Arc<watch::Sender<Arc<PositionSnapshot>>>,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    running: Option<Running>,
}

struct Running {
    task: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

impl StreamManager {
    pub fn new(feed: LiveFeed, timing: LiveTiming) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(PositionSnapshot::default()));
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            feed,
            timing,
            snapshot_tx: Arc::new(snapshot_tx),
            state_tx: Arc::new(state_tx),
            running: None,
        }
    }

    pub fn snapshot(&self) -> Arc<PositionSnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<Arc<PositionSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Starts the background task. Does nothing if it's already running. Must be called from
    /// within a tokio runtime.
    pub fn connect(&mut self) {
        if self.running.is_some() {
            return;
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        let publisher = Publisher {
            snapshot_tx: self.snapshot_tx.clone(),
            state_tx: self.state_tx.clone(),
            cancelled: cancelled.clone(),
        };
        publisher.set_state(ConnectionState::Connecting);

        let task = match self.feed.clone() {
            LiveFeed::Stream(transport) => {
                tokio::spawn(run_stream(transport, self.timing, publisher))
            }
            LiveFeed::Poll(source) => tokio::spawn(run_poll(source, self.timing, publisher)),
        };
        self.running = Some(Running { task, cancelled });
    }

    /// Safe from any state and safe to repeat. The last snapshot stays readable.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            // Flip this first, so nothing the task is in the middle of gets published
            running.cancelled.store(true, Ordering::SeqCst);
            running.task.abort();
            info!("Live feed stopped");
        }
        self.state_tx.send_if_modified(|state| {
            let changed = *state != ConnectionState::Disconnected;
            *state = ConnectionState::Disconnected;
            changed
        });
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Publisher {
    snapshot_tx: Arc<watch::Sender<Arc<PositionSnapshot>>>,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    cancelled: Arc<AtomicBool>,
}

impl Publisher {
    // The cancelled check happens under the channel's lock, so it can't interleave with stop().
    fn set_state(&self, new_state: ConnectionState) {
        self.state_tx.send_if_modified(|state| {
            if self.cancelled.load(Ordering::SeqCst) || *state == new_state {
                return false;
            }
            debug!("Live feed {:?} -> {:?}", state, new_state);
            *state = new_state;
            true
        });
    }

    /// Replaces the snapshot if the whole frame is valid. Returns false for a frame that was
    /// skipped.
    fn apply_frame(&self, raw: &str) -> bool {
        let positions = match PositionsFrame::parse(raw) {
            Ok(frame) => match frame.to_positions() {
                Ok(positions) => positions,
                Err(err) => {
                    warn!("Skipping live feed frame: {err}");
                    return false;
                }
            },
            Err(err) => {
                warn!("Skipping unparseable live feed frame: {err}");
                return false;
            }
        };
        debug!("Applying snapshot of {} vehicles", positions.len());
        let snapshot = Arc::new(PositionSnapshot {
            positions,
            received_at: Some(Utc::now()),
        });
        self.snapshot_tx.send_if_modified(|current| {
            if self.cancelled.load(Ordering::SeqCst) {
                return false;
            }
            *current = snapshot;
            true
        })
    }
}

async fn run_stream(transport: Arc<dyn FeedTransport>, timing: LiveTiming, publisher: Publisher) {
    loop {
        publisher.set_state(ConnectionState::Connecting);
        match timeout(timing.idle_timeout, transport.open()).await {
            Ok(Ok(mut frames)) => {
                publisher.set_state(ConnectionState::Connected);
                info!("Live feed connected");
                loop {
                    match timeout(timing.idle_timeout, frames.next()).await {
                        Ok(Some(Ok(raw))) => {
                            publisher.apply_frame(&raw);
                        }
                        Ok(Some(Err(err))) => {
                            warn!("Live feed error: {err:#}");
                            break;
                        }
                        Ok(None) => break,
                        Err(_) => {
                            warn!("Live feed quiet for {:?}", timing.idle_timeout);
                            break;
                        }
                    }
                }
            }
            Ok(Err(err)) => {
                warn!("Couldn't open live feed: {err:#}");
            }
            Err(_) => {
                warn!("Opening live feed took over {:?}", timing.idle_timeout);
            }
        }
        publisher.set_state(ConnectionState::Disconnected);
        warn!("Live feed lost, reconnecting in {:?}", timing.reconnect_interval);
        tokio::time::sleep(timing.reconnect_interval).await;
    }
}

async fn run_poll(source: Arc<dyn PositionSource>, timing: LiveTiming, publisher: Publisher) {
    let mut ticker = tokio::time::interval(timing.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match timeout(timing.idle_timeout, source.fetch()).await {
            Ok(Ok(raw)) => {
                if publisher.apply_frame(&raw) {
                    publisher.set_state(ConnectionState::Connected);
                }
            }
            Ok(Err(err)) => {
                warn!("Polling live feed failed: {err:#}");
                publisher.set_state(ConnectionState::Disconnected);
            }
            Err(_) => {
                warn!("Polling live feed took over {:?}", timing.idle_timeout);
                publisher.set_state(ConnectionState::Disconnected);
            }
        }
    }
}
