use crate::config::TurretConfig;
use crate::device::{Command, DeviceLink, DeviceSession};
use crate::input::{Action, KeyEdges};
use crate::target::{RawDetection, Target};
use crate::tracker::TrackOrder;
use crate::trigger::Trigger;
use serial2::SerialPort;
use std::path::PathBuf;
use std::time::Instant;

pub mod aim;
pub mod config;
pub mod cv;
pub mod device;
pub mod error;
pub mod input;
pub mod target;
pub mod tracker;
pub mod trigger;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub fn list_devices() -> Result<Vec<PathBuf>> {
    Ok(SerialPort::available_ports()?)
}

/// What the loop hands back to the front-end each cycle, for the
/// annotated preview.
pub struct CycleView<'a> {
    /// Targets in selection order; the first one is the primary.
    pub targets: &'a [Target],
    /// Offset from the primary hitbox center to the frame center.
    pub offset: (i32, i32),
    pub fired: bool,
    pub command: &'a Command,
}

/// Detection and operator surface of the loop. The production
/// implementation is [`cv::ColorDetector`]; tests script one.
pub trait FrontEnd {
    /// Latest raw detections, fresh each cycle.
    fn poll_detections(&mut self) -> Result<Vec<RawDetection>>;

    /// Renders the cycle result and returns the raw key observed while
    /// doing so, if any. The key feeds the edge detector next cycle.
    fn present(&mut self, view: &CycleView<'_>) -> Result<Option<u8>>;
}

/// The whole control loop state: selection order, trigger, key edges,
/// and the device session. Single-threaded; nothing here crosses a
/// thread.
pub struct Turret<L> {
    config: TurretConfig,
    session: DeviceSession<L>,
    tracker: TrackOrder,
    trigger: Trigger,
    keys: KeyEdges,
    pending: Option<Action>,
}

impl<L: DeviceLink> Turret<L> {
    pub fn new(config: TurretConfig, link: L) -> Self {
        let session = DeviceSession::new(link, config.ready_timeout());
        let trigger = Trigger::new(config.cooldown());
        Self {
            config,
            session,
            tracker: TrackOrder::new(),
            trigger,
            keys: KeyEdges::new(),
            pending: None,
        }
    }

    /// Runs cycles until the operator quits or the link fails. The
    /// device paces the loop: every cycle starts by waiting for a
    /// readiness line and answers it with exactly one command. A
    /// latched quit is serviced right after the next readiness line,
    /// so the shutdown `home` is the last command ever sent.
    pub fn run<F: FrontEnd>(&mut self, front: &mut F) -> Result<()> {
        log::info!("control loop started");
        loop {
            self.session.wait_ready()?;

            if self.pending == Some(Action::Quit) {
                log::info!("quit requested, homing and releasing the link");
                self.session.send(&Command::Home)?;
                return Ok(());
            }

            let raw = front.poll_detections()?;
            let targets: Vec<Target> = raw
                .iter()
                .filter_map(|d| Target::from_detection(d, &self.config.detect))
                .collect();
            let mut ordered = self.tracker.reorder(targets);

            let mut home = false;
            match self.pending.take() {
                Some(Action::CycleForward) => self.tracker.cycle_forward(&mut ordered),
                Some(Action::CycleBackward) => self.tracker.cycle_backward(&mut ordered),
                Some(Action::Home) => home = true,
                _ => {}
            }

            let primary = ordered.first();
            let (dx, dy) = aim::evaluate(primary, self.config.frame_center(), &self.config.aim);
            let on_target = primary.map_or(false, |t| aim::on_target(t, dx, dy, &self.config.aim));
            let fired = self.trigger.poll(on_target, Instant::now());
            if fired {
                log::info!("firing at target {:?}", primary.and_then(|t| t.track_id));
            }

            let step = aim::steer(dx, dy, &self.config.aim);
            let command = Command::select(fired, home, step);
            self.session.send(&command)?;

            let view = CycleView {
                targets: &ordered,
                offset: (dx, dy),
                fired,
                command: &command,
            };
            self.pending = self.keys.poll(front.present(&view)?);
        }
    }
}
