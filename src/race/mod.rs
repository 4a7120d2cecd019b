//! Race lifecycle: create, count down, start, poll until finished
//!
//! # Example
//!
//! ```no_run
//! use racedash::client::{ClientConfig, RaceClient};
//! use racedash::race::{RaceConfig, RaceOrchestrator};
//! use racedash::selection::Selection;
//! use racedash::view::TerminalSurface;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = Arc::new(RaceClient::new(ClientConfig::default())?);
//!     let mut selection = Selection::new();
//!     selection.select_track(2);
//!     selection.select_racer(1);
//!
//!     let mut race = RaceOrchestrator::new(
//!         api,
//!         Arc::new(TerminalSurface::new()),
//!         selection.shared(),
//!         RaceConfig::default(),
//!     );
//!     let outcome = race.run().await?;
//!     println!("Race {} finished after {} polls", outcome.race_id, outcome.polls);
//!
//!     Ok(())
//! }
//! ```

mod accelerate;
mod config;
mod countdown;
mod orchestrator;
mod poller;

pub use accelerate::Accelerator;
pub use config::{RaceConfig, RaceIdPolicy};
pub use orchestrator::RaceOrchestrator;

use crate::models::{PositionEntry, RaceStatus};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;

/// Phases of a single race, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Idle,
    /// Race screen is up; creation and the countdown happen here
    Countdown,
    /// Server issued a race id
    Created,
    /// Start acknowledged after the countdown reached 0
    Started,
    Polling,
    Finished,
}

/// Progress notifications emitted while a race runs
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    Phase(RacePhase),
    Countdown(u32),
    Polled(RaceStatus),
    PollFailed { consecutive: u32 },
    PollTimerReleased,
}

/// Optional receiver of [`RaceEvent`]s
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<RaceEvent>>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<RaceEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn emit(&self, event: RaceEvent) {
        if let Some(tx) = &self.tx {
            // Nobody listening any more is fine
            let _ = tx.send(event);
        }
    }
}

/// Result of a finished race
#[derive(Debug, Clone)]
pub struct RaceOutcome {
    /// Id as issued on creation
    pub race_id: u32,
    /// Id used for start, poll and accelerate
    pub wire_id: u32,
    pub status: RaceStatus,
    /// Final standings as reported, display names applied
    pub positions: Vec<PositionEntry>,
    /// Poll requests issued, failed ones included
    pub polls: u32,
    pub finished_at: DateTime<Utc>,
}

impl RaceOutcome {
    /// Final position of one racer, if placed
    pub fn placing(&self, racer_id: u32) -> Option<u32> {
        self.positions
            .iter()
            .find(|p| p.id == racer_id)
            .and_then(|p| p.final_position)
    }
}
