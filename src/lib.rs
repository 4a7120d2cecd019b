//! racedash - client for a racing game service
//!
//! This library provides:
//! - An async client for the race service HTTP API
//! - Markup rendering for track/racer lists, the countdown, the live
//!   leaderboard and the final results
//! - The race orchestrator: create, count down, start, poll until finished
//! - An application controller tying selection, catalog and races together
//!
//! # Example
//!
//! ```no_run
//! use racedash::app::RaceApp;
//! use racedash::catalog::DisplayNames;
//! use racedash::client::{ClientConfig, RaceClient};
//! use racedash::race::RaceConfig;
//! use racedash::view::TerminalSurface;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RaceClient::new(ClientConfig::default())?;
//!     let mut app = RaceApp::new(
//!         Arc::new(client),
//!         Arc::new(TerminalSurface::new()),
//!         RaceConfig::default(),
//!         DisplayNames::builtin(),
//!     );
//!
//!     app.load().await?;
//!     app.select_track(2).await?;
//!     app.select_racer(1).await?;
//!     let outcome = app.create_race().await?;
//!     println!("Placed {:?}", outcome.placing(1));
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod catalog;
pub mod client;
pub mod error;
pub mod models;
pub mod race;
pub mod selection;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use app::RaceApp;
pub use client::{ClientConfig, ClientError, RaceApi, RaceClient};
pub use error::RaceError;
pub use models::{CreatedRace, PositionEntry, RaceState, RaceStatus, Racer, Track};
pub use race::{RaceConfig, RaceOrchestrator, RaceOutcome, RacePhase};
pub use selection::Selection;
