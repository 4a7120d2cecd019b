//! Client for the race service HTTP API
//!
//! The orchestrator only talks to the service through [`RaceApi`], so the
//! HTTP implementation ([`RaceClient`]) can be swapped for a scripted one.
//!
//! # Example
//!
//! ```no_run
//! use racedash::client::{ClientConfig, RaceApi, RaceClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RaceClient::new(ClientConfig::default())?;
//!
//!     let tracks = client.fetch_tracks().await?;
//!     println!("Found {} tracks", tracks.len());
//!
//!     Ok(())
//! }
//! ```

mod http;

pub use http::{ClientConfig, ClientError, RaceClient, DEFAULT_SERVER};

use crate::models::{CreatedRace, RaceState, Racer, Track};
use std::future::Future;

/// Operations the race flow needs from the race service.
///
/// Race ids passed here are wire ids: whatever offset the server expects
/// has already been applied by the caller.
pub trait RaceApi: Send + Sync + 'static {
    fn fetch_tracks(&self) -> impl Future<Output = Result<Vec<Track>, ClientError>> + Send;

    fn fetch_racers(&self) -> impl Future<Output = Result<Vec<Racer>, ClientError>> + Send;

    fn create_race(
        &self,
        player_id: u32,
        track_id: u32,
    ) -> impl Future<Output = Result<CreatedRace, ClientError>> + Send;

    fn start_race(&self, race_id: u32) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn poll_race(&self, race_id: u32)
        -> impl Future<Output = Result<RaceState, ClientError>> + Send;

    fn accelerate(&self, race_id: u32) -> impl Future<Output = Result<(), ClientError>> + Send;
}
