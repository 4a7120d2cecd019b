use crate::error::{validate_selection, RaceError};
use crate::models::CreateRaceRequest;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Selection shared between the application and a running race
pub type SharedSelection = Arc<RwLock<Selection>>;

/// What the user has picked so far, plus the race it led to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub track_id: Option<u32>,
    pub player_id: Option<u32>,
    /// Id as issued by the server on creation
    pub race_id: Option<u32>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedSelection {
        Arc::new(RwLock::new(self))
    }

    /// Replaces any previously selected track
    pub fn select_track(&mut self, track_id: u32) {
        self.track_id = Some(track_id);
    }

    /// Replaces any previously selected racer
    pub fn select_racer(&mut self, player_id: u32) {
        self.player_id = Some(player_id);
    }

    /// Request for a new race, if both a track and a racer are selected
    pub fn race_request(&self) -> Result<CreateRaceRequest, RaceError> {
        validate_selection(self.track_id, self.player_id)
    }

    /// Record a newly created race, replacing the previous one
    pub fn assign_race(&mut self, race_id: u32) {
        self.race_id = Some(race_id);
    }
}
