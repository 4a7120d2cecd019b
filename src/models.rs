use serde::{Deserialize, Serialize};

/// Track as listed by `GET /api/tracks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// Racer (car) as listed by `GET /api/cars`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Racer {
    pub id: u32,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub top_speed: f64,
    #[serde(default)]
    pub acceleration: f64,
    #[serde(default)]
    pub handling: f64,
}

/// Body of `POST /api/races`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRaceRequest {
    pub player_id: u32,
    pub track_id: u32,
}

/// Response of `POST /api/races`. Only the id is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRace {
    #[serde(rename = "ID")]
    pub id: u32,
}

/// Race status reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RaceStatus {
    Unstarted,
    InProgress,
    Finished,
    #[serde(other)]
    Unknown,
}

impl RaceStatus {
    /// Everything but `in-progress` ends the poll loop
    pub fn is_terminal(self) -> bool {
        self != RaceStatus::InProgress
    }
}

/// One racer's standing in a polled race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEntry {
    pub id: u32,
    #[serde(default)]
    pub driver_name: String,
    /// Only set once the race is terminal
    #[serde(default)]
    pub final_position: Option<u32>,
    /// Progress along the track, higher is further ahead
    #[serde(default)]
    pub segment: f64,
}

/// Response of `GET /api/races/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceState {
    pub status: RaceStatus,
    #[serde(default)]
    pub positions: Vec<PositionEntry>,
}
