use std::fmt;

use crate::client::ClientError;
use crate::models::CreateRaceRequest;

/// Race flow error types
#[derive(Debug)]
pub enum RaceError {
    /// Race creation attempted with an incomplete selection
    GuardViolation { missing: &'static str },
    /// Track id is not part of the loaded catalog
    UnknownTrack(u32),
    /// Racer id is not part of the loaded catalog
    UnknownRacer(u32),
    /// A call to the race service failed
    Api(ClientError),
    /// The race was aborted from outside before it finished
    Cancelled,
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceError::GuardViolation { missing } => {
                write!(f, "Cannot create race: no {} selected", missing)
            }
            RaceError::UnknownTrack(id) => write!(f, "Unknown track id: {}", id),
            RaceError::UnknownRacer(id) => write!(f, "Unknown racer id: {}", id),
            RaceError::Api(e) => write!(f, "Race service error: {}", e),
            RaceError::Cancelled => write!(f, "Race cancelled"),
        }
    }
}

impl std::error::Error for RaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RaceError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClientError> for RaceError {
    fn from(e: ClientError) -> Self {
        RaceError::Api(e)
    }
}

/// Both ids must be chosen before a race can be created
pub fn validate_selection(
    track_id: Option<u32>,
    player_id: Option<u32>,
) -> Result<CreateRaceRequest, RaceError> {
    let track_id = track_id.ok_or(RaceError::GuardViolation { missing: "track" })?;
    let player_id = player_id.ok_or(RaceError::GuardViolation { missing: "racer" })?;
    Ok(CreateRaceRequest {
        player_id,
        track_id,
    })
}
