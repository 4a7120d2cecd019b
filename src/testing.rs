//! Scripted race service for tests

use crate::client::{ClientError, RaceApi};
use crate::models::{CreatedRace, PositionEntry, RaceState, RaceStatus, Racer, Track};
use crate::view::{MemorySurface, COUNTDOWN};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchTracks,
    FetchRacers,
    CreateRace { player_id: u32, track_id: u32 },
    StartRace(u32),
    PollRace(u32),
    Accelerate(u32),
}

/// Race service double. Poll responses come from a script; `None` entries
/// fail with a decode error and an exhausted script keeps answering
/// `in-progress`.
pub struct FakeApi {
    calls: Mutex<Vec<(Instant, Call)>>,
    polls: Mutex<VecDeque<Option<RaceState>>>,
    tracks: Vec<Track>,
    racers: Vec<Racer>,
    created_id: u32,
    fail_catalog: bool,
    stall_catalog: bool,
    fail_create: bool,
    fail_start: bool,
    fail_accelerate: bool,
    observed: Option<Arc<MemorySurface>>,
    countdown_at_start: Mutex<Option<String>>,
}

fn decode_error() -> ClientError {
    ClientError::Decode(serde_json::from_str::<RaceState>("<html>").unwrap_err())
}

pub fn in_progress(segments: &[(u32, f64)]) -> RaceState {
    RaceState {
        status: RaceStatus::InProgress,
        positions: segments
            .iter()
            .map(|&(id, segment)| PositionEntry {
                id,
                driver_name: format!("Racer {}", id),
                final_position: None,
                segment,
            })
            .collect(),
    }
}

pub fn finished(placings: &[(u32, u32)]) -> RaceState {
    RaceState {
        status: RaceStatus::Finished,
        positions: placings
            .iter()
            .map(|&(id, place)| PositionEntry {
                id,
                driver_name: format!("Racer {}", id),
                final_position: Some(place),
                segment: 0.0,
            })
            .collect(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            polls: Mutex::new(VecDeque::new()),
            tracks: (1..=3)
                .map(|id| Track {
                    id,
                    name: format!("Track {}", id),
                })
                .collect(),
            racers: (1..=3)
                .map(|id| Racer {
                    id,
                    driver_name: format!("Racer {}", id),
                    top_speed: 500.0,
                    acceleration: 10.0,
                    handling: 10.0,
                })
                .collect(),
            created_id: 1,
            fail_catalog: false,
            stall_catalog: false,
            fail_create: false,
            fail_start: false,
            fail_accelerate: false,
            observed: None,
            countdown_at_start: Mutex::new(None),
        }
    }

    pub fn with_created_id(mut self, id: u32) -> Self {
        self.created_id = id;
        self
    }

    pub fn with_polls(self, states: Vec<RaceState>) -> Self {
        self.with_script(states.into_iter().map(Some).collect())
    }

    pub fn with_script(self, script: Vec<Option<RaceState>>) -> Self {
        *self.polls.lock().unwrap() = script.into();
        self
    }

    pub fn failing_catalog(mut self) -> Self {
        self.fail_catalog = true;
        self
    }

    /// Track requests never get an answer
    pub fn stalled_catalog(mut self) -> Self {
        self.stall_catalog = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_accelerate(mut self) -> Self {
        self.fail_accelerate = true;
        self
    }

    /// Remember what the countdown showed when the race was started
    pub fn observing(mut self, surface: Arc<MemorySurface>) -> Self {
        self.observed = Some(surface);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.timed_calls().into_iter().map(|(_, call)| call).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining_polls(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    pub fn countdown_at_start(&self) -> Option<String> {
        self.countdown_at_start.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }
}

impl RaceApi for FakeApi {
    async fn fetch_tracks(&self) -> Result<Vec<Track>, ClientError> {
        self.record(Call::FetchTracks);
        if self.stall_catalog {
            std::future::pending::<()>().await;
        }
        if self.fail_catalog {
            return Err(decode_error());
        }
        Ok(self.tracks.clone())
    }

    async fn fetch_racers(&self) -> Result<Vec<Racer>, ClientError> {
        self.record(Call::FetchRacers);
        Ok(self.racers.clone())
    }

    async fn create_race(&self, player_id: u32, track_id: u32) -> Result<CreatedRace, ClientError> {
        self.record(Call::CreateRace {
            player_id,
            track_id,
        });
        if self.fail_create {
            return Err(decode_error());
        }
        Ok(CreatedRace {
            id: self.created_id,
        })
    }

    async fn start_race(&self, race_id: u32) -> Result<(), ClientError> {
        self.record(Call::StartRace(race_id));
        if let Some(surface) = &self.observed {
            *self.countdown_at_start.lock().unwrap() = surface.contents(COUNTDOWN);
        }
        if self.fail_start {
            return Err(decode_error());
        }
        Ok(())
    }

    async fn poll_race(&self, race_id: u32) -> Result<RaceState, ClientError> {
        self.record(Call::PollRace(race_id));
        let next = self.polls.lock().unwrap().pop_front();
        match next {
            Some(Some(state)) => Ok(state),
            Some(None) => Err(decode_error()),
            None => Ok(in_progress(&[])),
        }
    }

    async fn accelerate(&self, race_id: u32) -> Result<(), ClientError> {
        self.record(Call::Accelerate(race_id));
        if self.fail_accelerate {
            return Err(decode_error());
        }
        Ok(())
    }
}
