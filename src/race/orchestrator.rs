use super::accelerate::Accelerator;
use super::countdown::run_countdown;
use super::poller::PollTimer;
use super::{EventSink, RaceConfig, RaceEvent, RaceOutcome, RacePhase};
use crate::catalog::DisplayNames;
use crate::client::{ClientError, RaceApi};
use crate::error::RaceError;
use crate::models::CreateRaceRequest;
use crate::selection::SharedSelection;
use crate::view::{self, Surface, LEADERBOARD, RACE};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc::UnboundedSender, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives one race at a time from the current selection to final results.
///
/// Calls are made strictly in the order create, countdown, start, poll.
/// `run` takes `&mut self`, so two races can never share an orchestrator
/// at the same time.
pub struct RaceOrchestrator<A, S> {
    api: Arc<A>,
    surface: Arc<S>,
    selection: SharedSelection,
    names: DisplayNames,
    config: RaceConfig,
    events: EventSink,
    cancel: CancellationToken,
    phase: RacePhase,
    /// Wire id of the running race, read by accelerators
    active: watch::Sender<Option<u32>>,
}

impl<A: RaceApi, S: Surface> RaceOrchestrator<A, S> {
    pub fn new(api: Arc<A>, surface: Arc<S>, selection: SharedSelection, config: RaceConfig) -> Self {
        let (active, _) = watch::channel(None);
        Self {
            api,
            surface,
            selection,
            names: DisplayNames::server(),
            config,
            events: EventSink::default(),
            cancel: CancellationToken::new(),
            phase: RacePhase::Idle,
            active,
        }
    }

    pub fn with_names(mut self, names: DisplayNames) -> Self {
        self.names = names;
        self
    }

    pub fn with_events(mut self, tx: UnboundedSender<RaceEvent>) -> Self {
        self.events = EventSink::new(tx);
        self
    }

    /// Cancelling `token` aborts a running race with [`RaceError::Cancelled`]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn set_names(&mut self, names: DisplayNames) {
        self.names = names;
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Handle for the accelerate control of races run by this orchestrator
    pub fn accelerator(&self) -> Accelerator<A> {
        Accelerator::new(Arc::clone(&self.api), self.active.subscribe())
    }

    fn enter(&mut self, phase: RacePhase) {
        debug!("Race phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.events.emit(RaceEvent::Phase(phase));
    }

    /// Await a service call unless the race gets cancelled first
    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, RaceError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RaceError::Cancelled),
            result = call => result.map_err(RaceError::from),
        }
    }

    /// Run a new race for the current selection.
    ///
    /// With an incomplete selection nothing is sent and the orchestrator
    /// stays idle. Any failure leaves the phase where the flow stopped.
    pub async fn run(&mut self) -> Result<RaceOutcome, RaceError> {
        self.phase = RacePhase::Idle;
        let request = self.selection.read().await.race_request()?;

        let result = self.drive(request).await;
        self.active.send_replace(None);
        result
    }

    async fn drive(&mut self, request: CreateRaceRequest) -> Result<RaceOutcome, RaceError> {
        let fallback = format!("Track {}", request.track_id);
        let track_name = self.names.track_name(request.track_id, &fallback).to_string();

        self.enter(RacePhase::Countdown);
        self.surface.mount(RACE, view::render_race_start(&track_name));

        let created = self
            .guarded(self.api.create_race(request.player_id, request.track_id))
            .await?;
        self.selection.write().await.assign_race(created.id);

        let wire_id = self.config.race_id_policy.wire_id(created.id);
        info!("Race {} created (wire id {})", created.id, wire_id);
        self.enter(RacePhase::Created);
        self.active.send_replace(Some(wire_id));

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(RaceError::Cancelled),
            _ = run_countdown(self.surface.as_ref(), &self.config, &self.events) => {}
        }

        self.guarded(self.api.start_race(wire_id)).await?;
        self.enter(RacePhase::Started);

        let player_id = Some(request.player_id);
        let mut timer = PollTimer::start(self.config.poll_interval, self.cancel.child_token());
        self.enter(RacePhase::Polling);

        let mut polls = 0u32;
        let mut failures = 0u32;
        let final_state = loop {
            if timer.tick().await.is_none() {
                return Err(RaceError::Cancelled);
            }
            polls += 1;

            let mut state = match self.guarded(self.api.poll_race(wire_id)).await {
                Ok(state) => {
                    failures = 0;
                    state
                }
                Err(RaceError::Cancelled) => return Err(RaceError::Cancelled),
                Err(e) => {
                    failures += 1;
                    warn!("Race {} poll failed ({} in a row): {}", wire_id, failures, e);
                    self.events.emit(RaceEvent::PollFailed {
                        consecutive: failures,
                    });
                    if self.config.max_poll_failures.is_some_and(|max| failures > max) {
                        return Err(e);
                    }
                    continue;
                }
            };

            self.names.label_positions(&mut state.positions);
            self.events.emit(RaceEvent::Polled(state.status));

            if !state.status.is_terminal() {
                self.surface
                    .mount(LEADERBOARD, view::render_leaderboard(&state.positions, player_id));
                continue;
            }

            timer.release();
            self.events.emit(RaceEvent::PollTimerReleased);
            break state;
        };

        self.surface
            .mount(RACE, view::render_results(&final_state.positions, player_id));
        self.enter(RacePhase::Finished);
        info!("Race {} finished after {} polls", created.id, polls);

        Ok(RaceOutcome {
            race_id: created.id,
            wire_id,
            status: final_state.status,
            positions: final_state.positions,
            polls,
            finished_at: Utc::now(),
        })
    }
}
