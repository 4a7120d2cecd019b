//! Application controller: owns the selection and wires user actions to
//! the catalog, the renderer and the race orchestrator

use crate::catalog::{Catalog, DisplayNames};
use crate::client::RaceApi;
use crate::error::RaceError;
use crate::race::{Accelerator, RaceConfig, RaceEvent, RaceOrchestrator, RaceOutcome};
use crate::selection::{Selection, SharedSelection};
use crate::view::{self, Surface, RACERS, TRACKS};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub struct RaceApp<A, S> {
    api: Arc<A>,
    surface: Arc<S>,
    selection: SharedSelection,
    names: DisplayNames,
    catalog: Catalog,
    orchestrator: RaceOrchestrator<A, S>,
    cancel: CancellationToken,
}

impl<A: RaceApi, S: Surface> RaceApp<A, S> {
    pub fn new(api: Arc<A>, surface: Arc<S>, config: RaceConfig, names: DisplayNames) -> Self {
        let selection = Selection::new().shared();
        let orchestrator = RaceOrchestrator::new(
            Arc::clone(&api),
            Arc::clone(&surface),
            selection.clone(),
            config,
        )
        .with_names(names.clone());

        Self {
            api,
            surface,
            selection,
            names,
            catalog: Catalog::default(),
            orchestrator,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_events(mut self, tx: UnboundedSender<RaceEvent>) -> Self {
        self.orchestrator = self.orchestrator.with_events(tx);
        self
    }

    /// Cancelling the token abandons a catalog load or a running race
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.orchestrator = self.orchestrator.with_cancellation(token.clone());
        self.cancel = token;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn selection(&self) -> Selection {
        *self.selection.read().await
    }

    pub fn accelerator(&self) -> Accelerator<A> {
        self.orchestrator.accelerator()
    }

    /// Fetch tracks and racers concurrently and render both lists.
    ///
    /// A list that loads is rendered even when the other one fails; the
    /// first failure is returned. Cancellation abandons both requests and
    /// leaves the catalog as it was.
    pub async fn load(&mut self) -> Result<&Catalog, RaceError> {
        self.surface.mount(TRACKS, view::render_track_list(&[], None));
        self.surface.mount(RACERS, view::render_racer_list(&[], None));

        let api = Arc::clone(&self.api);
        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            both = async { tokio::join!(api.fetch_tracks(), api.fetch_racers()) } => Some(both),
        };
        let Some((tracks, racers)) = fetched else {
            warn!("Loading tracks and racers cancelled");
            return Err(RaceError::Cancelled);
        };
        let mut first_error = None;

        match tracks {
            Ok(mut tracks) => {
                self.names.label_tracks(&mut tracks);
                self.surface.mount(TRACKS, view::render_track_list(&tracks, None));
                self.catalog.tracks = tracks;
            }
            Err(e) => {
                error!("Problem getting tracks: {}", e);
                first_error = Some(e);
            }
        }

        match racers {
            Ok(mut racers) => {
                self.names.label_racers(&mut racers);
                self.surface.mount(RACERS, view::render_racer_list(&racers, None));
                self.catalog.racers = racers;
            }
            Err(e) => {
                error!("Problem getting racers: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        info!(
            "Loaded {} tracks and {} racers",
            self.catalog.tracks.len(),
            self.catalog.racers.len()
        );

        // Server-provided names fill the gaps of the name table
        let mut names = self.names.clone();
        for track in &self.catalog.tracks {
            names = names.with_track(track.id, track.name.clone());
        }
        self.orchestrator.set_names(names);

        match first_error {
            Some(e) => Err(RaceError::Api(e)),
            None => Ok(&self.catalog),
        }
    }

    pub async fn select_track(&mut self, track_id: u32) -> Result<(), RaceError> {
        if self.catalog.track(track_id).is_none() {
            return Err(RaceError::UnknownTrack(track_id));
        }
        self.selection.write().await.select_track(track_id);
        self.surface
            .mount(TRACKS, view::render_track_list(&self.catalog.tracks, Some(track_id)));
        Ok(())
    }

    pub async fn select_racer(&mut self, racer_id: u32) -> Result<(), RaceError> {
        if self.catalog.racer(racer_id).is_none() {
            return Err(RaceError::UnknownRacer(racer_id));
        }
        self.selection.write().await.select_racer(racer_id);
        self.surface
            .mount(RACERS, view::render_racer_list(&self.catalog.racers, Some(racer_id)));
        Ok(())
    }

    /// Run a race for the current selection; failures are logged here and
    /// handed back to the caller
    pub async fn create_race(&mut self) -> Result<RaceOutcome, RaceError> {
        let result = self.orchestrator.run().await;
        let player_id = self.selection.read().await.player_id;
        match &result {
            Ok(outcome) => info!(
                "Race {} over, player placed {:?}",
                outcome.race_id,
                player_id.and_then(|id| outcome.placing(id))
            ),
            Err(e @ RaceError::GuardViolation { .. }) => warn!("{}", e),
            Err(e) => error!("Race stopped during {:?}: {}", self.orchestrator.phase(), e),
        }
        result
    }
}
