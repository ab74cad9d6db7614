use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use tokio::{
    sync::{mpsc, oneshot, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::carbon::CarbonModel;
use crate::milestone::MilestoneTracker;
use crate::models::{
    LocationUpdate, ModePrediction, RecommendedRoute, TransportMode, TripCompletionData,
};
use crate::presentation::{
    describe_detection, encouragement_message, format_elapsed, milestone_message,
    RouteInfoFormatter,
};
use crate::route::{determine_tracking_mode, RouteGeometrySplitter};
use crate::segmentation::SegmentChange;
use crate::settings::EngineSettings;
use crate::utils::logging::debug_enabled;

use super::completion::assemble_completion;
use super::events::{
    MilestoneEvent, ModeDetectedEvent, ProgressEvent, RoutePlan, StateChangedEvent,
    TripCompletedEvent, TripEvent, TripStarted,
};
use super::state::{TripSession, TripSnapshot, TripStatus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

const STREAM_CAPACITY: usize = 256;
const COMMAND_CAPACITY: usize = 16;

enum TripCommand {
    Start {
        user_mode: Option<String>,
        route: Option<RecommendedRoute>,
        at: DateTime<Utc>,
        reply: oneshot::Sender<Result<TripStarted>>,
    },
    SelectAlternative {
        index: usize,
        reply: oneshot::Sender<Result<RoutePlan>>,
    },
    Stop {
        at: DateTime<Utc>,
        reply: oneshot::Sender<Result<TripCompletionData>>,
    },
    Snapshot {
        reply: oneshot::Sender<TripSnapshot>,
    },
}

/// Handle to the engine task. Cheap to clone; every clone talks to the same trip.
#[derive(Clone)]
pub struct TripController {
    command_tx: mpsc::Sender<TripCommand>,
    location_tx: mpsc::Sender<LocationUpdate>,
    prediction_tx: mpsc::Sender<ModePrediction>,
    cancel_token: CancellationToken,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TripController {
    /// Spawns the engine task on the current tokio runtime. Events arrive on
    /// the returned receiver in the order they were produced.
    pub fn spawn(settings: EngineSettings) -> (Self, mpsc::UnboundedReceiver<TripEvent>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (location_tx, location_rx) = mpsc::channel(STREAM_CAPACITY);
        let (prediction_tx, prediction_rx) = mpsc::channel(STREAM_CAPACITY);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        let worker = TripWorker::new(settings, event_tx, debug_enabled());
        let handle = tokio::spawn(worker.run(
            command_rx,
            location_rx,
            prediction_rx,
            cancel_token.clone(),
        ));

        let controller = Self {
            command_tx,
            location_tx,
            prediction_tx,
            cancel_token,
            worker: Arc::new(Mutex::new(Some(handle))),
        };
        (controller, event_rx)
    }

    /// Sender for the location provider.
    pub fn location_sender(&self) -> mpsc::Sender<LocationUpdate> {
        self.location_tx.clone()
    }

    /// Sender for the mode classifier.
    pub fn prediction_sender(&self) -> mpsc::Sender<ModePrediction> {
        self.prediction_tx.clone()
    }

    pub async fn send_location(&self, update: LocationUpdate) -> Result<()> {
        self.location_tx
            .send(update)
            .await
            .map_err(|_| anyhow!("trip engine is not running"))
    }

    pub async fn send_prediction(&self, prediction: ModePrediction) -> Result<()> {
        self.prediction_tx
            .send(prediction)
            .await
            .map_err(|_| anyhow!("trip engine is not running"))
    }

    pub async fn start_trip(
        &self,
        user_mode: Option<String>,
        route: Option<RecommendedRoute>,
    ) -> Result<TripStarted> {
        self.start_trip_at(user_mode, route, Utc::now()).await
    }

    pub async fn start_trip_at(
        &self,
        user_mode: Option<String>,
        route: Option<RecommendedRoute>,
        at: DateTime<Utc>,
    ) -> Result<TripStarted> {
        self.request(|reply| TripCommand::Start {
            user_mode,
            route,
            at,
            reply,
        })
        .await?
    }

    /// Switches the loaded route to one of its alternatives and replans it.
    pub async fn select_alternative(&self, index: usize) -> Result<RoutePlan> {
        self.request(|reply| TripCommand::SelectAlternative { index, reply })
            .await?
    }

    pub async fn stop_trip(&self) -> Result<TripCompletionData> {
        self.stop_trip_at(Utc::now()).await
    }

    /// Stops at `at`. Events already queued on either stream are applied first.
    pub async fn stop_trip_at(&self, at: DateTime<Utc>) -> Result<TripCompletionData> {
        self.request(|reply| TripCommand::Stop { at, reply }).await?
    }

    pub async fn snapshot(&self) -> Result<TripSnapshot> {
        self.request(|reply| TripCommand::Snapshot { reply }).await
    }

    /// Cancels the engine task and waits for it to exit. Idempotent.
    pub async fn shutdown(&self) -> Result<()> {
        self.cancel_token.cancel();

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            handle
                .await
                .context("trip engine task failed to join")?;
        }
        Ok(())
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> TripCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| anyhow!("trip engine is not running"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("trip engine terminated unexpectedly"))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum StreamEvent {
    Location(LocationUpdate),
    Prediction(ModePrediction),
}

/// Merges two queues by `observed_at`, keeping each queue's own order. On a
/// tie the location goes first.
fn merge_by_time(
    locations: Vec<LocationUpdate>,
    predictions: Vec<ModePrediction>,
) -> Vec<StreamEvent> {
    let mut merged = Vec::with_capacity(locations.len() + predictions.len());
    let mut locations = locations.into_iter().peekable();
    let mut predictions = predictions.into_iter().peekable();

    loop {
        let take_location = match (locations.peek(), predictions.peek()) {
            (Some(update), Some(prediction)) => update.observed_at <= prediction.observed_at,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        let next = if take_location {
            locations.next().map(StreamEvent::Location)
        } else {
            predictions.next().map(StreamEvent::Prediction)
        };
        merged.extend(next);
    }

    merged
}

/// Owns the trip session. Runs as a single task; nothing else touches the session.
struct TripWorker {
    session: TripSession,
    route: Option<RecommendedRoute>,
    carbon: CarbonModel,
    splitter: RouteGeometrySplitter,
    route_info: RouteInfoFormatter,
    events: mpsc::UnboundedSender<TripEvent>,
    debug_mode: bool,
}

impl TripWorker {
    fn new(
        settings: EngineSettings,
        events: mpsc::UnboundedSender<TripEvent>,
        debug_mode: bool,
    ) -> Self {
        let carbon = CarbonModel::new(settings.carbon);
        Self {
            session: TripSession::new(MilestoneTracker::new(settings.milestones_m)),
            route: None,
            route_info: RouteInfoFormatter::new(carbon.clone()),
            carbon,
            splitter: RouteGeometrySplitter::new(settings.palette),
            events,
            debug_mode,
        }
    }

    async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<TripCommand>,
        mut location_rx: mpsc::Receiver<LocationUpdate>,
        mut prediction_rx: mpsc::Receiver<ModePrediction>,
        cancel_token: CancellationToken,
    ) {
        log_info!("trip engine started");

        loop {
            tokio::select! {
                biased;

                _ = cancel_token.cancelled() => {
                    log_info!("trip engine shutting down");
                    break;
                }
                command = command_rx.recv() => {
                    let Some(command) = command else {
                        log_info!("all trip controllers dropped, engine exiting");
                        break;
                    };
                    self.handle_command(command, &mut location_rx, &mut prediction_rx);
                }
                Some(update) = location_rx.recv() => self.on_location(update),
                Some(prediction) = prediction_rx.recv() => self.on_prediction(prediction),
            }
        }
    }

    fn handle_command(
        &mut self,
        command: TripCommand,
        location_rx: &mut mpsc::Receiver<LocationUpdate>,
        prediction_rx: &mut mpsc::Receiver<ModePrediction>,
    ) {
        match command {
            TripCommand::Start {
                user_mode,
                route,
                at,
                reply,
            } => {
                // Anything queued before the start belongs to no trip
                self.drain(location_rx, prediction_rx);
                let _ = reply.send(self.start(user_mode, route, at));
            }
            TripCommand::SelectAlternative { index, reply } => {
                let _ = reply.send(self.select_alternative(index));
            }
            TripCommand::Stop { at, reply } => {
                self.drain(location_rx, prediction_rx);
                let _ = reply.send(self.stop(at));
            }
            TripCommand::Snapshot { reply } => {
                self.drain(location_rx, prediction_rx);
                let _ = reply.send(self.session.snapshot());
            }
        }
    }

    /// Applies every event already sitting in either stream, interleaved by
    /// observation time.
    fn drain(
        &mut self,
        location_rx: &mut mpsc::Receiver<LocationUpdate>,
        prediction_rx: &mut mpsc::Receiver<ModePrediction>,
    ) {
        let mut locations = Vec::new();
        while let Ok(update) = location_rx.try_recv() {
            locations.push(update);
        }
        let mut predictions = Vec::new();
        while let Ok(prediction) = prediction_rx.try_recv() {
            predictions.push(prediction);
        }

        let queued = merge_by_time(locations, predictions);
        if !queued.is_empty() {
            log_debug!("draining {} queued events", queued.len());
        }
        for event in queued {
            match event {
                StreamEvent::Location(update) => self.on_location(update),
                StreamEvent::Prediction(prediction) => self.on_prediction(prediction),
            }
        }
    }

    fn start(
        &mut self,
        user_mode: Option<String>,
        route: Option<RecommendedRoute>,
        at: DateTime<Utc>,
    ) -> Result<TripStarted> {
        if self.session.is_tracking() {
            bail!("trip already active");
        }

        let trip_id = Uuid::new_v4().to_string();
        self.session.begin(trip_id.clone(), user_mode, at);
        self.route = route;

        let route_plan = self.plan_route(None)?;

        log_info!(
            "trip {} started (declared mode: {}, route: {})",
            trip_id,
            self.session.user_selected_mode(),
            if self.route.is_some() { "yes" } else { "no" }
        );

        self.emit(TripEvent::StateChanged(StateChangedEvent {
            status: TripStatus::Tracking,
            trip_id: Some(trip_id.clone()),
        }));
        if let Some(plan) = &route_plan {
            self.emit(TripEvent::RoutePlanned(plan.clone()));
        }

        Ok(TripStarted {
            trip_id,
            started_at: at,
            route_plan,
        })
    }

    fn select_alternative(&mut self, index: usize) -> Result<RoutePlan> {
        let plan = self
            .plan_route(Some(index))?
            .ok_or_else(|| anyhow!("no route loaded"))?;

        log_info!("switched to route alternative {index}");
        self.emit(TripEvent::RoutePlanned(plan.clone()));
        Ok(plan)
    }

    /// Plans the loaded route, or one of its alternatives. `None` without a route.
    fn plan_route(&self, alternative: Option<usize>) -> Result<Option<RoutePlan>> {
        let Some(route) = &self.route else {
            return Ok(None);
        };
        let route_mode = self.session.user_mode().unwrap_or_default();

        let plan = match alternative {
            None => RoutePlan {
                alternative: None,
                tracking_mode: determine_tracking_mode(route.points(), route.steps()),
                render_plan: self.splitter.plan_route(route, route_mode),
                route_info: self.route_info.format(route),
            },
            Some(index) => {
                let selected = route
                    .route_alternatives
                    .as_deref()
                    .and_then(|alternatives| alternatives.get(index))
                    .ok_or_else(|| anyhow!("route has no alternative {index}"))?;

                RoutePlan {
                    alternative: Some(index),
                    tracking_mode: determine_tracking_mode(
                        &selected.route_points,
                        &selected.route_steps,
                    ),
                    render_plan: self.splitter.plan_alternative(selected, route_mode),
                    route_info: self.route_info.format_alternative(route, selected),
                }
            }
        };

        if self.debug_mode {
            log_debug!(
                "route planned: {:?} with {} segments",
                plan.render_plan.strategy,
                plan.render_plan.segments.len()
            );
        }
        Ok(Some(plan))
    }

    fn stop(&mut self, at: DateTime<Utc>) -> Result<TripCompletionData> {
        if !self.session.stop(at) {
            bail!("no active trip to stop");
        }

        let trip_id = self
            .session
            .trip_id()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("missing trip id"))?;

        let data = assemble_completion(
            self.session.tracker(),
            Some(self.session.user_selected_mode()),
            self.session.distance_meters(),
            &self.carbon,
        );

        info!(
            "trip {} completed: {:.0} m, {} segments, detected {:?}, saved {} g",
            trip_id,
            data.distance_meters,
            data.transport_modes.len(),
            data.detected_mode,
            data.carbon_saved_grams
        );

        self.emit(TripEvent::StateChanged(StateChangedEvent {
            status: TripStatus::Stopped,
            trip_id: Some(trip_id.clone()),
        }));
        self.emit(TripEvent::Completed(TripCompletedEvent {
            trip_id,
            data: data.clone(),
        }));

        Ok(data)
    }

    fn on_location(&mut self, update: LocationUpdate) {
        let Some(outcome) = self.session.record_location(&update) else {
            if self.debug_mode {
                log_debug!("location ignored while {:?}", self.session.status());
            }
            return;
        };

        let user_mode = self.session.user_mode();
        let carbon_saved_grams = self.carbon.saved_grams(outcome.distance_meters, user_mode);

        if self.debug_mode {
            log_debug!(
                "location: {:.1} m, saved {:.1} g",
                outcome.distance_meters,
                carbon_saved_grams
            );
        }

        self.emit(TripEvent::Progress(ProgressEvent {
            distance_meters: outcome.distance_meters,
            carbon_saved_grams,
            elapsed_ms: outcome.elapsed_ms,
            elapsed_text: format_elapsed(outcome.elapsed_ms),
            message: encouragement_message(&self.carbon, outcome.distance_meters, user_mode),
        }));

        if let Some(milestone) = outcome.milestone {
            log_info!("milestone reached: {} m", milestone.threshold_m);
            self.emit(TripEvent::MilestoneReached(MilestoneEvent {
                milestone,
                message: milestone_message(&self.carbon, milestone.threshold_m, user_mode),
            }));
        }
    }

    fn on_prediction(&mut self, prediction: ModePrediction) {
        let Some(change) = self.session.record_prediction(&prediction) else {
            if self.debug_mode {
                log_debug!("prediction ignored while {:?}", self.session.status());
            }
            return;
        };

        let tracker = self.session.tracker();
        let mode_changed = matches!(change, SegmentChange::Started(_));
        if mode_changed {
            log_debug!(
                "mode segment {} opened: {:?}",
                tracker.segments().len(),
                prediction.mode
            );
        }

        if !(0.0..=1.0).contains(&prediction.confidence) {
            log_warn!(
                "classifier confidence {} outside [0, 1]",
                prediction.confidence
            );
        }

        let dominant_mode: TransportMode = tracker.dominant_mode();
        let event = ModeDetectedEvent {
            detection: describe_detection(prediction.mode, prediction.confidence),
            dominant_mode,
            segment_count: tracker.segments().len(),
            mode_changed,
        };
        self.emit(TripEvent::ModeDetected(event));
    }

    fn emit(&self, event: TripEvent) {
        if self.debug_mode {
            log_debug!("emit {}", event.name());
        }
        // Nobody listening is not an engine failure
        let _ = self.events.send(event);
    }
}
