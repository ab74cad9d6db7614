use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::mpsc::UnboundedReceiver;

use ecotrip_lib::{
    route::RenderStrategy, EngineSettings, GeoPoint, LocationUpdate, ModePrediction,
    RecommendedRoute, RouteAlternative, RouteStep, TransportMode, TripController, TripEvent,
    TripStatus,
};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
}

fn fix(secs: i64, distance: f64) -> LocationUpdate {
    LocationUpdate {
        observed_at: at(secs),
        point: GeoPoint::new(1.30, 103.78),
        distance_meters: distance,
    }
}

fn predict(secs: i64, mode: TransportMode, confidence: f32) -> ModePrediction {
    ModePrediction {
        mode,
        confidence,
        observed_at: at(secs),
    }
}

fn overview(n: usize) -> Vec<GeoPoint> {
    (0..n)
        .map(|i| GeoPoint::new(1.29 + i as f64 * 0.001, 103.77))
        .collect()
}

fn drain_events(events: &mut UnboundedReceiver<TripEvent>) -> Vec<TripEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test]
async fn declared_car_with_detected_bus_is_not_green() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());

    engine
        .start_trip_at(Some("car".into()), None, at(0))
        .await
        .unwrap();

    engine.send_prediction(predict(0, TransportMode::Walking, 0.9)).await.unwrap();
    engine.send_prediction(predict(60, TransportMode::Bus, 0.7)).await.unwrap();
    engine.send_location(fix(300, 2000.0)).await.unwrap();
    engine.send_prediction(predict(900, TransportMode::Bus, 0.8)).await.unwrap();
    engine.send_location(fix(900, 5000.0)).await.unwrap();

    let data = engine.stop_trip_at(at(900)).await.unwrap();

    assert_eq!(data.detected_mode.as_deref(), Some("bus"));
    assert_eq!(data.user_selected_mode, "car");
    assert!(!data.is_green_trip);
    assert_eq!(data.carbon_saved_grams, 0);
    assert_eq!(data.distance_meters, 5000.0);
    assert_eq!(data.transport_modes.len(), 2);

    let total_km: f64 = data.transport_modes.iter().map(|s| s.sub_distance).sum();
    assert!((total_km - 5.0).abs() < 1e-9);

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn stop_without_predictions_reports_no_detection() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());

    engine.start_trip_at(None, None, at(0)).await.unwrap();
    engine.send_location(fix(600, 2000.0)).await.unwrap();
    let data = engine.stop_trip_at(at(600)).await.unwrap();

    assert_eq!(data.detected_mode, None);
    assert_eq!(data.ml_confidence, None);
    assert_eq!(data.user_selected_mode, "walk");
    assert!(data.is_green_trip);
    assert_eq!(data.carbon_saved_grams, 300);
    assert!(data.transport_modes.is_empty());
}

#[tokio::test]
async fn lifecycle_misuse_is_an_error() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());

    assert!(engine.stop_trip_at(at(0)).await.is_err());

    engine.start_trip_at(None, None, at(0)).await.unwrap();
    assert!(engine.start_trip_at(None, None, at(1)).await.is_err());

    engine.stop_trip_at(at(10)).await.unwrap();
    assert!(engine.stop_trip_at(at(11)).await.is_err());

    // a stopped trip can be followed by a new one
    let second = engine.start_trip_at(None, None, at(20)).await.unwrap();
    assert_eq!(engine.snapshot().await.unwrap().trip_id, Some(second.trip_id));
}

#[tokio::test]
async fn events_after_stop_are_ignored() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());

    engine.start_trip_at(Some("bike".into()), None, at(0)).await.unwrap();
    engine.send_prediction(predict(0, TransportMode::Cycling, 0.9)).await.unwrap();
    engine.stop_trip_at(at(120)).await.unwrap();

    engine.send_prediction(predict(200, TransportMode::Driving, 0.9)).await.unwrap();
    engine.send_location(fix(200, 9000.0)).await.unwrap();

    // a start drains anything still queued; it must not leak into either trip
    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.status, TripStatus::Stopped);

    engine.start_trip_at(None, None, at(300)).await.unwrap();
    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.status, TripStatus::Tracking);
    assert!(snapshot.segments.is_empty());
    assert_eq!(snapshot.distance_meters, 0.0);
}

#[tokio::test]
async fn events_queued_before_start_are_discarded() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());

    engine.send_location(fix(0, 4000.0)).await.unwrap();
    engine.send_prediction(predict(0, TransportMode::Bus, 0.9)).await.unwrap();

    engine.start_trip_at(None, None, at(10)).await.unwrap();
    let data = engine.stop_trip_at(at(20)).await.unwrap();
    assert_eq!(data.distance_meters, 0.0);
    assert_eq!(data.detected_mode, None);
}

#[tokio::test]
async fn progress_and_milestones_are_emitted_in_order() {
    let (engine, mut events) = TripController::spawn(EngineSettings::default());

    engine.start_trip_at(Some("walk".into()), None, at(0)).await.unwrap();
    for (secs, distance) in [(60, 500.0), (120, 1200.0), (240, 2500.0), (300, 2600.0)] {
        engine.send_location(fix(secs, distance)).await.unwrap();
    }
    engine.send_prediction(predict(30, TransportMode::Walking, 0.95)).await.unwrap();
    engine.stop_trip_at(at(300)).await.unwrap();

    let events = drain_events(&mut events);
    assert!(matches!(events.first(), Some(TripEvent::StateChanged(e)) if e.status == TripStatus::Tracking));
    assert!(matches!(events.last(), Some(TripEvent::Completed(_))));

    let milestones: Vec<f64> = events
        .iter()
        .filter_map(|event| match event {
            TripEvent::MilestoneReached(m) => Some(m.milestone.threshold_m),
            _ => None,
        })
        .collect();
    assert_eq!(milestones, vec![1000.0, 2000.0]);

    let first_milestone = events
        .iter()
        .find_map(|event| match event {
            TripEvent::MilestoneReached(m) => Some(m.message.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_milestone, "Congrats! You've walked 1000 m, carbon reduced 150 g 🎉");

    let progress: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            TripEvent::Progress(p) => Some(p.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 4);
    assert_eq!(progress[0].message, "Carbon reduced 75 g | Keep it up 💪");
    assert_eq!(progress[1].elapsed_text, "02:00");

    let detected = events
        .iter()
        .find_map(|event| match event {
            TripEvent::ModeDetected(d) => Some(d.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(detected.detection.tracking_text, "🚶 Detected: Walking (95%)");
    assert_eq!(detected.dominant_mode, TransportMode::Walking);
    assert!(detected.mode_changed);
}

#[tokio::test]
async fn route_plan_follows_tracking_mode() {
    let (engine, mut events) = TripController::spawn(EngineSettings::default());

    let route = RecommendedRoute {
        route_type: Some("low_carbon".into()),
        total_distance: 1.2,
        estimated_duration: 15,
        route_points: Some(overview(24)),
        route_steps: Some(vec![
            RouteStep {
                travel_mode: "TRANSIT".into(),
                distance: 1000.0,
                ..RouteStep::default()
            },
            RouteStep {
                travel_mode: "WALKING".into(),
                distance: 200.0,
                ..RouteStep::default()
            },
        ]),
        route_alternatives: Some(vec![RouteAlternative {
            total_distance: 1.5,
            estimated_duration: 12,
            route_points: overview(10),
            route_steps: vec![RouteStep {
                travel_mode: "TRANSIT".into(),
                distance: 1500.0,
                polyline_points: Some(overview(6)),
                ..RouteStep::default()
            }],
            ..RouteAlternative::default()
        }]),
        ..RecommendedRoute::default()
    };

    let started = engine
        .start_trip_at(Some("bus".into()), Some(route), at(0))
        .await
        .unwrap();
    let plan = started.route_plan.unwrap();
    assert!(plan.tracking_mode.is_navigation_mode);
    assert!(plan.tracking_mode.has_transit_fallback);
    assert_eq!(plan.render_plan.strategy, RenderStrategy::ProportionalFallback);
    let counts: Vec<usize> = plan.render_plan.segments.iter().map(|s| s.points.len()).collect();
    assert_eq!(counts, vec![20, 4]);
    assert_eq!(plan.route_info.route_type_text, "Low Carbon Route");
    assert!(plan.route_info.show_route_options);

    let alternative = engine.select_alternative(0).await.unwrap();
    assert_eq!(alternative.alternative, Some(0));
    assert!(alternative.tracking_mode.has_transit_with_polylines);
    assert_eq!(alternative.render_plan.strategy, RenderStrategy::PerStep);
    assert_eq!(alternative.route_info.duration_text, "Estimated: 12 min");

    assert!(engine.select_alternative(3).await.is_err());

    let planned = drain_events(&mut events)
        .into_iter()
        .filter(|event| matches!(event, TripEvent::RoutePlanned(_)))
        .count();
    assert_eq!(planned, 2);
}

#[tokio::test]
async fn select_alternative_without_route_fails() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());
    engine.start_trip_at(None, None, at(0)).await.unwrap();
    assert!(engine.select_alternative(0).await.is_err());
}

#[tokio::test]
async fn shutdown_stops_the_engine() {
    let (engine, mut events) = TripController::spawn(EngineSettings::default());
    engine.shutdown().await.unwrap();
    engine.shutdown().await.unwrap();

    assert!(engine.start_trip_at(None, None, at(0)).await.is_err());
    assert!(events.recv().await.is_none());
}

#[tokio::test]
async fn custom_milestones_from_settings() {
    let settings = EngineSettings {
        milestones_m: vec![250.0],
        ..EngineSettings::default()
    };
    let (engine, mut events) = TripController::spawn(settings);

    engine.start_trip_at(Some("subway".into()), None, at(0)).await.unwrap();
    engine.send_location(fix(10, 300.0)).await.unwrap();
    engine.send_location(fix(20, 900.0)).await.unwrap();
    engine.stop_trip_at(at(20)).await.unwrap();

    let milestones: Vec<String> = drain_events(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            TripEvent::MilestoneReached(m) => Some(m.message),
            _ => None,
        })
        .collect();
    assert_eq!(
        milestones,
        vec!["Congrats! You've traveled 250 m, carbon reduced 25 g 🌱".to_string()]
    );
}

#[tokio::test]
async fn declared_driving_label_reports_car() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());

    engine
        .start_trip_at(Some("DRIVING".into()), None, at(0))
        .await
        .unwrap();
    engine.send_location(fix(600, 5000.0)).await.unwrap();
    let data = engine.stop_trip_at(at(600)).await.unwrap();

    assert_eq!(data.user_selected_mode, "car");
    assert!(!data.is_green_trip);
    assert_eq!(data.carbon_saved_grams, 0);

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn snapshot_sees_queued_events() {
    let (engine, _events) = TripController::spawn(EngineSettings::default());

    engine.start_trip_at(None, None, at(0)).await.unwrap();
    engine.send_prediction(predict(10, TransportMode::Bus, 0.8)).await.unwrap();
    engine.send_location(fix(60, 1500.0)).await.unwrap();

    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.status, TripStatus::Tracking);
    assert_eq!(snapshot.distance_meters, 1500.0);
    assert_eq!(snapshot.elapsed_ms, 60_000);
    assert_eq!(snapshot.current_mode, Some(TransportMode::Bus));

    engine.shutdown().await.unwrap();
}
