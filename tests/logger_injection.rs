use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use geoagents::application::SimulationService;
use geoagents::common::{ApplicationError, DomainError, DomainResult};
use geoagents::domains::logger::DomainLogger;
use geoagents::domains::model::Simulation;
use geoagents::domains::space::FeatureDataSource;
use geoagents::Config;
use serde_json::json;

struct CaptureLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CaptureLogger {
    fn new() -> Self {
        Self { messages: Arc::new(Mutex::new(Vec::new())) }
    }
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

/// Serves documents from memory.
struct InMemorySource {
    docs: HashMap<String, String>,
}

impl FeatureDataSource for InMemorySource {
    fn load_geojson(&self, name: &str) -> DomainResult<String> {
        self.docs
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::InfrastructureError(format!("{} not found", name)))
    }
}

fn grid_doc(n: usize) -> String {
    let features: Vec<_> = (0..n * n)
        .map(|i| {
            let (x, y) = ((i % n) as f64, (i / n) as f64);
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]]
                },
                "properties": { "cell": i }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

fn service(capture: &Arc<CaptureLogger>) -> SimulationService {
    let mut docs = HashMap::new();
    docs.insert("regions.geojson".to_string(), grid_doc(4));
    let source = Arc::new(InMemorySource { docs });
    SimulationService::new(source, capture.clone())
}

#[test]
fn service_reports_build_and_run_through_injected_logger() {
    let capture = Arc::new(CaptureLogger::new());
    let service = service(&capture);

    let mut config = Config::default();
    config.simulation.seed = Some(99);
    let mut model = service.build_schelling(&config).unwrap();
    assert_eq!(model.model().space.patch_count(), 16);

    let report = service.run(&mut model, 3);
    assert_eq!(report.seed, 99);
    assert!(report.steps <= 3);
    assert_eq!(report.converged, !model.running());

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("INFO:Built Schelling model from regions.geojson")));
    assert!(msgs.iter().any(|m| m.contains("converged") || m.starts_with("WARN:Run stopped")));
}

#[test]
fn missing_regions_are_logged_and_reported() {
    let capture = Arc::new(CaptureLogger::new());
    let service = service(&capture);

    let mut config = Config::default();
    config.schelling.regions = "absent.geojson".to_string();
    let err = service.build_schelling(&config).unwrap_err();

    assert!(matches!(err, ApplicationError::DataSource(_)));
    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("ERR:Failed to load absent.geojson")));
}

#[test]
fn bundled_loggers_accept_messages() {
    let noop = geoagents::adapters::outbound::init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
    geoagents::adapters::outbound::init_console_logger().info("console sink");

    let capture = Arc::new(CaptureLogger::new());
    let fan_out = geoagents::adapters::outbound::MultiLogger::new(vec![
        capture.clone() as Arc<dyn DomainLogger>,
        geoagents::adapters::outbound::init_tracing_logger(),
    ]);
    fan_out.warn("both");
    assert_eq!(*capture.messages.lock().unwrap(), vec!["WARN:both".to_string()]);
}
