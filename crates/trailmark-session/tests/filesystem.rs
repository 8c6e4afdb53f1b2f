//! Tracker over a data directory and a state file

use trailmark_session::{LoaderState, Tracker, TrackerConfig};
use trailmark_test_utils::write_scenario;

fn config_for(dir: &std::path::Path) -> TrackerConfig {
    TrackerConfig::default()
        .with_data(dir.join("data").to_str().unwrap())
        .with_state_file(dir.join("state.json"))
}

#[tokio::test]
async fn progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    write_scenario(&dir.path().join("data"));

    let mut tracker = Tracker::from_config(config_for(dir.path())).unwrap();
    tracker.boot().await.unwrap();
    tracker.select_route("b").await.unwrap();
    tracker.set_complete("b3", true).unwrap();
    drop(tracker);

    let mut tracker = Tracker::from_config(config_for(dir.path())).unwrap();
    tracker.boot().await.unwrap();
    assert_eq!(tracker.state(), LoaderState::Ready);
    assert_eq!(tracker.route_id(), Some("b"));
    assert!(tracker.is_complete("b3"));
    assert!(!tracker.is_complete("b1"));
}

#[tokio::test]
async fn missing_data_directory_fails_boot() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::from_config(config_for(dir.path())).unwrap();
    assert!(tracker.boot().await.is_err());
    assert_eq!(tracker.state(), LoaderState::Failed);
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trailmark.toml");
    std::fs::write(&path, "data = \"routes\"\nanchor_phase = \"intro\"\n").unwrap();
    let config = TrackerConfig::load(&path).unwrap();
    assert_eq!(config.data, "routes");
    assert_eq!(config.anchor_phase, "intro");
    assert_eq!(config.manifest, "manifest.json");
}
