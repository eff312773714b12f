use scout_similarity::config::AppConfig;

// Own test binary: installs the global subscriber.
#[test]
fn subscriber_is_live_before_values_are_parsed() {
    let config = AppConfig::bootstrap_with(|key| {
        assert!(
            tracing::enabled!(tracing::Level::WARN),
            "{key} read before warnings could be logged"
        );
        (key == "SCOUT_PORT").then(|| "eighty".to_string())
    });
    assert_eq!(config.port, 8000);
}
