use uncover_core::{ErrorInfo, MatchDiscipline, PocConfig, UncoverError};

#[test]
fn error_round_trip_json() {
    let err = UncoverError::CapacityExceeded(
        ErrorInfo::new("right-side-too-large", "rule right side has too many vertices")
            .with_context("vertices", 32)
            .with_hint("split the rule"),
    );
    let json = serde_json::to_string_pretty(&err).expect("serialize");
    assert!(json.contains("\"family\": \"CapacityExceeded\""));
    let decoded: UncoverError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn config_round_trip_json() {
    let config = PocConfig {
        max_right_vertices: 12,
        max_right_edges: 7,
        stop_fast: true,
    };
    let json = serde_json::to_string(&config).expect("serialize");
    let decoded: PocConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, config);
}

#[test]
fn config_defaults_stop_fast_when_absent() {
    let decoded: PocConfig =
        serde_json::from_str(r#"{"max_right_vertices":3,"max_right_edges":4}"#).expect("parse");
    assert!(!decoded.stop_fast);
}

#[test]
fn sanitised_config_is_clamped() {
    let config = PocConfig {
        max_right_vertices: 64,
        max_right_edges: 5,
        stop_fast: false,
    };
    let clamped = config.sanitised();
    assert_eq!(clamped.max_right_vertices, 31);
    assert_eq!(clamped.max_right_edges, 5);
    assert_eq!(MatchDiscipline::default(), MatchDiscipline::ConflictFree);
}
