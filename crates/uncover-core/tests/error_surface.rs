use uncover_core::errors::{ErrorInfo, UncoverError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", 1)
        .with_context("reason", "example")
}

#[test]
fn graph_error_surface() {
    let err = UncoverError::Graph(sample_info("unknown-vertex", "vertex does not exist"));
    assert_eq!(err.info().code, "unknown-vertex");
    assert!(err.info().context.contains_key("id"));
    assert!(!err.is_invalid_state());
}

#[test]
fn capacity_error_surface() {
    let err = UncoverError::CapacityExceeded(sample_info("right-side-too-large", "too big"));
    assert_eq!(err.info().code, "right-side-too-large");
    assert!(err.to_string().starts_with("capacity exceeded"));
}

#[test]
fn moved_from_is_invalid_state() {
    let err = UncoverError::moved_from("set-partition");
    assert!(err.is_invalid_state());
    assert_eq!(err.info().code, "moved-from");
    assert_eq!(err.info().context["component"], "set-partition");
}

#[test]
fn context_is_appended_to_any_family() {
    let err = UncoverError::rule("not-a-morphism", "edge label mismatch").with_context("edge", 4);
    assert_eq!(err.info().context["edge"], "4");
    let rendered = err.to_string();
    assert!(rendered.contains("edge=4"), "{rendered}");
}

#[test]
fn hint_is_rendered() {
    let info = ErrorInfo::new("exhausted", "no current element").with_hint("check ended() first");
    let rendered = UncoverError::InvalidState(info).to_string();
    assert!(rendered.ends_with("hint: check ended() first"), "{rendered}");
}
