use seqforge_ir::config::{GenerationConfig, RepairMode, Strategy, Strength};
use seqforge_ir::parse::{parse_config, parse_model, ParseError};

#[test]
fn test_parse_vending_machine() {
    let json = include_str!("fixtures/vending_machine.json");
    let model = parse_model(json).unwrap();
    assert_eq!(model.name, "VendingMachine");
    assert_eq!(model.transitions.len(), 6);
    assert_eq!(model.state_names(), vec!["Idle", "Paid", "Brewing", "Serving"]);
}

#[test]
fn test_parse_guards_and_default_sent() {
    let json = include_str!("fixtures/vending_machine.json");
    let model = parse_model(json).unwrap();
    assert_eq!(model.transitions[2].guard.as_deref(), Some("Coffee"));
    assert!(model.transitions[0].guard.is_none());

    let minimal = r#"{ "name": "m", "transitions": [ { "from": "A", "to": "B", "received": "go" } ] }"#;
    let model = parse_model(minimal).unwrap();
    assert_eq!(model.transitions[0].sent, "no_response");
}

#[test]
fn test_parse_config_overrides_defaults() {
    let json = include_str!("fixtures/generation_config.json");
    let config = parse_config(json).unwrap();
    assert_eq!(config.strategy, Strategy::TransitionsCoverage);
    assert_eq!(config.strength, Strength::Threewise);
    assert!(!config.monitoring);
    assert_eq!(config.batch_size, 5);
    assert_eq!(config.start_state.as_deref(), Some("Idle"));
    assert!(config.split);

    // untouched fields keep their defaults
    let defaults = GenerationConfig::default();
    assert_eq!(config.max_states, defaults.max_states);
    assert_eq!(config.repair_mode, RepairMode::SkipError);
}

#[test]
fn test_parse_config_rejects_invalid() {
    let result = parse_config(r#"{ "batch_size": 0 }"#);
    assert!(matches!(result, Err(ParseError::Config(_))));
}

#[test]
fn test_parse_invalid_json() {
    assert!(matches!(parse_model("{ not json"), Err(ParseError::Json(_))));
}
