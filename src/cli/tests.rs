//! CLI tests module
//!
//! Argument parsing and request assembly.

use super::*;
use super::commands::{TransformArgs, build_request, emit_result_json};
use clap::Parser;
use fiterior_config::Config;

#[test]
fn test_cli_definition_is_consistent() {
    build_cli().debug_assert();
}

#[test]
fn test_parse_transform_with_globals() {
    let cli = Cli::try_parse_from([
        "fiterior",
        "--endpoint",
        "http://127.0.0.1:8080/transform",
        "transform",
        "--image",
        "file://a.jpg",
        "--theme",
        "modern",
        "--model",
        "gpt-4o",
        "--retries",
        "2",
        "--timeout-ms",
        "5000",
    ])
    .unwrap();

    assert_eq!(cli.endpoint.as_deref(), Some("http://127.0.0.1:8080/transform"));
    assert_eq!(cli.timeout_ms, Some(5000));
    match cli.command {
        Commands::Transform {
            image,
            theme,
            model,
            retries,
            json,
        } => {
            assert_eq!(image, "file://a.jpg");
            assert_eq!(theme.as_deref(), Some("modern"));
            assert_eq!(model.as_deref(), Some("gpt-4o"));
            assert_eq!(retries, 2);
            assert!(!json);
        }
        other => panic!("expected transform, got {other:?}"),
    }
}

#[test]
fn test_transform_requires_image() {
    assert!(Cli::try_parse_from(["fiterior", "transform", "--theme", "modern"]).is_err());
}

#[test]
fn test_catalog_commands_parse() {
    for (args, name) in [
        (vec!["fiterior", "themes"], "themes"),
        (vec!["fiterior", "models", "--json"], "models"),
        (vec!["fiterior", "steps"], "steps"),
        (vec!["fiterior", "-v", "config"], "config"),
    ] {
        let cli = Cli::try_parse_from(&args).unwrap();
        assert_eq!(cli.command.name(), name);
    }
}

#[test]
fn test_request_uses_config_defaults() {
    let config = Config::builder()
        .theme("natural")
        .model("midjourney")
        .build()
        .unwrap();
    let args = TransformArgs {
        image: "file://a.jpg".to_string(),
        theme: None,
        model: Some("claude".to_string()),
        retries: 0,
        json: false,
    };

    let request = build_request(&args, &config);
    assert_eq!(request.image_reference.as_deref(), Some("file://a.jpg"));
    assert_eq!(request.theme_id.as_deref(), Some("natural"));
    assert_eq!(request.model_id.as_deref(), Some("claude"));
}

#[test]
fn test_request_without_defaults_is_incomplete() {
    let args = TransformArgs {
        image: "file://a.jpg".to_string(),
        theme: None,
        model: None,
        retries: 0,
        json: true,
    };
    let request = build_request(&args, &Config::default());
    assert!(!request.is_complete());
}

#[test]
fn test_result_json_is_parseable() {
    let summary = crate::result::ResultSummary {
        job_id: "j1".to_string(),
        result_url: "https://x/y.png".to_string(),
        original_image: "file://a.jpg".to_string(),
        theme: fiterior_catalog::ThemeId::Nordic.theme(),
        model: fiterior_catalog::ModelId::Claude.model(),
        is_fallback: false,
        fallback_reason: None,
        attempts: 1,
    };
    let json: serde_json::Value = serde_json::from_str(&emit_result_json(&summary).unwrap()).unwrap();
    assert_eq!(json["job_id"], "j1");
    assert_eq!(json["theme"]["name"], "Nordic");
    assert_eq!(json["attempts"], 1);
}
