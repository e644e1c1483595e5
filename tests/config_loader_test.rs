//! Integration tests for hierarchical settings loading.

use std::io::Write;
use tempfile::NamedTempFile;

use balance_tuner::domain::models::TargetRange;
use balance_tuner::infrastructure::config::ConfigLoader;

fn settings_file(yaml: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(yaml.as_bytes()).expect("Failed to write settings");
    file
}

#[test]
fn test_load_defaults_without_files() {
    temp_env::with_vars_unset(["BALANCE_TUNER_ANALYST__MODEL", "BALANCE_TUNER_LOGGING__LEVEL"], || {
        let settings = ConfigLoader::load(None).expect("defaults should load");
        assert_eq!(settings.analyst.model, "claude-haiku-4-5-20251001");
        assert_eq!(settings.simulator.seed, 12345);
        assert_eq!(settings.targets.win_rate, TargetRange::new(0.95, 1.0));
        assert!(settings.tuning.stall_limit.is_none());
    });
}

#[test]
fn test_hierarchical_merging() {
    let file = settings_file(
        r"
simulator:
  godot_path: /opt/godot
  timeout_secs: 60
analyst:
  model: file-model
targets:
  gold_remaining: [5, 25]
",
    );

    temp_env::with_vars(
        [
            ("BALANCE_TUNER_ANALYST__MODEL", Some("env-model")),
            ("BALANCE_TUNER_TUNING__STALL_LIMIT", Some("4")),
        ],
        || {
            let settings = ConfigLoader::load(Some(file.path())).expect("settings should load");

            // Env wins over file
            assert_eq!(settings.analyst.model, "env-model");
            // File wins over defaults
            assert_eq!(settings.simulator.godot_path, "/opt/godot");
            assert_eq!(settings.simulator.timeout_secs, 60);
            assert_eq!(settings.targets.gold_remaining, TargetRange::new(5.0, 25.0));
            // Defaults fill the rest
            assert_eq!(settings.targets.shrine_hp, TargetRange::new(85.0, 100.0));
            assert_eq!(settings.analyst.max_tokens, 2048);
            assert_eq!(settings.tuning.stall_limit, Some(4));
        },
    );
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = ConfigLoader::load(Some(std::path::Path::new("/definitely/not/here.yaml")));
    assert!(result.is_err());
}

#[test]
fn test_invalid_file_values_fail_validation() {
    let file = settings_file(
        r"
targets:
  win_rate: [1.0, 0.5]
",
    );

    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("win_rate"), "{err}");
}

#[test]
fn test_invalid_env_log_level_is_rejected() {
    temp_env::with_var("BALANCE_TUNER_LOGGING__LEVEL", Some("chatty"), || {
        let err = ConfigLoader::load(None).unwrap_err();
        assert!(err.to_string().contains("chatty"), "{err}");
    });
}
