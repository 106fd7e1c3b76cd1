//! yarrow.toml 통합 설정 테스트
//!
//! - yarrow.toml.example 파싱 테스트
//! - 파일 로딩 / 기본값 폴백 테스트
//! - 환경변수 우선순위 테스트

use std::fs;

use yarrow_core::config::YarrowConfig;
use yarrow_core::error::{ConfigError, YarrowError};

// =============================================================================
// yarrow.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../yarrow.toml.example");
    let config = YarrowConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.scan.rules_dir, "/etc/yarrow/rules");
    assert_eq!(config.scan.rule_marker, ".yar");
    assert_eq!(config.scan.max_matches_per_pattern, 1_000_000);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../yarrow.toml.example");
    let config = YarrowConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
async fn load_reads_file_values() {
    let temp_dir = tempfile::tempdir().expect("should create temp dir");
    let config_path = temp_dir.path().join("yarrow.toml");
    fs::write(
        &config_path,
        r#"
[scan]
rules_dir = "/srv/signatures"
follow_symlinks = true
"#,
    )
    .expect("should write config");

    let config = YarrowConfig::from_file(&config_path)
        .await
        .expect("should load");
    assert_eq!(config.scan.rules_dir, "/srv/signatures");
    assert!(config.scan.follow_symlinks);
}

#[tokio::test]
async fn load_rejects_invalid_values() {
    let temp_dir = tempfile::tempdir().expect("should create temp dir");
    let config_path = temp_dir.path().join("yarrow.toml");
    fs::write(&config_path, "[general]\nlog_format = \"xml\"\n").expect("should write config");

    let result = YarrowConfig::from_file(&config_path).await;
    assert!(matches!(
        result,
        Err(YarrowError::Config(ConfigError::InvalidValue { .. }))
    ));
}

#[tokio::test]
#[serial_test::serial]
async fn load_or_default_falls_back_when_missing() {
    let config = YarrowConfig::load_or_default("/nonexistent/yarrow.toml")
        .await
        .expect("missing optional config should fall back to defaults");
    assert_eq!(config.scan.rule_marker, ".yar");
}

#[tokio::test]
#[serial_test::serial]
async fn load_or_default_still_reports_parse_errors() {
    let temp_dir = tempfile::tempdir().expect("should create temp dir");
    let config_path = temp_dir.path().join("yarrow.toml");
    fs::write(&config_path, "[scan\n").expect("should write config");

    let result = YarrowConfig::load_or_default(&config_path).await;
    assert!(matches!(
        result,
        Err(YarrowError::Config(ConfigError::ParseFailed { .. }))
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[scan]
rules_dir = "/from/file"
"#;

    let original = std::env::var("YARROW_SCAN_RULES_DIR").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("YARROW_SCAN_RULES_DIR", "/from/env");
    }

    let mut config = YarrowConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.scan.rules_dir.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("YARROW_SCAN_RULES_DIR", val),
            None => std::env::remove_var("YARROW_SCAN_RULES_DIR"),
        }
    }

    assert_eq!(result, "/from/env");
}

#[test]
#[serial_test::serial]
fn invalid_bool_env_override_is_ignored() {
    let original = std::env::var("YARROW_SCAN_VERIFY_LEAVES").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("YARROW_SCAN_VERIFY_LEAVES", "maybe");
    }

    let mut config = YarrowConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.scan.verify_leaves;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("YARROW_SCAN_VERIFY_LEAVES", val),
            None => std::env::remove_var("YARROW_SCAN_VERIFY_LEAVES"),
        }
    }

    assert!(result, "unparsable value should keep the default");
}

#[test]
#[serial_test::serial]
fn usize_env_override_applies() {
    let original = std::env::var("YARROW_SCAN_MAX_MATCHES_PER_PATTERN").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("YARROW_SCAN_MAX_MATCHES_PER_PATTERN", "64");
    }

    let mut config = YarrowConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.scan.max_matches_per_pattern;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("YARROW_SCAN_MAX_MATCHES_PER_PATTERN", val),
            None => std::env::remove_var("YARROW_SCAN_MAX_MATCHES_PER_PATTERN"),
        }
    }

    assert_eq!(result, 64);
}
