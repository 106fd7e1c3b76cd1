//! 설정 관리 — yarrow.toml 파싱 및 런타임 설정
//!
//! [`YarrowConfig`]는 모든 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`YARROW_SCAN_RULES_DIR=/opt/rules` 형식)
//! 3. 설정 파일 (`yarrow.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), yarrow_core::error::YarrowError> {
//! use yarrow_core::config::YarrowConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = YarrowConfig::load("yarrow.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = YarrowConfig::parse("[scan]\nrules_dir = \"/opt/rules\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, YarrowError};

/// yarrow 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YarrowConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
}

impl YarrowConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, YarrowError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값을 사용하는 로더
    ///
    /// 기본 경로(`yarrow.toml`)처럼 파일이 선택 사항일 때 사용합니다.
    /// 파일이 존재하지만 파싱에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, YarrowError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(YarrowError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, YarrowError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                YarrowError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                YarrowError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, YarrowError> {
        toml::from_str(toml_str).map_err(|e| {
            YarrowError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `YARROW_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "YARROW_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "YARROW_GENERAL_LOG_FORMAT");

        // Scan
        override_string(&mut self.scan.rules_dir, "YARROW_SCAN_RULES_DIR");
        override_string(&mut self.scan.rule_marker, "YARROW_SCAN_RULE_MARKER");
        override_bool(
            &mut self.scan.report_non_matching,
            "YARROW_SCAN_REPORT_NON_MATCHING",
        );
        override_bool(&mut self.scan.verify_leaves, "YARROW_SCAN_VERIFY_LEAVES");
        override_bool(&mut self.scan.follow_symlinks, "YARROW_SCAN_FOLLOW_SYMLINKS");
        override_usize(
            &mut self.scan.max_matches_per_pattern,
            "YARROW_SCAN_MAX_MATCHES_PER_PATTERN",
        );
        override_bool(&mut self.scan.fail_on_match, "YARROW_SCAN_FAIL_ON_MATCH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), YarrowError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.scan.rules_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.rules_dir".to_owned(),
                reason: "rules directory must not be empty".to_owned(),
            }
            .into());
        }

        if self.scan.rule_marker.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.rule_marker".to_owned(),
                reason: "rule file marker must not be empty".to_owned(),
            }
            .into());
        }

        if self.scan.max_matches_per_pattern == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_matches_per_pattern".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 규칙 파일 디렉토리 (비재귀)
    pub rules_dir: String,
    /// 파일 이름에 이 문자열이 포함되면 규칙 파일로 간주
    pub rule_marker: String,
    /// 매칭되지 않은 규칙도 보고
    pub report_non_matching: bool,
    /// 리프 항목을 stat으로 재분류하여 일반 파일만 스캔
    pub verify_leaves: bool,
    /// 하위 심볼릭 링크 추적 (루프 탐지 포함)
    pub follow_symlinks: bool,
    /// 패턴당 최대 매치 수 (도달 시 TooManyMatches 보고)
    pub max_matches_per_pattern: usize,
    /// 매칭이 하나라도 있으면 종료 코드 4로 종료
    pub fail_on_match: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            rules_dir: "/etc/yarrow/rules".to_owned(),
            rule_marker: ".yar".to_owned(),
            report_non_matching: false,
            verify_leaves: true,
            follow_symlinks: false,
            max_matches_per_pattern: 1_000_000,
            fail_on_match: false,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
