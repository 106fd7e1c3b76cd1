//! 스캐너 설정
//!
//! [`ScannerConfig`]는 core의 [`ScanConfig`](yarrow_core::config::ScanConfig)에서
//! 파생되며, 문자열 설정을 스캐너가 바로 사용할 수 있는 타입으로 변환합니다.
//!
//! # 사용 예시
//!
//! ```
//! use yarrow_scanner::ScannerConfigBuilder;
//! use yarrow_core::types::ReportingMode;
//!
//! let config = ScannerConfigBuilder::new()
//!     .rules_dir("/opt/rules")
//!     .reporting_mode(ReportingMode::All)
//!     .build()
//!     .unwrap();
//! assert!(config.reporting_mode.reports_non_matching());
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use yarrow_core::config::ScanConfig;
use yarrow_core::types::ReportingMode;

use crate::error::ScannerError;

/// 스캐너 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// 규칙 파일 디렉토리
    pub rules_dir: PathBuf,
    /// 규칙 파일 이름 마커
    pub rule_marker: String,
    /// 엔진 보고 모드
    pub reporting_mode: ReportingMode,
    /// 리프 재분류 여부
    pub verify_leaves: bool,
    /// 하위 심볼릭 링크 추적 여부
    pub follow_symlinks: bool,
    /// 패턴당 최대 매치 수
    pub max_matches_per_pattern: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::from_core(&ScanConfig::default())
    }
}

impl ScannerConfig {
    /// core의 `ScanConfig`에서 스캐너 설정을 생성합니다.
    pub fn from_core(core: &ScanConfig) -> Self {
        let reporting_mode = if core.report_non_matching {
            ReportingMode::All
        } else {
            ReportingMode::MatchingOnly
        };

        Self {
            rules_dir: PathBuf::from(&core.rules_dir),
            rule_marker: core.rule_marker.clone(),
            reporting_mode,
            verify_leaves: core.verify_leaves,
            follow_symlinks: core.follow_symlinks,
            max_matches_per_pattern: core.max_matches_per_pattern,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `rules_dir`: 비어있으면 안 됨
    /// - `rule_marker`: 비어있으면 안 됨 (빈 마커는 모든 파일과 매칭)
    /// - `max_matches_per_pattern`: 1 이상
    pub fn validate(&self) -> Result<(), ScannerError> {
        if self.rules_dir.as_os_str().is_empty() {
            return Err(ScannerError::Config {
                field: "rules_dir".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.rule_marker.is_empty() {
            return Err(ScannerError::Config {
                field: "rule_marker".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.max_matches_per_pattern == 0 {
            return Err(ScannerError::Config {
                field: "max_matches_per_pattern".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(())
    }
}

/// [`ScannerConfig`] 빌더
///
/// 빌드 시 유효성 검증을 수행합니다.
pub struct ScannerConfigBuilder {
    config: ScannerConfig,
}

impl Default for ScannerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ScannerConfig::default(),
        }
    }

    pub fn rules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.rules_dir = dir.into();
        self
    }

    pub fn rule_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.rule_marker = marker.into();
        self
    }

    pub fn reporting_mode(mut self, mode: ReportingMode) -> Self {
        self.config.reporting_mode = mode;
        self
    }

    pub fn verify_leaves(mut self, verify: bool) -> Self {
        self.config.verify_leaves = verify;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    pub fn max_matches_per_pattern(mut self, max: usize) -> Self {
        self.config.max_matches_per_pattern = max;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `ScannerError::Config` 반환
    pub fn build(self) -> Result<ScannerConfig, ScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
