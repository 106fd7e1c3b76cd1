//! 스캐너 에러 타입
//!
//! [`ScannerError`]는 스캐너 크레이트 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//!
//! # 에러 카테고리
//!
//! - **치명적**: `Engine`, `RulesDirectory`, `Config`, `InvalidState`
//! - **경로 단위 (비치명적)**: `Classification`
//! - **파일 단위 (비치명적)**: `ScanInvocation`
//!
//! 비치명적 에러는 세션이 보고 이벤트로 변환하고 실행을 계속합니다.

use yarrow_core::error::EngineError;

/// 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// 엔진 초기화 또는 컴파일러 생성 실패
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// 규칙 디렉토리를 열 수 없음
    #[error("failed to open rules directory {path}: {source}")]
    RulesDirectory {
        /// 규칙 디렉토리 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 스캔 대상 상태 조회 실패
    #[error("failed to get file status: {path}: {source}")]
    Classification {
        /// 대상 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 파일 하나에 대한 엔진 스캔 실패
    #[error("failed to scan {path}: {reason}")]
    ScanInvocation {
        /// 파일 경로
        path: String,
        /// 엔진이 보고한 사유
        reason: String,
    },

    /// 세션 상태 전이 위반
    #[error("invalid session state: expected {expected}, found {found}")]
    InvalidState {
        /// 기대한 상태
        expected: &'static str,
        /// 실제 상태
        found: &'static str,
    },
}

impl ScannerError {
    /// 실행 전체를 중단시키는 에러인지 반환합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Engine(_)
                | Self::RulesDirectory { .. }
                | Self::Config { .. }
                | Self::InvalidState { .. }
        )
    }
}
