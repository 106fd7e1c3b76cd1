//! 에러 타입 — 도메인별 에러 정의
//!
//! 이 모듈의 에러는 모두 실행 전체를 중단시키는 치명적 에러입니다.
//! 파일 단위의 비치명적 실패(규칙 파일 컴파일 실패, 스캔 실패 등)는
//! 에러가 아니라 보고 이벤트로 전달됩니다.

/// yarrow 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum YarrowError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 매칭 엔진 초기화 에러
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 매칭 엔진 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 엔진 초기화 실패
    #[error("failed to initialize matching engine: {0}")]
    InitFailed(String),

    /// 컴파일러 인스턴스 생성 실패
    #[error("failed to create rule compiler: {0}")]
    CompilerCreation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: YarrowError = ConfigError::InvalidValue {
            field: "scan.rules_dir".to_owned(),
            reason: "must not be empty".to_owned(),
        }
        .into();
        assert!(matches!(err, YarrowError::Config(_)));
        assert!(err.to_string().contains("scan.rules_dir"));
    }

    #[test]
    fn engine_error_display() {
        let err = EngineError::CompilerCreation("out of memory".to_owned());
        assert!(err.to_string().contains("rule compiler"));
        assert!(err.to_string().contains("out of memory"));
    }
}
