#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, EngineError, YarrowError};

// 설정
pub use config::{GeneralConfig, ScanConfig, YarrowConfig};

// 이벤트
pub use event::MatchEvent;

// 도메인 타입
pub use types::{CompileDiagnostic, ReportingMode, ScanTarget, TargetKind};
