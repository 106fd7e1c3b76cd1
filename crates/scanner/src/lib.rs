#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 타입 (`ScannerError`)
//! - [`config`]: 스캐너 설정 (`ScannerConfig`, 빌더)
//! - [`engine`]: 매칭 엔진 경계 (`MatchingEngine` trait, `YaraEngine`)
//! - [`rules`]: 규칙 디렉토리 로딩과 컴파일 (`RuleSourceLoader`, `compile_rule_directory`)
//! - [`walker`]: 대상 분류와 재귀 순회 (`classify`, `Walker`)
//! - [`dispatcher`]: 파일 단위 스캔 (`Dispatcher`)
//! - [`report`]: 세션 보고 이벤트 (`SessionEvent`, `Reporter` trait)
//! - [`session`]: 오케스트레이터와 상태 머신 (`ScanSession`, `run_scan`)

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod report;
pub mod rules;
pub mod session;
pub mod walker;

// --- Public API Re-exports ---

// Session
pub use session::{ScanSession, ScanSummary, SessionState, run_scan};

// Configuration
pub use config::{ScannerConfig, ScannerConfigBuilder};

// Error
pub use error::ScannerError;

// Engine
pub use engine::yara::{YaraEngine, YaraRules};
pub use engine::{
    CallbackAction, CompiledRules, EngineMessage, MatchingEngine, RuleCompiler, SourceRejected,
};

// Pipeline stages
pub use dispatcher::Dispatcher;
pub use report::{Reporter, SessionEvent};
pub use rules::{RuleCompilation, RuleSourceLoader, RuleSourceOutcome, compile_rule_directory};
pub use walker::{WalkItem, WalkOptions, Walker, classify};
