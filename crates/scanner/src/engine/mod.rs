//! 매칭 엔진 경계 -- 규칙 컴파일과 파일 스캔을 외부 엔진에 위임
//!
//! 시그니처 매칭 알고리즘은 이 크레이트가 구현하지 않습니다.
//! [`MatchingEngine`] trait이 엔진에 요구하는 좁은 인터페이스를 정의하고,
//! [`yara::YaraEngine`]이 `yara-x`로 이를 구현합니다.
//!
//! # 생명주기
//!
//! ```text
//! initialize --> create_compiler --> add_source* --> finalize --> scan_file* --> drop
//!   (Engine)       (Compiler)                       (RuleSet)
//! ```
//!
//! - 엔진 값은 실행 전체에 걸쳐 하나만 존재하며 `Drop`에서 해제됩니다.
//! - 컴파일러는 `finalize(self)`로 소비되므로 이후 사용할 수 없습니다.
//! - 규칙 집합은 불변이며 `Send + Sync`입니다.

pub mod yara;

use std::path::Path;

use yarrow_core::error::EngineError;
use yarrow_core::types::ReportingMode;

use crate::error::ScannerError;

/// 엔진 콜백 메시지
///
/// 스캔 중 엔진이 콜백으로 전달하는 메시지입니다.
/// 디스패처가 [`MatchEvent`](yarrow_core::event::MatchEvent)로 변환합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage<'a> {
    RuleMatching(&'a str),
    RuleNotMatching(&'a str),
    ScanFinished,
    TooManyMatches(&'a str),
    ConsoleLog(&'a str),
}

/// 콜백 응답
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// 스캔 계속
    Continue,
    /// 남은 메시지 전달 중단
    Abort,
}

/// 규칙 소스 하나가 컴파일에 실패했을 때의 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRejected {
    /// 엔진이 보고한 에러 수
    pub error_count: usize,
    /// 엔진 에러 메시지
    pub messages: Vec<String>,
}

/// 컴파일된 불변 규칙 집합
pub trait CompiledRules: Send + Sync {
    /// 포함된 규칙 수를 반환합니다.
    fn rule_count(&self) -> usize;
}

/// 규칙 컴파일러 인스턴스
///
/// 소스를 누적한 뒤 `finalize`로 소비되어 규칙 집합을 생성합니다.
pub trait RuleCompiler {
    type Rules: CompiledRules;

    /// 규칙 소스를 추가합니다.
    ///
    /// 실패한 소스는 컴파일러 상태에 아무것도 남기지 않아야 합니다.
    ///
    /// # Arguments
    ///
    /// - `source`: 규칙 소스 원본 바이트
    /// - `origin`: 진단 메시지에 사용되는 레이블 (보통 파일 경로)
    fn add_source(&mut self, source: &[u8], origin: &str) -> Result<(), SourceRejected>;

    /// 누적된 규칙을 불변 규칙 집합으로 확정합니다.
    ///
    /// 소스가 하나도 없어도 빈 규칙 집합을 반환합니다.
    fn finalize(self) -> Self::Rules;
}

/// 매칭 엔진 trait
pub trait MatchingEngine {
    type Compiler: RuleCompiler<Rules = Self::Rules>;
    type Rules: CompiledRules;

    /// 엔진 이름 (보고용)
    fn name(&self) -> &'static str;

    /// 새 컴파일러 인스턴스를 생성합니다.
    fn create_compiler(&self) -> Result<Self::Compiler, EngineError>;

    /// 파일 하나를 스캔하고 메시지를 콜백으로 전달합니다.
    ///
    /// 콜백이 [`CallbackAction::Abort`]를 반환하면 남은 메시지는 전달되지 않습니다.
    ///
    /// # Errors
    ///
    /// 파일을 열 수 없거나 엔진 내부 에러가 발생하면
    /// `ScannerError::ScanInvocation`을 반환합니다.
    fn scan_file(
        &self,
        rules: &Self::Rules,
        path: &Path,
        mode: ReportingMode,
        on_message: &mut dyn FnMut(EngineMessage<'_>) -> CallbackAction,
    ) -> Result<(), ScannerError>;
}
