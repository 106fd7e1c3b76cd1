//! 스캔 디스패처 -- 파일 하나를 엔진으로 스캔하고 매칭 이벤트로 변환
//!
//! 엔진 콜백 메시지는 [`MatchEvent`]로 1:1 변환됩니다.
//! 필터링, 중복 제거, 집계는 하지 않습니다.

use std::path::Path;

use tracing::trace;

use yarrow_core::event::MatchEvent;
use yarrow_core::types::ReportingMode;

use crate::engine::{CallbackAction, EngineMessage, MatchingEngine};
use crate::error::ScannerError;

impl From<EngineMessage<'_>> for MatchEvent {
    fn from(message: EngineMessage<'_>) -> Self {
        match message {
            EngineMessage::RuleMatching(rule) => Self::RuleMatched {
                rule: rule.to_owned(),
            },
            EngineMessage::RuleNotMatching(rule) => Self::RuleNotMatched {
                rule: rule.to_owned(),
            },
            EngineMessage::ScanFinished => Self::ScanFinished,
            EngineMessage::TooManyMatches(pattern) => Self::TooManyMatches {
                pattern: pattern.to_owned(),
            },
            EngineMessage::ConsoleLog(message) => Self::ConsoleLog {
                message: message.to_owned(),
            },
        }
    }
}

/// 컴파일된 규칙 집합으로 파일을 스캔하는 디스패처
pub struct Dispatcher<'a, E: MatchingEngine> {
    engine: &'a E,
    rules: &'a E::Rules,
    mode: ReportingMode,
}

impl<'a, E: MatchingEngine> Dispatcher<'a, E> {
    pub fn new(engine: &'a E, rules: &'a E::Rules, mode: ReportingMode) -> Self {
        Self {
            engine,
            rules,
            mode,
        }
    }

    /// 파일 하나를 스캔하고 엔진이 보고한 이벤트를 순서대로 반환합니다.
    ///
    /// 콜백은 항상 `Continue`로 응답하므로 `TooManyMatches` 이후에도 스캔은 계속됩니다.
    ///
    /// # Errors
    ///
    /// 엔진 호출이 실패하면 `ScannerError::ScanInvocation` (파일 단위, 비치명적).
    pub fn scan_one(&self, path: &Path) -> Result<Vec<MatchEvent>, ScannerError> {
        let mut events = Vec::new();
        self.engine
            .scan_file(self.rules, path, self.mode, &mut |message| {
                trace!(path = %path.display(), ?message, "engine message");
                events.push(MatchEvent::from(message));
                CallbackAction::Continue
            })?;
        Ok(events)
    }
}
