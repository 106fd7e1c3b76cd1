//! 세션 보고 이벤트
//!
//! 스캔 세션은 진행 상황과 비치명적 에러를 [`SessionEvent`]로 만들어
//! [`Reporter`]에 동기적으로 전달합니다. 출력 형식은 보고자 구현이 결정합니다.

use std::path::PathBuf;

use serde::Serialize;

use yarrow_core::event::MatchEvent;
use yarrow_core::types::{CompileDiagnostic, ScanTarget};

/// 세션이 보고하는 이벤트 (보고 한 줄에 대응)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// 엔진 초기화 완료
    EngineReady { engine: String },
    /// 규칙 파일 컴파일 성공
    RuleSourceCompiled { path: PathBuf },
    /// 규칙 파일 읽기 또는 컴파일 실패
    RuleSourceRejected(CompileDiagnostic),
    /// 규칙 집합 확정
    RulesCompiled {
        rule_count: usize,
        sources: usize,
        rejected: usize,
    },
    /// 루트 경로 분류 완료
    TargetClassified(ScanTarget),
    /// 루트 경로 상태 조회 실패
    ClassificationFailed { path: PathBuf, reason: String },
    /// 하위 경로 순회 실패
    WalkFailed { path: PathBuf, reason: String },
    /// 일반 파일이 아니어서 건너뛴 항목
    Skipped(ScanTarget),
    /// 파일 하나에 대한 매칭 이벤트
    File { path: PathBuf, event: MatchEvent },
    /// 파일 하나에 대한 스캔 실패
    ScanFailed { path: PathBuf, reason: String },
}

/// 세션 이벤트 소비자
pub trait Reporter {
    fn report(&mut self, event: &SessionEvent);
}

/// 수집용 보고자
impl Reporter for Vec<SessionEvent> {
    fn report(&mut self, event: &SessionEvent) {
        self.push(event.clone());
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: &SessionEvent) {
        (**self).report(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yarrow_core::types::TargetKind;

    #[test]
    fn serializes_with_type_tag() {
        let event = SessionEvent::File {
            path: PathBuf::from("/tmp/a.bin"),
            event: MatchEvent::RuleMatched {
                rule: "eicar".to_owned(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["path"], "/tmp/a.bin");
        assert_eq!(json["event"]["event"], "rule_matched");
        assert_eq!(json["event"]["rule"], "eicar");
    }

    #[test]
    fn newtype_variants_flatten_fields() {
        let event = SessionEvent::TargetClassified(ScanTarget::new("/srv", TargetKind::Directory));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "target_classified");
        assert_eq!(json["kind"], "directory");

        let diag = CompileDiagnostic::unreadable("/rules/x.yar", "denied");
        let json = serde_json::to_value(SessionEvent::RuleSourceRejected(diag)).unwrap();
        assert_eq!(json["type"], "rule_source_rejected");
        assert_eq!(json["error_count"], -1);
    }

    #[test]
    fn vec_collects_events() {
        let mut sink: Vec<SessionEvent> = Vec::new();
        sink.report(&SessionEvent::EngineReady {
            engine: "yara-x".to_owned(),
        });
        assert_eq!(sink.len(), 1);
    }
}
