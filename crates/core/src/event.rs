//! 매칭 이벤트 -- 파일 하나를 스캔하는 동안 엔진이 보고하는 메시지
//!
//! [`MatchEvent`]는 엔진 콜백 메시지를 엔진 독립적인 형태로 표현합니다.
//! 스캔 호출 하나에서 생성되어 즉시 소비되며 저장되지 않습니다.

use serde::{Deserialize, Serialize};

/// 파일 단위 매칭 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// 규칙이 매칭됨
    RuleMatched { rule: String },
    /// 규칙이 매칭되지 않음 (상세 모드에서만)
    RuleNotMatched { rule: String },
    /// 파일 스캔 완료
    ScanFinished,
    /// 패턴 매치 수가 엔진 상한에 도달함 (스캔은 계속됨)
    TooManyMatches { pattern: String },
    /// 규칙의 console 모듈 출력
    ConsoleLog { message: String },
}

impl MatchEvent {
    /// 규칙 매칭 이벤트인지 반환합니다.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::RuleMatched { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rule_matched_is_a_match() {
        assert!(
            MatchEvent::RuleMatched {
                rule: "eicar".to_owned()
            }
            .is_match()
        );
        assert!(
            !MatchEvent::RuleNotMatched {
                rule: "eicar".to_owned()
            }
            .is_match()
        );
        assert!(!MatchEvent::ScanFinished.is_match());
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(MatchEvent::RuleMatched {
            rule: "eicar".to_owned(),
        })
        .unwrap();
        assert_eq!(json["event"], "rule_matched");
        assert_eq!(json["rule"], "eicar");

        let json = serde_json::to_value(MatchEvent::ScanFinished).unwrap();
        assert_eq!(json["event"], "scan_finished");
    }
}
