//! 메트릭 이름 상수
//!
//! 각 크레이트는 이 상수로 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더는 설치하지 않으므로, 임베딩 애플리케이션이 레코더를 설치하지
//! 않는 한 기록은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `yarrow_`
//! - 접미어: `_total` (counter)
//!
//! ```ignore
//! metrics::counter!(yarrow_core::metrics::FILES_SCANNED_TOTAL).increment(1);
//! ```

/// 스캔한 파일 수 (counter)
pub const FILES_SCANNED_TOTAL: &str = "yarrow_files_scanned_total";

/// 규칙 매칭 수 (counter)
pub const RULE_MATCHES_TOTAL: &str = "yarrow_rule_matches_total";

/// 파일 단위 스캔 실패 수 (counter)
pub const SCAN_ERRORS_TOTAL: &str = "yarrow_scan_errors_total";

/// 컴파일에 실패한 규칙 파일 수 (counter)
pub const RULE_COMPILE_FAILURES_TOTAL: &str = "yarrow_rule_compile_failures_total";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_follow_convention() {
        for name in [
            FILES_SCANNED_TOTAL,
            RULE_MATCHES_TOTAL,
            SCAN_ERRORS_TOTAL,
            RULE_COMPILE_FAILURES_TOTAL,
        ] {
            assert!(name.starts_with("yarrow_"), "{name}");
            assert!(name.ends_with("_total"), "{name}");
        }
    }
}
