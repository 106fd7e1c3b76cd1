//! `yara-x` 기반 매칭 엔진 구현
//!
//! `yara-x`는 프로세스 전역 초기화가 필요 없지만, 엔진 값을 실행 범위의
//! 리소스로 다루어 초기화/해제 시점을 한 곳에서 관리합니다.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, warn};
use yara_x::SourceCode;

use yarrow_core::error::EngineError;
use yarrow_core::types::ReportingMode;

use super::{
    CallbackAction, CompiledRules, EngineMessage, MatchingEngine, RuleCompiler, SourceRejected,
};
use crate::error::ScannerError;

/// 패턴당 최대 매치 수 기본값
pub const DEFAULT_MAX_MATCHES_PER_PATTERN: usize = 1_000_000;

/// yara-x 엔진 핸들
///
/// 실행당 하나만 생성하여 스캔 세션이 소유합니다.
pub struct YaraEngine {
    max_matches_per_pattern: usize,
}

impl YaraEngine {
    /// 엔진을 초기화합니다.
    pub fn initialize() -> Result<Self, EngineError> {
        debug!("yara-x engine initialized");
        Ok(Self {
            max_matches_per_pattern: DEFAULT_MAX_MATCHES_PER_PATTERN,
        })
    }

    /// 패턴당 최대 매치 수를 설정합니다.
    ///
    /// 이 상한을 넘는 패턴은 `TooManyMatches` 메시지로 보고됩니다.
    pub fn with_max_matches_per_pattern(mut self, max: usize) -> Self {
        self.max_matches_per_pattern = max.max(1);
        self
    }
}

impl Drop for YaraEngine {
    fn drop(&mut self) {
        debug!("yara-x engine released");
    }
}

/// yara-x 컴파일러 래퍼
///
/// yara-x는 에러가 난 규칙 하나만 되돌리고 같은 소스의 나머지 규칙은
/// 컴파일러에 남깁니다. 소스 단위 격리를 위해 각 소스를 먼저 임시 컴파일러로
/// 검사하고, 공유 컴파일러에서 실패하면 수락된 소스만으로 다시 만듭니다.
pub struct YaraCompiler {
    inner: yara_x::Compiler<'static>,
    accepted: Vec<(Vec<u8>, String)>,
}

impl YaraCompiler {
    fn new() -> Self {
        Self {
            inner: yara_x::Compiler::new(),
            accepted: Vec::new(),
        }
    }

    fn rebuild(&mut self) {
        let mut inner = yara_x::Compiler::new();
        for (source, origin) in &self.accepted {
            if let Err(rejected) = try_add(&mut inner, source, origin) {
                warn!(origin = %origin, errors = rejected.error_count, "accepted source failed to recompile");
            }
        }
        self.inner = inner;
    }
}

/// 소스 하나를 추가하고, 이번 호출에서 새로 쌓인 에러를 모두 수집합니다.
fn try_add(
    compiler: &mut yara_x::Compiler<'static>,
    source: &[u8],
    origin: &str,
) -> Result<(), SourceRejected> {
    let before = compiler.errors().len();
    let first = compiler
        .add_source(SourceCode::from(source).with_origin(origin))
        .err()
        .map(|e| e.to_string());

    let mut messages: Vec<String> = compiler.errors()[before..]
        .iter()
        .map(ToString::to_string)
        .collect();

    match first {
        None if messages.is_empty() => Ok(()),
        first => {
            if messages.is_empty() {
                messages.extend(first);
            }
            Err(SourceRejected {
                error_count: messages.len(),
                messages,
            })
        }
    }
}

impl RuleCompiler for YaraCompiler {
    type Rules = YaraRules;

    fn add_source(&mut self, source: &[u8], origin: &str) -> Result<(), SourceRejected> {
        try_add(&mut yara_x::Compiler::new(), source, origin)?;

        // 단독으로는 유효해도 이미 수락된 규칙과 식별자가 겹칠 수 있음
        if let Err(rejected) = try_add(&mut self.inner, source, origin) {
            self.rebuild();
            return Err(rejected);
        }

        self.accepted.push((source.to_vec(), origin.to_owned()));
        Ok(())
    }

    fn finalize(self) -> YaraRules {
        debug!(sources = self.accepted.len(), "finalizing yara-x compiler");
        YaraRules {
            inner: self.inner.build(),
        }
    }
}

/// 컴파일된 yara-x 규칙 집합
pub struct YaraRules {
    inner: yara_x::Rules,
}

impl CompiledRules for YaraRules {
    fn rule_count(&self) -> usize {
        self.inner.iter().count()
    }
}

impl MatchingEngine for YaraEngine {
    type Compiler = YaraCompiler;
    type Rules = YaraRules;

    fn name(&self) -> &'static str {
        "yara-x"
    }

    fn create_compiler(&self) -> Result<YaraCompiler, EngineError> {
        Ok(YaraCompiler::new())
    }

    fn scan_file(
        &self,
        rules: &YaraRules,
        path: &Path,
        mode: ReportingMode,
        on_message: &mut dyn FnMut(EngineMessage<'_>) -> CallbackAction,
    ) -> Result<(), ScannerError> {
        let console: Rc<RefCell<Vec<String>>> = Rc::default();

        // 상한을 넘은 패턴만 보고하므로 엔진에는 상한 + 1을 설정
        let mut scanner = yara_x::Scanner::new(&rules.inner);
        scanner.max_matches_per_pattern(self.max_matches_per_pattern.saturating_add(1));
        {
            let sink = Rc::clone(&console);
            scanner.console_log(move |message| sink.borrow_mut().push(message));
        }

        let results = scanner
            .scan_file(path)
            .map_err(|e| ScannerError::ScanInvocation {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        // console 출력은 규칙 평가 중에 발생하므로 매칭 결과보다 먼저 전달
        let console_lines = console.take();
        for line in &console_lines {
            if on_message(EngineMessage::ConsoleLog(line)) == CallbackAction::Abort {
                return Ok(());
            }
        }

        for rule in results.matching_rules() {
            if on_message(EngineMessage::RuleMatching(rule.identifier())) == CallbackAction::Abort
            {
                return Ok(());
            }

            for pattern in rule.patterns() {
                if pattern.matches().count() > self.max_matches_per_pattern {
                    let label = format!("{}:{}", rule.identifier(), pattern.identifier());
                    if on_message(EngineMessage::TooManyMatches(&label)) == CallbackAction::Abort {
                        return Ok(());
                    }
                }
            }
        }

        if mode.reports_non_matching() {
            for rule in results.non_matching_rules() {
                if on_message(EngineMessage::RuleNotMatching(rule.identifier()))
                    == CallbackAction::Abort
                {
                    return Ok(());
                }
            }
        }

        on_message(EngineMessage::ScanFinished);
        Ok(())
    }
}
