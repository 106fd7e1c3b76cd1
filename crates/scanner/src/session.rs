//! 스캔 세션 -- 규칙 컴파일부터 순회, 디스패치, 보고까지의 오케스트레이터
//!
//! # 상태 전이
//!
//! ```text
//! Init --> RulesLoading --> RulesCompiled --> Scanning --> Done
//!   |           |
//!   +-----------+--> Aborted (치명적 에러)
//! ```
//!
//! 규칙은 컴파일 후 고정되며, `Scanning`에서 이전 상태로 돌아가지 않습니다.
//! 세션이 끝나면 규칙 집합이 먼저 해제되고 엔진이 마지막으로 해제됩니다.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use yarrow_core::metrics as m;

use crate::config::ScannerConfig;
use crate::dispatcher::Dispatcher;
use crate::engine::yara::YaraEngine;
use crate::engine::{CompiledRules, MatchingEngine};
use crate::error::ScannerError;
use crate::report::{Reporter, SessionEvent};
use crate::rules::{RuleSourceOutcome, compile_rule_directory};
use crate::walker::{WalkItem, WalkOptions, Walker, classify};

/// 세션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    RulesLoading,
    RulesCompiled,
    Scanning,
    Done,
    Aborted,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::RulesLoading => "rules_loading",
            Self::RulesCompiled => "rules_compiled",
            Self::Scanning => "scanning",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 스캔 실행 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// 실행 식별자 (UUID v4)
    pub scan_id: String,
    /// 스캔 대상 루트 경로
    pub target: Option<PathBuf>,
    /// 컴파일된 규칙 수
    pub rule_count: usize,
    /// 컴파일에 성공한 규칙 파일 수
    pub rule_sources_compiled: usize,
    /// 실패한 규칙 파일 수
    pub rule_sources_rejected: usize,
    /// 엔진 호출이 성공한 파일 수
    pub files_scanned: usize,
    /// 규칙이 하나 이상 매칭된 파일 수
    pub files_matched: usize,
    /// 전체 규칙 매칭 수
    pub rule_matches: usize,
    /// 파일 단위 스캔 실패 수
    pub scan_errors: usize,
    /// 분류 또는 순회 실패 수
    pub walk_errors: usize,
    /// 건너뛴 항목 수
    pub skipped: usize,
}

impl ScanSummary {
    pub fn has_matches(&self) -> bool {
        self.rule_matches > 0
    }
}

/// 스캔 세션
///
/// 엔진 하나와 규칙 집합 하나를 소유합니다.
pub struct ScanSession<E: MatchingEngine> {
    // 필드 선언 순서대로 해제되므로 rules가 engine보다 먼저 와야 함
    rules: Option<E::Rules>,
    engine: E,
    config: ScannerConfig,
    state: SessionState,
    summary: ScanSummary,
}

impl<E: MatchingEngine> ScanSession<E> {
    /// 초기화된 엔진과 설정으로 세션을 생성합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패 시 `ScannerError::Config`.
    pub fn new(engine: E, config: ScannerConfig) -> Result<Self, ScannerError> {
        config.validate()?;

        let summary = ScanSummary {
            scan_id: uuid::Uuid::new_v4().to_string(),
            ..ScanSummary::default()
        };

        Ok(Self {
            rules: None,
            engine,
            config,
            state: SessionState::Init,
            summary,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), ScannerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ScannerError::InvalidState {
                expected: expected.name(),
                found: self.state.name(),
            })
        }
    }

    /// 규칙 디렉토리를 컴파일하여 세션의 규칙 집합으로 고정합니다.
    ///
    /// # Errors
    ///
    /// 규칙 디렉토리를 열 수 없거나 컴파일러 생성에 실패하면 세션은
    /// `Aborted` 상태가 되고 에러를 반환합니다.
    pub fn compile_rules(&mut self, reporter: &mut dyn Reporter) -> Result<(), ScannerError> {
        self.expect_state(SessionState::Init)?;

        reporter.report(&SessionEvent::EngineReady {
            engine: self.engine.name().to_owned(),
        });
        self.state = SessionState::RulesLoading;

        let compilation = match compile_rule_directory(
            &self.engine,
            &self.config.rules_dir,
            &self.config.rule_marker,
        ) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "rule compilation aborted");
                self.state = SessionState::Aborted;
                return Err(e);
            }
        };

        for outcome in &compilation.outcomes {
            let event = match outcome {
                RuleSourceOutcome::Compiled(path) => {
                    SessionEvent::RuleSourceCompiled { path: path.clone() }
                }
                RuleSourceOutcome::Rejected(diag) => SessionEvent::RuleSourceRejected(diag.clone()),
            };
            reporter.report(&event);
        }

        self.summary.rule_count = compilation.rules.rule_count();
        self.summary.rule_sources_compiled = compilation.compiled_sources();
        self.summary.rule_sources_rejected = compilation.rejected_sources();

        reporter.report(&SessionEvent::RulesCompiled {
            rule_count: self.summary.rule_count,
            sources: self.summary.rule_sources_compiled,
            rejected: self.summary.rule_sources_rejected,
        });

        self.rules = Some(compilation.rules);
        self.state = SessionState::RulesCompiled;
        Ok(())
    }

    /// 대상 경로를 스캔합니다.
    ///
    /// 분류 실패, 순회 실패, 파일 스캔 실패는 보고만 하고 계속 진행합니다.
    ///
    /// # Errors
    ///
    /// 규칙이 컴파일되기 전에 호출하면 `ScannerError::InvalidState`.
    pub fn scan(&mut self, target: &Path, reporter: &mut dyn Reporter) -> Result<(), ScannerError> {
        self.expect_state(SessionState::RulesCompiled)?;
        let rules = self.rules.as_ref().ok_or(ScannerError::InvalidState {
            expected: SessionState::RulesCompiled.name(),
            found: self.state.name(),
        })?;

        self.state = SessionState::Scanning;
        self.summary.target = Some(target.to_path_buf());
        info!(scan_id = %self.summary.scan_id, path = %target.display(), "scan started");

        let root = match classify(target) {
            Ok(root) => root,
            Err(e) => {
                warn!(path = %target.display(), error = %e, "failed to classify target");
                self.summary.walk_errors += 1;
                reporter.report(&SessionEvent::ClassificationFailed {
                    path: target.to_path_buf(),
                    reason: classification_reason(&e),
                });
                self.state = SessionState::Done;
                return Ok(());
            }
        };
        reporter.report(&SessionEvent::TargetClassified(root.clone()));

        let options = WalkOptions {
            verify_leaves: self.config.verify_leaves,
            follow_symlinks: self.config.follow_symlinks,
        };
        let dispatcher = Dispatcher::new(&self.engine, rules, self.config.reporting_mode);

        for item in Walker::new(root, options) {
            match item {
                WalkItem::Leaf(path) => match dispatcher.scan_one(&path) {
                    Ok(events) => {
                        let matches = events.iter().filter(|e| e.is_match()).count();
                        self.summary.files_scanned += 1;
                        self.summary.rule_matches += matches;
                        if matches > 0 {
                            self.summary.files_matched += 1;
                        }
                        metrics::counter!(m::FILES_SCANNED_TOTAL).increment(1);
                        metrics::counter!(m::RULE_MATCHES_TOTAL).increment(matches as u64);

                        for event in events {
                            reporter.report(&SessionEvent::File {
                                path: path.clone(),
                                event,
                            });
                        }
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "scan failed");
                        self.summary.scan_errors += 1;
                        metrics::counter!(m::SCAN_ERRORS_TOTAL).increment(1);
                        reporter.report(&SessionEvent::ScanFailed {
                            reason: scan_reason(&e),
                            path,
                        });
                    }
                },
                WalkItem::Skipped(target) => {
                    self.summary.skipped += 1;
                    reporter.report(&SessionEvent::Skipped(target));
                }
                WalkItem::Failed { path, reason } => {
                    warn!(path = %path.display(), reason = %reason, "walk failed");
                    self.summary.walk_errors += 1;
                    reporter.report(&SessionEvent::WalkFailed { path, reason });
                }
            }
        }

        self.state = SessionState::Done;
        info!(
            scan_id = %self.summary.scan_id,
            files = self.summary.files_scanned,
            matches = self.summary.rule_matches,
            errors = self.summary.scan_errors + self.summary.walk_errors,
            "scan finished"
        );
        Ok(())
    }

    /// 세션을 종료하고 요약을 반환합니다.
    ///
    /// 규칙 집합을 먼저 해제한 뒤 엔진을 해제합니다.
    pub fn finish(self) -> ScanSummary {
        let Self {
            rules,
            engine,
            summary,
            ..
        } = self;
        drop(rules);
        drop(engine);
        summary
    }
}

// OS 메시지만 남기고 경로는 이벤트 필드로 전달
fn classification_reason(err: &ScannerError) -> String {
    match err {
        ScannerError::Classification { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

fn scan_reason(err: &ScannerError) -> String {
    match err {
        ScannerError::ScanInvocation { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

/// yara-x 엔진으로 세션 전체를 실행합니다.
///
/// 엔진 초기화, 규칙 컴파일, 스캔, 해제를 순서대로 수행합니다.
/// 치명적 에러가 발생하면 이미 획득한 리소스를 해제한 뒤 에러를 반환합니다.
///
/// # Errors
///
/// [`ScannerError::is_fatal`]이 참인 에러만 반환합니다.
pub fn run_scan(
    config: ScannerConfig,
    target: &Path,
    reporter: &mut dyn Reporter,
) -> Result<ScanSummary, ScannerError> {
    let engine =
        YaraEngine::initialize()?.with_max_matches_per_pattern(config.max_matches_per_pattern);
    let mut session = ScanSession::new(engine, config)?;
    session.compile_rules(reporter)?;
    session.scan(target, reporter)?;
    Ok(session.finish())
}
