//! 규칙 로더 / 컴파일러 -- 규칙 디렉토리를 하나의 불변 규칙 집합으로 컴파일
//!
//! 규칙 디렉토리 바로 아래의 파일 중 이름에 마커(기본 `.yar`)가 포함된 일반
//! 파일만 처리합니다. 하위 디렉토리는 탐색하지 않습니다.
//! 개별 파일 실패(읽기 실패, 컴파일 에러)는 진단으로 기록하고 건너뜁니다.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use yarrow_core::metrics as m;
use yarrow_core::types::CompileDiagnostic;

use crate::engine::{CompiledRules, MatchingEngine, RuleCompiler};
use crate::error::ScannerError;

/// 규칙 파일 하나의 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSourceOutcome {
    /// 컴파일 성공
    Compiled(PathBuf),
    /// 읽기 또는 컴파일 실패
    Rejected(CompileDiagnostic),
}

/// 규칙 디렉토리 컴파일 결과
pub struct RuleCompilation<R> {
    /// 확정된 규칙 집합 (비어 있을 수 있음)
    pub rules: R,
    /// 파일별 처리 결과 (처리 순서)
    pub outcomes: Vec<RuleSourceOutcome>,
}

impl<R: CompiledRules> RuleCompilation<R> {
    /// 실패한 규칙 파일의 진단 목록
    pub fn diagnostics(&self) -> impl Iterator<Item = &CompileDiagnostic> {
        self.outcomes.iter().filter_map(|o| match o {
            RuleSourceOutcome::Rejected(diag) => Some(diag),
            RuleSourceOutcome::Compiled(_) => None,
        })
    }

    /// 컴파일에 성공한 규칙 파일 수
    pub fn compiled_sources(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RuleSourceOutcome::Compiled(_)))
            .count()
    }

    /// 실패한 규칙 파일 수
    pub fn rejected_sources(&self) -> usize {
        self.outcomes.len() - self.compiled_sources()
    }
}

/// 규칙 디렉토리 로더
pub struct RuleSourceLoader {
    marker: String,
}

impl RuleSourceLoader {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// 파일 이름이 규칙 파일 마커를 포함하는지 확인합니다.
    pub fn is_rule_source(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().contains(self.marker.as_str()))
            .unwrap_or(false)
    }

    /// 디렉토리에서 규칙 파일 경로를 찾습니다 (비재귀, 이름순 정렬).
    ///
    /// # Errors
    ///
    /// 디렉토리 자체를 열 수 없으면 `ScannerError::RulesDirectory`를 반환합니다.
    /// 개별 항목 읽기 실패는 경고 로그를 남기고 건너뜁니다.
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>, ScannerError> {
        let entries = std::fs::read_dir(dir).map_err(|e| ScannerError::RulesDirectory {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut sources = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "failed to read rules directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if !self.is_rule_source(&path) {
                continue;
            }

            // 링크를 따라가지 않는 항목 타입으로 일반 파일만 선택
            match entry.file_type() {
                Ok(ft) if ft.is_file() => sources.push(path),
                Ok(_) => debug!(path = %path.display(), "not a regular file, skipping"),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read entry type, skipping")
                }
            }
        }

        // 같은 디렉토리를 다시 컴파일해도 결과가 같도록 정렬
        sources.sort();
        Ok(sources)
    }
}

/// 규칙 디렉토리를 컴파일합니다.
///
/// # Errors
///
/// - 컴파일러 생성 실패 (`ScannerError::Engine`)
/// - 규칙 디렉토리를 열 수 없음 (`ScannerError::RulesDirectory`)
///
/// 개별 파일 실패는 에러가 아니라 [`RuleSourceOutcome::Rejected`]로 기록됩니다.
pub fn compile_rule_directory<E: MatchingEngine>(
    engine: &E,
    dir: &Path,
    marker: &str,
) -> Result<RuleCompilation<E::Rules>, ScannerError> {
    let mut compiler = engine.create_compiler()?;
    let sources = RuleSourceLoader::new(marker).discover(dir)?;

    let mut outcomes = Vec::with_capacity(sources.len());
    for path in sources {
        let outcome = compile_source(&mut compiler, path);
        if let RuleSourceOutcome::Rejected(diag) = &outcome {
            metrics::counter!(m::RULE_COMPILE_FAILURES_TOTAL).increment(1);
            warn!(
                path = %diag.source_path.display(),
                errors = diag.error_count,
                "rule source rejected"
            );
        }
        outcomes.push(outcome);
    }

    let rules = compiler.finalize();

    info!(
        dir = %dir.display(),
        rules = rules.rule_count(),
        sources = outcomes.len(),
        "compiled rule directory"
    );

    Ok(RuleCompilation { rules, outcomes })
}

fn compile_source<C: RuleCompiler>(compiler: &mut C, path: PathBuf) -> RuleSourceOutcome {
    // 파일 핸들은 read 안에서 열고 닫힘
    let content = match std::fs::read(&path) {
        Ok(c) => c,
        Err(e) => {
            return RuleSourceOutcome::Rejected(CompileDiagnostic::unreadable(path, e.to_string()));
        }
    };

    let origin = path.display().to_string();
    match compiler.add_source(&content, &origin) {
        Ok(()) => {
            debug!(path = %origin, "compiled rule source");
            RuleSourceOutcome::Compiled(path)
        }
        Err(rejected) => RuleSourceOutcome::Rejected(CompileDiagnostic::rejected(
            path,
            rejected.error_count,
            rejected.messages,
        )),
    }
}
