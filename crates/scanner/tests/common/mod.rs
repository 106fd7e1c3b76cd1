//! 테스트용 가짜 매칭 엔진
//!
//! 규칙 소스는 한 줄에 `rule_id:needle` 하나씩입니다. 형식이 잘못된 줄이
//! 하나라도 있으면 소스 전체가 거부됩니다. 이름이 `.bad`로 끝나는 파일은
//! 스캔에 실패합니다.

#![allow(dead_code)]

use std::path::Path;

use yarrow_core::error::EngineError;
use yarrow_core::types::ReportingMode;
use yarrow_scanner::{
    CallbackAction, CompiledRules, EngineMessage, MatchingEngine, RuleCompiler, ScannerError,
    SourceRejected,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeRule {
    pub id: String,
    pub needle: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FakeRules {
    pub rules: Vec<FakeRule>,
}

impl CompiledRules for FakeRules {
    fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[derive(Default)]
pub struct FakeCompiler {
    rules: Vec<FakeRule>,
}

impl RuleCompiler for FakeCompiler {
    type Rules = FakeRules;

    fn add_source(&mut self, source: &[u8], origin: &str) -> Result<(), SourceRejected> {
        let text = String::from_utf8_lossy(source);
        let mut parsed = Vec::new();
        let mut messages = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((id, needle)) if !id.is_empty() && !needle.is_empty() => {
                    parsed.push(FakeRule {
                        id: id.to_owned(),
                        needle: needle.to_owned(),
                    });
                }
                _ => messages.push(format!("{origin}:{}: malformed rule", lineno + 1)),
            }
        }

        if messages.is_empty() {
            self.rules.extend(parsed);
            Ok(())
        } else {
            Err(SourceRejected {
                error_count: messages.len(),
                messages,
            })
        }
    }

    fn finalize(self) -> FakeRules {
        FakeRules { rules: self.rules }
    }
}

#[derive(Default)]
pub struct FakeEngine {
    pub fail_compiler: bool,
}

impl MatchingEngine for FakeEngine {
    type Compiler = FakeCompiler;
    type Rules = FakeRules;

    fn name(&self) -> &'static str {
        "fake"
    }

    fn create_compiler(&self) -> Result<FakeCompiler, EngineError> {
        if self.fail_compiler {
            return Err(EngineError::CompilerCreation("refused".to_owned()));
        }
        Ok(FakeCompiler::default())
    }

    fn scan_file(
        &self,
        rules: &FakeRules,
        path: &Path,
        mode: ReportingMode,
        on_message: &mut dyn FnMut(EngineMessage<'_>) -> CallbackAction,
    ) -> Result<(), ScannerError> {
        let invocation_error = |reason: String| ScannerError::ScanInvocation {
            path: path.display().to_string(),
            reason,
        };

        if path.extension().is_some_and(|ext| ext == "bad") {
            return Err(invocation_error("simulated engine failure".to_owned()));
        }
        let content = std::fs::read(path).map_err(|e| invocation_error(e.to_string()))?;
        let content = String::from_utf8_lossy(&content);

        for rule in &rules.rules {
            let message = if content.contains(rule.needle.as_str()) {
                EngineMessage::RuleMatching(&rule.id)
            } else if mode.reports_non_matching() {
                EngineMessage::RuleNotMatching(&rule.id)
            } else {
                continue;
            };
            if on_message(message) == CallbackAction::Abort {
                return Ok(());
            }
        }

        on_message(EngineMessage::ScanFinished);
        Ok(())
    }
}

/// 주어진 이름과 내용으로 파일을 만듭니다.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}
