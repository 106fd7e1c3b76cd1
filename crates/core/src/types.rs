//! 도메인 타입 -- 스캔 대상 분류와 규칙 컴파일 진단

use std::fmt;
use std::fs::FileType;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 스캔 대상 경로의 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// 일반 파일 (스캔 대상)
    File,
    /// 디렉토리 (하위 항목으로 확장)
    Directory,
    /// 그 외 (심볼릭 링크, 장치, 소켓, FIFO 등) -- 보고 후 건너뜀
    Other,
}

impl TargetKind {
    /// `std::fs::FileType`에서 분류를 결정합니다.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_file() {
            Self::File
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "regular file"),
            Self::Directory => write!(f, "directory"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// 분류가 끝난 스캔 대상
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    pub path: PathBuf,
    pub kind: TargetKind,
}

impl ScanTarget {
    pub fn new(path: impl Into<PathBuf>, kind: TargetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// 규칙 파일 하나에 대한 컴파일 실패 진단
///
/// 개별 진단은 치명적이지 않습니다. 실패한 규칙 파일은 최종 규칙 집합에
/// 아무것도 기여하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileDiagnostic {
    /// 규칙 파일 경로
    pub source_path: PathBuf,
    /// 엔진이 보고한 에러 수. 파일을 읽을 수 없으면 [`CompileDiagnostic::UNREADABLE`]
    pub error_count: i32,
    /// 엔진 또는 OS가 보고한 메시지
    pub messages: Vec<String>,
}

impl CompileDiagnostic {
    /// 파일을 열 수 없음을 나타내는 에러 수 센티널 값
    pub const UNREADABLE: i32 = -1;

    /// 읽기 실패 진단을 생성합니다.
    pub fn unreadable(source_path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            error_count: Self::UNREADABLE,
            messages: vec![reason.into()],
        }
    }

    /// 컴파일 실패 진단을 생성합니다.
    pub fn rejected(
        source_path: impl Into<PathBuf>,
        error_count: usize,
        messages: Vec<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            error_count: i32::try_from(error_count).unwrap_or(i32::MAX),
            messages,
        }
    }

    /// 읽기 실패 진단인지 반환합니다.
    pub fn is_unreadable(&self) -> bool {
        self.error_count == Self::UNREADABLE
    }
}

/// 엔진에 요청하는 규칙 보고 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingMode {
    /// 매칭된 규칙만 보고
    #[default]
    MatchingOnly,
    /// 매칭되지 않은 규칙도 보고 (상세 모드)
    All,
}

impl ReportingMode {
    pub fn reports_non_matching(&self) -> bool {
        matches!(self, Self::All)
    }
}
