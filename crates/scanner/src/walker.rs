//! 파일시스템 순회 -- 스캔 대상 분류와 재귀 열거
//!
//! [`classify`]로 루트 경로를 분류한 뒤 [`Walker`]가 스캔할 파일 경로를
//! 지연(lazy) 이터레이터로 생성합니다. 순회는 깊이 우선, 단일 패스이며
//! 도달 가능한 리프는 정확히 한 번씩 방문합니다.
//!
//! # 하위 항목 처리
//!
//! - 디렉토리: 재귀 진입 (`walkdir`가 처리)
//! - 그 외 항목: 리프. `verify_leaves`가 켜져 있으면 `stat`으로 재분류하여
//!   일반 파일만 [`WalkItem::Leaf`]로, 나머지는 [`WalkItem::Skipped`]로 보고
//! - 나열 실패, 심볼릭 링크 루프: [`WalkItem::Failed`] (형제 항목은 계속 순회)

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use yarrow_core::types::{ScanTarget, TargetKind};

use crate::error::ScannerError;

/// 루트 경로를 분류합니다. 심볼릭 링크는 따라갑니다.
///
/// # Errors
///
/// 경로가 없거나 상태를 조회할 수 없으면 `ScannerError::Classification`.
pub fn classify(path: &Path) -> Result<ScanTarget, ScannerError> {
    let metadata = std::fs::metadata(path).map_err(|e| ScannerError::Classification {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(ScanTarget::new(
        path,
        TargetKind::from_file_type(metadata.file_type()),
    ))
}

/// 순회 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// 리프를 `stat`으로 재분류하여 일반 파일만 스캔
    pub verify_leaves: bool,
    /// 루트 아래의 심볼릭 링크를 따라감 (루프는 `Failed`로 보고)
    pub follow_symlinks: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            verify_leaves: true,
            follow_symlinks: false,
        }
    }
}

/// 순회 결과 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    /// 스캔할 파일
    Leaf(PathBuf),
    /// 일반 파일이 아니어서 건너뛴 항목
    Skipped(ScanTarget),
    /// 경로 단위 실패 (나열 실패, 상태 조회 실패, 루프)
    Failed { path: PathBuf, reason: String },
}

enum WalkState {
    Single(Option<WalkItem>),
    Tree { root: PathBuf, walk: walkdir::IntoIter },
}

/// 분류된 스캔 대상에 대한 지연 순회 이터레이터
pub struct Walker {
    state: WalkState,
    options: WalkOptions,
}

impl Walker {
    /// 분류된 대상으로 순회를 시작합니다.
    ///
    /// - `File`: 대상 경로 하나만 생성
    /// - `Directory`: 재귀 열거
    /// - `Other`: `Skipped` 하나만 생성
    pub fn new(target: ScanTarget, options: WalkOptions) -> Self {
        let state = match target.kind {
            TargetKind::File => WalkState::Single(Some(WalkItem::Leaf(target.path))),
            TargetKind::Other => WalkState::Single(Some(WalkItem::Skipped(target))),
            TargetKind::Directory => {
                let walk = WalkDir::new(&target.path)
                    .min_depth(1)
                    .follow_links(options.follow_symlinks)
                    .into_iter();
                WalkState::Tree {
                    root: target.path,
                    walk,
                }
            }
        };

        Self { state, options }
    }

    fn leaf(&self, path: PathBuf) -> WalkItem {
        if !self.options.verify_leaves {
            return WalkItem::Leaf(path);
        }

        match std::fs::metadata(&path) {
            Ok(meta) => match TargetKind::from_file_type(meta.file_type()) {
                TargetKind::File => WalkItem::Leaf(path),
                kind => {
                    debug!(path = %path.display(), kind = %kind, "leaf is not a regular file");
                    WalkItem::Skipped(ScanTarget::new(path, kind))
                }
            },
            Err(e) => WalkItem::Failed {
                path,
                reason: format!("failed to get file status: {e}"),
            },
        }
    }
}

fn walk_failure(err: walkdir::Error, root: &Path) -> WalkItem {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());

    let reason = match (err.loop_ancestor(), err.io_error()) {
        (Some(ancestor), _) => format!("filesystem loop back to {}", ancestor.display()),
        (None, Some(io)) => io.to_string(),
        (None, None) => err.to_string(),
    };

    WalkItem::Failed { path, reason }
}

impl Iterator for Walker {
    type Item = WalkItem;

    fn next(&mut self) -> Option<WalkItem> {
        loop {
            let entry = match &mut self.state {
                WalkState::Single(item) => return item.take(),
                WalkState::Tree { root, walk } => match walk.next()? {
                    Ok(entry) => entry,
                    Err(err) => return Some(walk_failure(err, root)),
                },
            };

            if entry.file_type().is_dir() {
                trace!(path = %entry.path().display(), "descending");
                continue;
            }

            return Some(self.leaf(entry.into_path()));
        }
    }
}
