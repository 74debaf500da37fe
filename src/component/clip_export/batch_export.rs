//! 批次匯出模組
//!
//! 依序對每個片段執行一次匯出，隔離單一片段的失敗並彙整結果

use super::manifest_parser::ClipRecord;
use crate::tools::validate_directory_exists;
use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 匯出模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// 只匯出指定索引的片段
    SingleClip(usize),
    /// 依序匯出所有片段
    AllClips,
}

/// 單一片段匯出的外部協作者
///
/// 實作者需要重設匯出設定、以 `[start_frame, end_frame]` 烘焙、把片段
/// 獨立成一個具名 take，並在成功與失敗路徑上都清理 take 分割狀態。
pub trait ClipExporter {
    fn export(&self, clip: &ClipRecord, destination_dir: &Path) -> Result<()>;
}

/// 單一片段的匯出結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub clip_name: String,
    pub error: Option<String>,
}

impl ExportOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 一次批次匯出的彙整結果
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<ExportOutcome>,
}

impl BatchResult {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    #[must_use]
    pub fn failures(&self) -> Vec<&ExportOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success()).collect()
    }
}

/// 執行一次批次匯出
///
/// 前置條件錯誤（空序列、索引超出範圍、匯出資料夾不存在）直接回傳
/// `Err`；單一片段的匯出失敗則記錄為失敗的 `ExportOutcome`，在
/// `AllClips` 模式下不會中斷後續片段。
pub fn run_batch(
    clips: &[ClipRecord],
    mode: ExportMode,
    destination_dir: &Path,
    exporter: &dyn ClipExporter,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<BatchResult> {
    if clips.is_empty() {
        bail!("沒有可匯出的動畫片段");
    }
    validate_directory_exists(destination_dir)?;

    match mode {
        ExportMode::SingleClip(index) => {
            let Some(clip) = clips.get(index) else {
                bail!("無效的動畫選擇: {} (共 {} 個)", index, clips.len());
            };
            Ok(BatchResult {
                outcomes: vec![export_one(clip, destination_dir, exporter)],
            })
        }
        ExportMode::AllClips => {
            Ok(export_all(clips, destination_dir, exporter, shutdown_signal))
        }
    }
}

/// 依序匯出所有片段，單一失敗不中斷批次
fn export_all(
    clips: &[ClipRecord],
    destination_dir: &Path,
    exporter: &dyn ClipExporter,
    shutdown_signal: &Arc<AtomicBool>,
) -> BatchResult {
    let mut result = BatchResult::default();

    let progress_bar = ProgressBar::new(clips.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );

    for clip in clips {
        if shutdown_signal.load(Ordering::SeqCst) {
            progress_bar.abandon_with_message("已中斷");
            break;
        }

        progress_bar.set_message(clip.name.clone());
        result.outcomes.push(export_one(clip, destination_dir, exporter));
        progress_bar.inc(1);
    }

    if !shutdown_signal.load(Ordering::SeqCst) {
        progress_bar.finish_with_message("完成");
    }

    result
}

fn export_one(
    clip: &ClipRecord,
    destination_dir: &Path,
    exporter: &dyn ClipExporter,
) -> ExportOutcome {
    match exporter.export(clip, destination_dir) {
        Ok(()) => {
            info!(
                "Exported clip {} (frames {}-{}, ID {})",
                clip.name, clip.start_frame, clip.end_frame, clip.id
            );
            ExportOutcome {
                clip_name: clip.name.clone(),
                error: None,
            }
        }
        Err(e) => {
            warn!("Failed to export clip {}: {e:#}", clip.name);
            ExportOutcome {
                clip_name: clip.name.clone(),
                error: Some(format!("{e:#}")),
            }
        }
    }
}
